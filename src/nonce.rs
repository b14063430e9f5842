// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Deterministic per-message nonce derivation.
//!
//! Nonces are derived with an HMAC-SHA512 generator in the style of RFC
//! 6979,[^cite] keyed on the private scalar and driven by the message digest,
//! with an explicit domain-separation tag mixed into both keying steps. The
//! derivation never consults a random source: identical inputs always
//! produce the identical nonce, which makes multi-party runs reproducible
//! and testable offline.
//!
//! # 🔒 Lifetime requirement
//! A derived nonce is scoped to one `(private key, message)` pair. Reusing a
//! nonce value to answer a challenge for any *other* message leaks the
//! private key algebraically; callers must discard nonces with the signing
//! session they were derived for.
//!
//! [^cite]: Thomas Pornin. Deterministic Usage of the Digital Signature
//! Algorithm (DSA) and Elliptic Curve Digital Signature Algorithm (ECDSA).
//! [RFC 6979](https://www.rfc-editor.org/rfc/rfc6979), section 3.2.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha512};
use tracing::error;
use zeroize::Zeroize;

use crate::{
    curve::CurveParams,
    errors::{Error, Result},
    keys::{PrivateKey, CLAMP_MASK},
    scalar::Scalar,
};

type HmacSha512 = Hmac<Sha512>;

/// Domain-separation tag mixed into the nonce generator's key material.
///
/// This labels the scheme and hash so the same private key can safely feed
/// other derivation schemes without colliding nonce streams.
pub const RFC6979_DOMAIN_TAG: &[u8] = b"Edwards+SHA512";

/// Candidate-rejection bound. The generator retries while candidates reduce
/// to zero, which for a 256-bit candidate against a 253-bit order effectively
/// never happens; the bound only keeps the loop provably finite.
const RETRY_MAX: usize = 500;

/// Derive the deterministic nonce for one `(private key, message)` pair.
///
/// `private_key_bytes` is the signer's serialized 32-byte scalar, `extra` is
/// optional additional entropy folded into the generator (pass `None` for
/// the standard stream), and `tag` is the domain-separation label. Use
/// [`RFC6979_DOMAIN_TAG`] unless a caller is deliberately versioning its
/// nonce stream.
///
/// Each candidate is reduced modulo the group order and *then* clamped
/// (three low-order bits cleared). The reduce-then-clamp order is part of the
/// scheme's wire behavior and is kept even though the originating curve's
/// key-generation convention clamps first; it slightly biases the nonce
/// distribution, which is accepted for compatibility.
///
/// The accepted candidate is returned as a [`PrivateKey`], so the public
/// nonce point is derived and validated in the same step. Fails with the same
/// error kinds as [`PrivateKey::derive`].
pub fn derive_nonce(
    params: &CurveParams,
    private_key_bytes: &[u8],
    message: &[u8],
    extra: Option<&[u8]>,
    tag: &[u8],
) -> Result<PrivateKey> {
    if private_key_bytes.len() != PrivateKey::BYTES {
        error!(
            "Nonce derivation requires a {}-byte private scalar, got {} bytes",
            PrivateKey::BYTES,
            private_key_bytes.len()
        );
        return Err(Error::MalformedEncoding);
    }

    let mut message_digest = [0u8; 64];
    message_digest.copy_from_slice(&Sha512::digest(message));

    let mut k = [0u8; 64];
    let mut v = [1u8; 64];

    // K = HMAC(K, V || 0x00 || seed); V = HMAC(K, V); then again with 0x01.
    let seed: [&[u8]; 4] = [
        private_key_bytes,
        &message_digest,
        extra.unwrap_or(&[]),
        tag,
    ];
    drbg_reseed(&mut k, &mut v, 0x00, &seed);
    drbg_reseed(&mut k, &mut v, 0x01, &seed);

    let mut result = Err(Error::InvalidScalar);
    for _ in 0..RETRY_MAX {
        let mut mac = hmac_sha512(&k);
        mac.update(&v);
        v.copy_from_slice(&mac.finalize().into_bytes());

        // Reduce the candidate, then clamp; order matters here.
        let candidate = Scalar::from_be_bytes_reduced(&v[..32])?;
        let mut clamped = candidate.to_be_bytes();
        clamped[31] &= CLAMP_MASK;
        let nonce = Scalar::from_be_bytes_reduced(&clamped)?;
        clamped.zeroize();

        if !nonce.is_zero() {
            result = PrivateKey::from_scalar(params, nonce);
            break;
        }
        drbg_reseed(&mut k, &mut v, 0x00, &[]);
    }

    k.zeroize();
    v.zeroize();
    message_digest.zeroize();
    if result.is_err() {
        error!("Nonce derivation produced no usable scalar");
    }
    result
}

/// One RFC 6979 update step: re-key on `V || sep || seed`, then refresh `V`.
fn drbg_reseed(k: &mut [u8; 64], v: &mut [u8; 64], sep: u8, seed: &[&[u8]]) {
    let mut mac = hmac_sha512(k);
    mac.update(&v[..]);
    mac.update(&[sep]);
    for part in seed {
        mac.update(part);
    }
    k.copy_from_slice(&mac.finalize().into_bytes());

    let mut mac = hmac_sha512(k);
    mac.update(&v[..]);
    v.copy_from_slice(&mac.finalize().into_bytes());
}

fn hmac_sha512(key: &[u8]) -> HmacSha512 {
    HmacSha512::new_from_slice(key).expect("HMAC-SHA512 accepts keys of any length")
}

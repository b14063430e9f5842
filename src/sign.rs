// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Schnorr signing and verification for a single signer.
//!
//! The signature equation is the classic Schnorr pair:[^cite] the response is
//! `s = (r + e·d) mod N` against the challenge
//! `e = SHA-512(encode(R) || encode(P) || m) mod N`, and verification checks
//! `s·G == R + e·P`. The challenge byte layout (nonce point encoding, then
//! public key encoding, then the raw message) is a compatibility contract;
//! any deviation breaks interoperability between signer and verifier.
//!
//! The single-signer path here is also the cross-check for the multi-party
//! protocol in [`threshold`](crate::threshold): signing with the sum of all
//! private scalars and the sum of all nonces reproduces, byte for byte, the
//! combination of the individual partial signatures.
//!
//! [^cite]: Claus-Peter Schnorr. Efficient signature generation by smart
//! cards. Journal of Cryptology 4, 1991.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha512};
use tracing::error;

use crate::{
    curve::{CurveParams, CurvePoint},
    errors::{Error, Result},
    keys::{PrivateKey, PublicKey},
    scalar::Scalar,
};

/// A Schnorr signature: the aggregate nonce point's canonical encoding `R`
/// and the response scalar `S`.
///
/// Produced by [`sign_with_nonce`] or by
/// [`combine_partial_signatures`](crate::threshold::combine_partial_signatures);
/// immutable once constructed. Serializes as the 64-byte concatenation
/// `R || S`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
    r: [u8; 32],
    s: Scalar,
}

impl Signature {
    /// Serialized width of a signature in bytes.
    pub const BYTES: usize = CurvePoint::ENCODED_LEN + Scalar::BYTES;

    pub(crate) fn new(r: [u8; 32], s: Scalar) -> Self {
        Self { r, s }
    }

    /// The encoded nonce point component.
    pub fn r_bytes(&self) -> &[u8; 32] {
        &self.r
    }

    /// The response scalar component.
    pub fn s(&self) -> &Scalar {
        &self.s
    }

    /// Serialize as `R || S`, with `S` in fixed-width big-endian form.
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut out = [0u8; 64];
        out[..32].copy_from_slice(&self.r);
        out[32..].copy_from_slice(&self.s.to_be_bytes());
        out
    }

    /// Decode a 64-byte `R || S` buffer.
    ///
    /// Fails with [`Error::MalformedEncoding`] on a wrong-length buffer and
    /// propagates [`Error::InvalidScalar`] if `S` is not canonical. The `R`
    /// component is carried as bytes and is only interpreted as a point
    /// during verification.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != Self::BYTES {
            error!(
                "Signature encoding must be exactly {} bytes, got {}",
                Self::BYTES,
                bytes.len()
            );
            return Err(Error::MalformedEncoding);
        }
        let mut r = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        let s = Scalar::from_be_bytes(&bytes[32..])?;
        Ok(Self { r, s })
    }
}

impl Serialize for Signature {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&self.to_bytes())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        Signature::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

/// The shared challenge `SHA-512(nonce_point || public_key || message) mod N`.
///
/// Both encodings are the compressed 32-byte point form; the digest is read
/// as a big-endian integer before reduction.
pub(crate) fn challenge(
    nonce_point_encoding: &[u8; 32],
    public_key_encoding: &[u8; 32],
    message: &[u8],
) -> Scalar {
    let mut hasher = Sha512::new();
    hasher.update(nonce_point_encoding);
    hasher.update(public_key_encoding);
    hasher.update(message);
    let mut digest = [0u8; 64];
    digest.copy_from_slice(&hasher.finalize());
    Scalar::from_wide_be_bytes(&digest)
}

/// Sign a message as the sole signer, with an explicitly supplied nonce.
///
/// The challenge binds the signer's own public key and nonce point; the
/// response is `(r + e·d) mod N`. The nonce must have been derived for
/// exactly this `(private key, message)` pair (see
/// [`derive_nonce`](crate::nonce::derive_nonce)) and never reused elsewhere.
pub fn sign_with_nonce(private_key: &PrivateKey, nonce: &PrivateKey, message: &[u8]) -> Signature {
    let r_encoding = nonce.public_key().encode();
    let e = challenge(&r_encoding, &private_key.public_key().encode(), message);
    let s = nonce.scalar().add(&e.mul(private_key.scalar()));
    Signature::new(r_encoding, s)
}

/// Verify a signature against a public key and message.
///
/// Recomputes the challenge and checks `S·G == R + e·P`. Returns `false` for
/// any well-formed signature that does not satisfy the equation, including
/// an `R` component that fails to decode as a curve point. Malformed
/// *buffers* never reach this function; they are rejected when the signature
/// is decoded.
pub fn verify(
    params: &CurveParams,
    public_key: &PublicKey,
    message: &[u8],
    signature: &Signature,
) -> bool {
    let nonce_point = match params.decode_point(&signature.r) {
        Ok(point) => point,
        Err(_) => return false,
    };
    let e = challenge(&signature.r, &public_key.encode(), message);
    let lhs = params.scalar_mul(&signature.s, &params.generator());
    let rhs = params.add(&nonce_point, &params.scalar_mul(&e, public_key.point()));
    lhs == rhs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        nonce::{derive_nonce, RFC6979_DOMAIN_TAG},
        scalar::GROUP_ORDER,
    };
    use crypto_bigint::Encoding;

    fn fixture(params: &CurveParams, seed: u8, message: &[u8]) -> (PrivateKey, PrivateKey) {
        let key = PrivateKey::derive(params, &[seed; 32]).unwrap();
        let nonce = derive_nonce(
            params,
            &key.to_be_bytes(),
            message,
            None,
            RFC6979_DOMAIN_TAG,
        )
        .unwrap();
        (key, nonce)
    }

    #[test]
    fn signatures_verify() {
        let params = CurveParams::ed25519();
        let message = b"an inconsequential announcement";
        let (key, nonce) = fixture(&params, 0x42, message);
        let signature = sign_with_nonce(&key, &nonce, message);
        assert!(verify(&params, key.public_key(), message, &signature));
    }

    #[test]
    fn verification_rejects_the_wrong_message() {
        let params = CurveParams::ed25519();
        let message = b"the signed message";
        let (key, nonce) = fixture(&params, 0x42, message);
        let signature = sign_with_nonce(&key, &nonce, message);
        assert!(!verify(
            &params,
            key.public_key(),
            b"a different message",
            &signature
        ));
    }

    #[test]
    fn verification_rejects_the_wrong_key() {
        let params = CurveParams::ed25519();
        let message = b"the signed message";
        let (key, nonce) = fixture(&params, 0x42, message);
        let (other_key, _) = fixture(&params, 0x43, message);
        let signature = sign_with_nonce(&key, &nonce, message);
        assert!(!verify(&params, other_key.public_key(), message, &signature));
    }

    #[test]
    fn verification_rejects_a_tampered_response() {
        let params = CurveParams::ed25519();
        let message = b"the signed message";
        let (key, nonce) = fixture(&params, 0x42, message);
        let signature = sign_with_nonce(&key, &nonce, message);
        let tampered = Signature::new(*signature.r_bytes(), signature.s().add(&Scalar::ONE));
        assert!(!verify(&params, key.public_key(), message, &tampered));
    }

    #[test]
    fn verification_rejects_an_undecodable_nonce_point() {
        let params = CurveParams::ed25519();
        let message = b"the signed message";
        let (key, nonce) = fixture(&params, 0x42, message);
        let signature = sign_with_nonce(&key, &nonce, message);
        // Overwrite R with a non-canonical field element; decoding fails and
        // verification reports false rather than erroring.
        let mut bytes = signature.to_bytes();
        bytes[..32].copy_from_slice(&[0xffu8; 32]);
        bytes[31] = 0x7f;
        let tampered = Signature::from_bytes(&bytes).unwrap();
        assert!(!verify(&params, key.public_key(), message, &tampered));
    }

    #[test]
    fn signature_bytes_round_trip() {
        let params = CurveParams::ed25519();
        let message = b"the signed message";
        let (key, nonce) = fixture(&params, 0x42, message);
        let signature = sign_with_nonce(&key, &nonce, message);
        assert_eq!(
            Signature::from_bytes(&signature.to_bytes()).unwrap(),
            signature
        );
    }

    #[test]
    fn signature_decoding_rejects_bad_buffers() {
        assert!(matches!(
            Signature::from_bytes(&[0u8; 63]),
            Err(Error::MalformedEncoding)
        ));
        // A non-canonical S component is refused outright.
        let mut bytes = [0u8; 64];
        bytes[32..].copy_from_slice(&GROUP_ORDER.to_be_bytes());
        assert!(matches!(
            Signature::from_bytes(&bytes),
            Err(Error::InvalidScalar)
        ));
    }

    #[test]
    fn signature_serde_round_trips() {
        let params = CurveParams::ed25519();
        let message = b"the signed message";
        let (key, nonce) = fixture(&params, 0x42, message);
        let signature = sign_with_nonce(&key, &nonce, message);
        let encoded = serde_json::to_string(&signature).unwrap();
        let decoded: Signature = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, signature);
    }
}

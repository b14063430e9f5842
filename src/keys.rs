// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Private and public key types.
//!
//! A [`PrivateKey`] owns a non-zero scalar `d` and the public point `d·G`
//! derived from it at construction time. Both types are immutable: there is
//! no way to rewrite the scalar inside a live key, so "changing" a key always
//! means constructing a new value from bytes. Tampering a key in place is
//! therefore unrepresentable, and a key can be shared across threads without
//! coordination.
//!
//! # 🔒 Storage requirement
//! [`PrivateKey::to_be_bytes`] exposes the raw secret scalar for external
//! storage. The output must be handled with the same care as the key itself.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
    curve::{CurveParams, CurvePoint},
    errors::{Error, Result},
    scalar::Scalar,
};

/// Mask clearing the three low-order bits of the final (least significant)
/// byte of a big-endian scalar encoding.
pub(crate) const CLAMP_MASK: u8 = 0xf8;

/// A signing key: a secret non-zero scalar and its derived public point.
///
/// The secret scalar is zeroized on drop and redacted from `Debug` output.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey {
    d: Scalar,
    #[zeroize(skip)]
    public_key: PublicKey,
}

impl PrivateKey {
    /// Serialized width of a private key in bytes.
    pub const BYTES: usize = Scalar::BYTES;

    /// Derive a private key from 32 bytes of raw scalar material.
    ///
    /// The raw scalar is clamped by clearing its three low-order bits, then
    /// reduced modulo the group order. Fails with
    /// [`Error::MalformedEncoding`] on a wrong-length input and
    /// [`Error::InvalidScalar`] if the clamped, reduced scalar is zero.
    ///
    /// Clamping makes this unsuitable for re-loading a serialized key; use
    /// [`PrivateKey::from_be_bytes`] for that.
    pub fn derive(params: &CurveParams, raw_bytes: &[u8]) -> Result<Self> {
        if raw_bytes.len() != Self::BYTES {
            error!(
                "Raw private key material must be exactly {} bytes, got {}",
                Self::BYTES,
                raw_bytes.len()
            );
            return Err(Error::MalformedEncoding);
        }
        let mut clamped = [0u8; Self::BYTES];
        clamped.copy_from_slice(raw_bytes);
        clamped[Self::BYTES - 1] &= CLAMP_MASK;
        let d = Scalar::from_be_bytes_reduced(&clamped)?;
        clamped.zeroize();
        Self::from_scalar(params, d)
    }

    /// Reconstruct a private key from its canonical 32-byte big-endian
    /// serialization, exactly as produced by [`PrivateKey::to_be_bytes`].
    ///
    /// No clamping is applied, so any non-zero canonical scalar round-trips
    /// unchanged. In particular a sum of private scalars loads back as the
    /// key holding exactly that sum.
    pub fn from_be_bytes(params: &CurveParams, bytes: &[u8]) -> Result<Self> {
        let d = Scalar::from_be_bytes(bytes)?;
        Self::from_scalar(params, d)
    }

    /// Construct a private key holding exactly the given scalar.
    ///
    /// Fails with [`Error::InvalidScalar`] if the scalar is zero.
    pub fn from_scalar(params: &CurveParams, d: Scalar) -> Result<Self> {
        if d.is_zero() {
            error!("Private scalar reduced to zero");
            return Err(Error::InvalidScalar);
        }
        let point = params.scalar_mul(&d, &params.generator());
        // d is in (0, N) and G generates a subgroup of order N, so the
        // derived point cannot be the identity.
        let public_key = PublicKey::from_point(params, point)?;
        Ok(Self { d, public_key })
    }

    /// The public key `d·G` derived from this key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Serialize the secret scalar as fixed-width big-endian bytes.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        self.d.to_be_bytes()
    }

    pub(crate) fn scalar(&self) -> &Scalar {
        &self.d
    }
}

impl std::fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateKey")
            .field("d", &"[redacted]")
            .field("public_key", &self.public_key)
            .finish()
    }
}

/// A validated public key: an on-curve, non-identity point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PublicKey(CurvePoint);

impl PublicKey {
    /// Width of the compressed public key encoding in bytes.
    pub const BYTES: usize = CurvePoint::ENCODED_LEN;

    /// Decode a compressed 32-byte point encoding into a public key.
    ///
    /// Propagates [`Error::MalformedEncoding`] from point decompression and
    /// fails with [`Error::InvalidPoint`] if the encoding decodes to the
    /// identity.
    pub fn decode(params: &CurveParams, bytes: &[u8]) -> Result<Self> {
        let point = params.decode_point(bytes)?;
        Self::from_point(params, point)
    }

    /// Validate an in-memory point as a public key: it must be on the curve
    /// and must not be the identity.
    pub fn from_point(params: &CurveParams, point: CurvePoint) -> Result<Self> {
        if !params.is_on_curve(&point) {
            error!("Public key point does not satisfy the curve equation");
            return Err(Error::InvalidPoint);
        }
        if point.is_identity() {
            error!("Public key point is the identity");
            return Err(Error::InvalidPoint);
        }
        Ok(Self(point))
    }

    /// Serialize to the compressed 32-byte encoding.
    pub fn encode(&self) -> [u8; 32] {
        self.0.encode()
    }

    /// The underlying curve point.
    pub fn point(&self) -> &CurvePoint {
        &self.0
    }
}

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bytes(&self.encode())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bytes = Vec::<u8>::deserialize(deserializer)?;
        let params = CurveParams::ed25519();
        PublicKey::decode(&params, &bytes).map_err(serde::de::Error::custom)
    }
}

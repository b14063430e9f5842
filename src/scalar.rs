// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Arithmetic modulo the group order.
//!
//! A [`Scalar`] is an integer held canonically in `[0, N)`, where `N` is the
//! order of the prime-order subgroup. Every operation reduces its result, so
//! a scalar can never silently leave the canonical range. The representation
//! is a fixed-width 256-bit integer; there are no allocation or
//! length-dependent code paths.
//!
//! Scalars serialize as fixed-width 32-byte big-endian strings.

use crypto_bigint::{Encoding, U256, U512};
use subtle::ConstantTimeEq;
use tracing::error;
use zeroize::Zeroize;

use crate::errors::{Error, Result};

/// Order of the prime-order subgroup:
/// `2^252 + 27742317777372353535851937790883648493`.
pub(crate) const GROUP_ORDER: U256 =
    U256::from_be_hex("1000000000000000000000000000000014def9dea2f79cd65812631a5cf5d3ed");

/// An integer modulo the group order, always held in canonical form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Zeroize)]
pub struct Scalar(U256);

impl Scalar {
    /// Serialized width of a scalar in bytes.
    pub const BYTES: usize = 32;

    /// The additive identity.
    pub const ZERO: Self = Self(U256::ZERO);

    /// The multiplicative identity.
    pub const ONE: Self = Self(U256::ONE);

    /// Decode a canonical big-endian scalar.
    ///
    /// Fails with [`Error::MalformedEncoding`] unless `bytes` is exactly 32
    /// bytes long, and with [`Error::InvalidScalar`] if the decoded integer is
    /// not below the group order. Use this to decode values that were
    /// produced by [`Scalar::to_be_bytes`]; fresh untrusted integers should
    /// go through [`Scalar::from_be_bytes_reduced`] instead.
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self> {
        let value = Self::uint_from_be_bytes(bytes)?;
        if value >= GROUP_ORDER {
            error!("Scalar encoding is not in canonical form");
            return Err(Error::InvalidScalar);
        }
        Ok(Self(value))
    }

    /// Decode a big-endian integer and reduce it modulo the group order.
    ///
    /// Fails only if `bytes` is not exactly 32 bytes long.
    pub fn from_be_bytes_reduced(bytes: &[u8]) -> Result<Self> {
        let value = Self::uint_from_be_bytes(bytes)?;
        Ok(Self::reduce(&value))
    }

    /// Interpret a 64-byte big-endian integer and reduce it modulo the group
    /// order. Used to map hash output onto the scalar field.
    pub fn from_wide_be_bytes(bytes: &[u8; 64]) -> Self {
        let mut modulus = [0u8; 64];
        modulus[32..].copy_from_slice(&GROUP_ORDER.to_be_bytes());
        let wide = U512::from_be_slice(bytes);
        let (reduced, _) = wide.const_rem(&U512::from_be_slice(&modulus));
        // The remainder is below the 256-bit group order, so the truncation
        // cannot drop set bits.
        let mut be = reduced.to_be_bytes();
        let out = U256::from_be_slice(&be[32..]);
        be.zeroize();
        Self(out)
    }

    /// Serialize to the fixed-width 32-byte big-endian form.
    pub fn to_be_bytes(&self) -> [u8; 32] {
        self.0.to_be_bytes()
    }

    /// Add two scalars modulo the group order.
    pub fn add(&self, rhs: &Self) -> Self {
        Self(self.0.add_mod(&rhs.0, &GROUP_ORDER))
    }

    /// Multiply two scalars modulo the group order.
    pub fn mul(&self, rhs: &Self) -> Self {
        let (lo, hi) = self.0.mul_wide(&rhs.0);
        let (reduced, _) = U256::const_rem_wide((lo, hi), &GROUP_ORDER);
        Self(reduced)
    }

    /// True if this scalar is the additive identity.
    pub fn is_zero(&self) -> bool {
        self.0.ct_eq(&U256::ZERO).into()
    }

    pub(crate) fn reduce(value: &U256) -> Self {
        let (reduced, _) = value.const_rem(&GROUP_ORDER);
        Self(reduced)
    }

    pub(crate) fn as_uint(&self) -> &U256 {
        &self.0
    }

    fn uint_from_be_bytes(bytes: &[u8]) -> Result<U256> {
        if bytes.len() != Self::BYTES {
            error!(
                "Scalar encoding must be exactly {} bytes, got {}",
                Self::BYTES,
                bytes.len()
            );
            return Err(Error::MalformedEncoding);
        }
        Ok(U256::from_be_slice(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_minus_one_bytes() -> [u8; 32] {
        let mut bytes = GROUP_ORDER.to_be_bytes();
        bytes[31] -= 1;
        bytes
    }

    #[test]
    fn addition_wraps_at_the_group_order() {
        let max = Scalar::from_be_bytes(&order_minus_one_bytes()).unwrap();
        assert_eq!(max.add(&Scalar::ONE), Scalar::ZERO);
        assert_eq!(max.add(&Scalar::ZERO), max);
    }

    #[test]
    fn negative_one_squares_to_one() {
        // N - 1 is -1 mod N, so its square must be 1.
        let minus_one = Scalar::from_be_bytes(&order_minus_one_bytes()).unwrap();
        assert_eq!(minus_one.mul(&minus_one), Scalar::ONE);
    }

    #[test]
    fn multiplication_by_zero_and_one() {
        let x = Scalar::from_be_bytes_reduced(&[0x37; 32]).unwrap();
        assert_eq!(x.mul(&Scalar::ZERO), Scalar::ZERO);
        assert_eq!(x.mul(&Scalar::ONE), x);
    }

    #[test]
    fn canonical_decoding_rejects_the_group_order() {
        let order_bytes = GROUP_ORDER.to_be_bytes();
        assert_eq!(
            Scalar::from_be_bytes(&order_bytes),
            Err(Error::InvalidScalar)
        );
        // The reducing decoder accepts the same input and wraps it to zero.
        assert_eq!(
            Scalar::from_be_bytes_reduced(&order_bytes).unwrap(),
            Scalar::ZERO
        );
    }

    #[test]
    fn decoding_rejects_wrong_lengths() {
        assert_eq!(
            Scalar::from_be_bytes(&[0u8; 31]),
            Err(Error::MalformedEncoding)
        );
        assert_eq!(
            Scalar::from_be_bytes_reduced(&[0u8; 33]),
            Err(Error::MalformedEncoding)
        );
    }

    #[test]
    fn wide_reduction_agrees_with_narrow_reduction() {
        let narrow = [0xab; 32];
        let mut wide = [0u8; 64];
        wide[32..].copy_from_slice(&narrow);
        assert_eq!(
            Scalar::from_wide_be_bytes(&wide),
            Scalar::from_be_bytes_reduced(&narrow).unwrap()
        );
    }

    #[test]
    fn byte_round_trip() {
        let x = Scalar::from_be_bytes_reduced(&[0x5e; 32]).unwrap();
        assert_eq!(Scalar::from_be_bytes(&x.to_be_bytes()).unwrap(), x);
    }
}

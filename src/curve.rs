// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Twisted Edwards curve parameters and point arithmetic.
//!
//! The ambient group is the Ed25519 curve `-x² + y² = 1 + d·x²·y²` over the
//! prime field `GF(2^255 - 19)`.[^cite] All group operations live on
//! [`CurveParams`], an explicit, immutable context constructed once and passed
//! by reference wherever the curve is needed; there is no process-global
//! curve state.
//!
//! Point addition uses the unified twisted Edwards formulas, which are
//! complete on this curve: the same code path handles doubling, the identity,
//! and inverse pairs, with no input-dependent branching. Scalar
//! multiplication performs a fixed 256-iteration double-and-add ladder with
//! branchless selection, so its timing does not depend on the bits of the
//! scalar.
//!
//! [^cite]: Daniel J. Bernstein, Niels Duif, Tanja Lange, Peter Schwabe, and
//! Bo-Yin Yang. High-speed high-security signatures. [Journal of
//! Cryptographic Engineering, 2011](https://ed25519.cr.yp.to/ed25519-20110926.pdf).

use crypto_bigint::{
    modular::runtime_mod::{DynResidue, DynResidueParams},
    Encoding, U256,
};
use subtle::{Choice, ConditionallySelectable};
use tracing::error;
use zeroize::Zeroize;

use crate::{
    errors::{Error, Result},
    scalar::{Scalar, GROUP_ORDER},
};

type Fe = DynResidue<{ U256::LIMBS }>;
type FeParams = DynResidueParams<{ U256::LIMBS }>;

/// The field prime `2^255 - 19`.
const PRIME: U256 =
    U256::from_be_hex("7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffed");

/// The curve coefficient `d = -121665/121666 mod p`.
const COEFF_D: U256 =
    U256::from_be_hex("52036cee2b6ffe738cc740797779e89800700a4d4141d8ab75eb4dca135978a3");

/// `sqrt(-1) = 2^((p-1)/4) mod p`, used to fix up square-root candidates
/// during point decompression.
const SQRT_MINUS_ONE: U256 =
    U256::from_be_hex("2b8324804fc1df0b2b4d00993dfbd7a72f431806ad2fe478c4ee1b274a0ea0b0");

/// Affine coordinates of the base point. Its `y`-coordinate is `4/5 mod p`.
const BASE_X: U256 =
    U256::from_be_hex("216936d3cd6e53fec0a4e231fdd6dc5c692cc7609525a7b2c9562d608f25d51a");
const BASE_Y: U256 =
    U256::from_be_hex("6666666666666666666666666666666666666666666666666666666666666658");

/// Exponent `p - 2`, used for field inversion.
const PRIME_MINUS_TWO: U256 =
    U256::from_be_hex("7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffeb");

/// Exponent `(p - 5) / 8`, used for field square roots.
const SQRT_EXPONENT: U256 =
    U256::from_be_hex("0ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffd");

/// A point on the curve in affine coordinates, held canonically (`x, y < p`).
///
/// The group identity is the ordinary affine point `(0, 1)`; it needs no
/// out-of-band sentinel and flows through the unified addition formulas like
/// any other point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurvePoint {
    pub(crate) x: U256,
    pub(crate) y: U256,
}

impl CurvePoint {
    /// Width of the compressed point encoding in bytes.
    pub const ENCODED_LEN: usize = 32;

    /// The group identity.
    pub const IDENTITY: Self = Self {
        x: U256::ZERO,
        y: U256::ONE,
    };

    /// True if this point is the group identity.
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Serialize to the compressed 32-byte encoding: the `y`-coordinate in
    /// little-endian order with the parity of `x` stored in the top bit of
    /// the final byte.
    pub fn encode(&self) -> [u8; 32] {
        let mut out = self.y.to_le_bytes();
        out[31] |= (self.x.to_le_bytes()[0] & 1) << 7;
        out
    }
}

impl ConditionallySelectable for CurvePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self {
            x: U256::conditional_select(&a.x, &b.x, choice),
            y: U256::conditional_select(&a.y, &b.y, choice),
        }
    }
}

/// The curve domain: prime modulus, coefficient, base point, subgroup order,
/// and cofactor, plus the precomputed Montgomery form of the field.
///
/// Construct this once with [`CurveParams::ed25519`] and share it freely; it
/// is never mutated after construction and every operation takes it by
/// shared reference, so it may be used concurrently without locking.
#[derive(Clone, Copy, Debug)]
pub struct CurveParams {
    field: FeParams,
    prime: U256,
    coeff_d: U256,
    sqrt_m1: U256,
    base: CurvePoint,
    order: U256,
    cofactor: u8,
}

impl CurveParams {
    /// The Ed25519 curve domain.
    pub fn ed25519() -> Self {
        Self {
            field: DynResidueParams::new(&PRIME),
            prime: PRIME,
            coeff_d: COEFF_D,
            sqrt_m1: SQRT_MINUS_ONE,
            base: CurvePoint {
                x: BASE_X,
                y: BASE_Y,
            },
            order: GROUP_ORDER,
            cofactor: 8,
        }
    }

    /// The base point `G` generating the prime-order subgroup.
    pub fn generator(&self) -> CurvePoint {
        self.base
    }

    /// The order `N` of the prime-order subgroup.
    pub fn order(&self) -> U256 {
        self.order
    }

    /// The curve cofactor.
    pub fn cofactor(&self) -> u8 {
        self.cofactor
    }

    /// The group identity.
    pub fn identity(&self) -> CurvePoint {
        CurvePoint::IDENTITY
    }

    /// Add two points with the unified twisted Edwards addition law:
    ///
    /// ```text
    /// x3 = (x1·y2 + x2·y1) / (1 + d·x1·x2·y1·y2)
    /// y3 = (y1·y2 + x1·x2) / (1 - d·x1·x2·y1·y2)
    /// ```
    ///
    /// The denominators are never zero for points on this curve, so the
    /// operation is total over the group.
    pub fn add(&self, p: &CurvePoint, q: &CurvePoint) -> CurvePoint {
        let x1 = self.fe(&p.x);
        let y1 = self.fe(&p.y);
        let x2 = self.fe(&q.x);
        let y2 = self.fe(&q.y);

        let x1y2 = x1 * y2;
        let x2y1 = x2 * y1;
        let y1y2 = y1 * y2;
        let x1x2 = x1 * x2;
        let cross = self.fe(&self.coeff_d) * x1x2 * y1y2;

        let one = self.fe(&U256::ONE);
        let x3 = (x1y2 + x2y1) * self.invert(one + cross);
        let y3 = (y1y2 + x1x2) * self.invert(one - cross);
        CurvePoint {
            x: x3.retrieve(),
            y: y3.retrieve(),
        }
    }

    /// The additive inverse `(-x, y)` of a point.
    pub fn negate(&self, p: &CurvePoint) -> CurvePoint {
        CurvePoint {
            x: p.x.neg_mod(&self.prime),
            y: p.y,
        }
    }

    /// Multiply a point by a scalar.
    ///
    /// Runs a fixed double-and-add ladder over all 256 scalar bits with
    /// branchless accumulator selection; `k` is frequently private key
    /// material and must not influence timing.
    pub fn scalar_mul(&self, k: &Scalar, point: &CurvePoint) -> CurvePoint {
        let mut bits = k.as_uint().to_le_bytes();
        let mut acc = CurvePoint::IDENTITY;
        for i in (0..256).rev() {
            acc = self.add(&acc, &acc);
            let bit = (bits[i / 8] >> (i % 8)) & 1;
            let sum = self.add(&acc, point);
            acc = CurvePoint::conditional_select(&acc, &sum, Choice::from(bit));
        }
        bits.zeroize();
        acc
    }

    /// True if the coordinates are canonical and satisfy the curve equation
    /// `-x² + y² = 1 + d·x²·y²`.
    pub fn is_on_curve(&self, point: &CurvePoint) -> bool {
        if point.x >= self.prime || point.y >= self.prime {
            return false;
        }
        let x2 = self.fe(&point.x) * self.fe(&point.x);
        let y2 = self.fe(&point.y) * self.fe(&point.y);
        let one = self.fe(&U256::ONE);
        let lhs = y2 - x2;
        let rhs = one + self.fe(&self.coeff_d) * x2 * y2;
        lhs.retrieve() == rhs.retrieve()
    }

    /// Decode a compressed 32-byte point encoding.
    ///
    /// Recovers `x` from the stored `y` via the square root
    /// `x = (u/v)^((p+3)/8)` with `u = y² - 1`, `v = d·y² + 1`, correcting by
    /// `sqrt(-1)` when needed, then matches the stored parity bit.
    ///
    /// Fails with [`Error::MalformedEncoding`] if the buffer is not exactly
    /// 32 bytes, if `y` is not a canonical field element, if no square root
    /// exists, or if the encoding claims a negative zero `x`-coordinate. The
    /// identity decodes successfully here; callers that must exclude it do so
    /// at the key layer.
    pub fn decode_point(&self, bytes: &[u8]) -> Result<CurvePoint> {
        if bytes.len() != CurvePoint::ENCODED_LEN {
            error!(
                "Compressed point encoding must be exactly {} bytes, got {}",
                CurvePoint::ENCODED_LEN,
                bytes.len()
            );
            return Err(Error::MalformedEncoding);
        }
        let mut y_bytes = [0u8; 32];
        y_bytes.copy_from_slice(bytes);
        let x_is_odd = (y_bytes[31] >> 7) & 1;
        y_bytes[31] &= 0x7f;

        let y = U256::from_le_slice(&y_bytes);
        if y >= self.prime {
            error!("Compressed point y-coordinate is not a canonical field element");
            return Err(Error::MalformedEncoding);
        }

        let y_fe = self.fe(&y);
        let one = self.fe(&U256::ONE);
        let y2 = y_fe * y_fe;
        let u = y2 - one;
        let v = self.fe(&self.coeff_d) * y2 + one;

        // Candidate root x = u·v³·(u·v⁷)^((p-5)/8).
        let v3 = v * v * v;
        let v7 = v3 * v3 * v;
        let mut x = u * v3 * (u * v7).pow(&SQRT_EXPONENT);

        let vxx = v * x * x;
        if vxx.retrieve() == u.retrieve() {
            // x is already the right root.
        } else if vxx.retrieve() == (-u).retrieve() {
            x = x * self.fe(&self.sqrt_m1);
        } else {
            error!("Compressed point does not lie on the curve");
            return Err(Error::MalformedEncoding);
        }

        let mut x = x.retrieve();
        if x == U256::ZERO && x_is_odd == 1 {
            error!("Compressed point encodes a negative zero x-coordinate");
            return Err(Error::MalformedEncoding);
        }
        if (x.to_le_bytes()[0] & 1) != x_is_odd {
            x = x.neg_mod(&self.prime);
        }
        Ok(CurvePoint { x, y })
    }

    fn fe(&self, value: &U256) -> Fe {
        DynResidue::new(value, self.field)
    }

    fn invert(&self, x: Fe) -> Fe {
        x.pow(&PRIME_MINUS_TWO)
    }
}

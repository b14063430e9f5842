// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! The multi-party signing protocol.
//!
//! # High-level protocol description
//! `n` signers jointly produce one Schnorr signature that verifies against
//! the sum of their public keys:
//! - Each signer independently derives a deterministic nonce for the message
//!   and publishes the nonce's public point.
//! - Everyone's public keys are summed into the aggregate key, and everyone's
//!   public nonce points into the aggregate nonce (the two sums use the same
//!   [`combine_public_keys`] operation).
//! - Each signer computes a partial signature with [`partial_sign`]: the
//!   challenge binds the *aggregate* key and nonce, while the response uses
//!   only the signer's own private scalar and private nonce.
//! - Any party sums the partial responses with
//!   [`combine_partial_signatures`], yielding the final signature.
//!
//! The scheme works because the response is linear in the secrets: summing
//! the per-signer responses `r_j + e·d_j` gives `Σr + e·Σd`, exactly the
//! response a single signer holding both sums would have produced. Every
//! step is a pure function over serialized data. No session state lives in
//! this crate, so the transport between signers, the retry policy, and the
//! ordering are entirely the caller's business, and any step may be repeated
//! idempotently.
//!
//! A coordinator that shows *different* aggregate values to different
//! signers is outside this crate's threat model; each signer validates that
//! the aggregates are honest curve points but cannot tell whether its peers
//! were shown the same ones.

use tracing::error;

use crate::{
    curve::{CurveParams, CurvePoint},
    errors::{Error, Result},
    keys::{PrivateKey, PublicKey},
    scalar::Scalar,
    sign::{challenge, Signature},
};

/// Sum a non-empty sequence of public points into one aggregate key.
///
/// Point addition is commutative and associative, so any permutation of the
/// same multiset yields the identical aggregate. Used both for long-term
/// public keys and for public nonce points.
///
/// Fails with [`Error::DegenerateAggregate`] if the input is empty or if the
/// points cancel to the identity; a cancelled aggregate must surface loudly
/// since nothing meaningful can verify against it.
pub fn combine_public_keys(params: &CurveParams, keys: &[PublicKey]) -> Result<PublicKey> {
    if keys.is_empty() {
        error!("Refusing to aggregate an empty set of public keys");
        return Err(Error::DegenerateAggregate);
    }
    let sum = keys
        .iter()
        .fold(CurvePoint::IDENTITY, |acc, key| params.add(&acc, key.point()));
    if sum.is_identity() {
        error!("Public keys cancelled out; the aggregate is the identity");
        return Err(Error::DegenerateAggregate);
    }
    PublicKey::from_point(params, sum)
}

/// Compute one signer's partial signature.
///
/// `aggregate_public_key` and `aggregate_nonce` are the serialized compressed
/// encodings agreed between all signers; both are decoded and validated as
/// on-curve, non-identity points before use, and decode failures propagate;
/// an invalid aggregate is never silently replaced. The shared challenge
/// `e = SHA-512(encode(R_agg) || encode(P_agg) || m) mod N` is identical for
/// every signer, so the returned signature carries the common `R_agg`
/// encoding and this signer's response `(r_j + e·d_j) mod N`.
///
/// Pure function of its inputs; the signer's long-term key and nonce are
/// never combined with anything but the challenge scalar.
pub fn partial_sign(
    params: &CurveParams,
    message: &[u8],
    private_key: &PrivateKey,
    aggregate_public_key: &[u8],
    nonce: &PrivateKey,
    aggregate_nonce: &[u8],
) -> Result<Signature> {
    let aggregate_key = PublicKey::decode(params, aggregate_public_key)?;
    let aggregate_nonce = PublicKey::decode(params, aggregate_nonce)?;

    let r_encoding = aggregate_nonce.encode();
    let e = challenge(&r_encoding, &aggregate_key.encode(), message);
    let s = nonce.scalar().add(&e.mul(private_key.scalar()));
    Ok(Signature::new(r_encoding, s))
}

/// Combine partial signatures into the final joint signature.
///
/// Every partial signature must carry a byte-identical `R` component (all
/// signers must have responded to the same aggregate nonce); otherwise the
/// combination fails with [`Error::MismatchedNonce`]. The responses are
/// summed modulo the group order. An empty input fails with
/// [`Error::DegenerateAggregate`].
pub fn combine_partial_signatures(partial_signatures: &[Signature]) -> Result<Signature> {
    let first = partial_signatures.first().ok_or_else(|| {
        error!("Refusing to combine an empty set of partial signatures");
        Error::DegenerateAggregate
    })?;
    if partial_signatures
        .iter()
        .any(|sig| sig.r_bytes() != first.r_bytes())
    {
        error!("Partial signatures disagree on the aggregate nonce point");
        return Err(Error::MismatchedNonce);
    }
    let s = partial_signatures
        .iter()
        .fold(Scalar::ZERO, |acc, sig| acc.add(sig.s()));
    Ok(Signature::new(*first.r_bytes(), s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        nonce::{derive_nonce, RFC6979_DOMAIN_TAG},
        sign::{sign_with_nonce, verify},
        utils::testing::init_testing,
    };
    use rand::RngCore;

    fn random_key(params: &CurveParams, rng: &mut impl RngCore) -> PrivateKey {
        let mut raw = [0u8; 32];
        rng.fill_bytes(&mut raw);
        PrivateKey::derive(params, &raw).unwrap()
    }

    #[test]
    fn aggregation_is_order_independent() {
        let mut rng = init_testing();
        let params = CurveParams::ed25519();
        let keys: Vec<PublicKey> = (0..3)
            .map(|_| *random_key(&params, &mut rng).public_key())
            .collect();

        let abc = combine_public_keys(&params, &keys).unwrap();
        let cab = combine_public_keys(&params, &[keys[2], keys[0], keys[1]]).unwrap();
        let bca = combine_public_keys(&params, &[keys[1], keys[2], keys[0]]).unwrap();
        assert_eq!(abc, cab);
        assert_eq!(abc, bca);
    }

    #[test]
    fn empty_aggregation_is_degenerate() {
        let params = CurveParams::ed25519();
        assert!(matches!(
            combine_public_keys(&params, &[]),
            Err(Error::DegenerateAggregate)
        ));
    }

    #[test]
    fn cancelling_keys_are_degenerate() {
        let mut rng = init_testing();
        let params = CurveParams::ed25519();
        let key = random_key(&params, &mut rng);
        let public_key = *key.public_key();
        let negated = PublicKey::from_point(&params, params.negate(public_key.point())).unwrap();
        assert!(matches!(
            combine_public_keys(&params, &[public_key, negated]),
            Err(Error::DegenerateAggregate)
        ));
    }

    #[test]
    fn two_party_combination_matches_the_sum_signer() {
        let mut rng = init_testing();
        let params = CurveParams::ed25519();
        let message = b"pay the relay operator";

        let keys: Vec<PrivateKey> = (0..2).map(|_| random_key(&params, &mut rng)).collect();
        let public_keys: Vec<PublicKey> = keys.iter().map(|key| *key.public_key()).collect();
        let aggregate_key = combine_public_keys(&params, &public_keys).unwrap();

        let nonces: Vec<PrivateKey> = keys
            .iter()
            .map(|key| {
                derive_nonce(
                    &params,
                    &key.to_be_bytes(),
                    message,
                    None,
                    RFC6979_DOMAIN_TAG,
                )
                .unwrap()
            })
            .collect();
        let public_nonces: Vec<PublicKey> =
            nonces.iter().map(|nonce| *nonce.public_key()).collect();
        let aggregate_nonce = combine_public_keys(&params, &public_nonces).unwrap();

        let partials: Vec<Signature> = keys
            .iter()
            .zip(&nonces)
            .map(|(key, nonce)| {
                partial_sign(
                    &params,
                    message,
                    key,
                    &aggregate_key.encode(),
                    nonce,
                    &aggregate_nonce.encode(),
                )
                .unwrap()
            })
            .collect();
        let combined = combine_partial_signatures(&partials).unwrap();

        let key_sum = keys
            .iter()
            .fold(Scalar::ZERO, |acc, key| acc.add(key.scalar()));
        let nonce_sum = nonces
            .iter()
            .fold(Scalar::ZERO, |acc, nonce| acc.add(nonce.scalar()));
        let sum_key = PrivateKey::from_scalar(&params, key_sum).unwrap();
        let sum_nonce = PrivateKey::from_scalar(&params, nonce_sum).unwrap();
        let expected = sign_with_nonce(&sum_key, &sum_nonce, message);

        assert_eq!(combined.to_bytes(), expected.to_bytes());
        assert!(verify(&params, &aggregate_key, message, &combined));
    }

    #[test]
    fn mismatched_nonce_points_refuse_to_combine() {
        let mut rng = init_testing();
        let params = CurveParams::ed25519();
        let key = random_key(&params, &mut rng);
        let other = random_key(&params, &mut rng);

        let one = Signature::new(key.public_key().encode(), Scalar::ONE);
        let two = Signature::new(other.public_key().encode(), Scalar::ONE);
        assert!(matches!(
            combine_partial_signatures(&[one, two]),
            Err(Error::MismatchedNonce)
        ));
    }

    #[test]
    fn empty_combination_is_degenerate() {
        assert!(matches!(
            combine_partial_signatures(&[]),
            Err(Error::DegenerateAggregate)
        ));
    }

    #[test]
    fn partial_signing_rejects_malformed_aggregates() {
        let mut rng = init_testing();
        let params = CurveParams::ed25519();
        let message = b"pay the relay operator";
        let key = random_key(&params, &mut rng);
        let nonce = derive_nonce(
            &params,
            &key.to_be_bytes(),
            message,
            None,
            RFC6979_DOMAIN_TAG,
        )
        .unwrap();
        let good_aggregate = key.public_key().encode();

        assert!(matches!(
            partial_sign(&params, message, &key, &[0u8; 31], &nonce, &good_aggregate),
            Err(Error::MalformedEncoding)
        ));
        let identity_encoding = params.identity().encode();
        assert!(matches!(
            partial_sign(
                &params,
                message,
                &key,
                &good_aggregate,
                &nonce,
                &identity_encoding
            ),
            Err(Error::InvalidPoint)
        ));
    }
}

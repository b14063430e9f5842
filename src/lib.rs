// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Multi-party Schnorr signatures over the Ed25519 twisted Edwards curve.
//!
//! `n` independent parties, each holding a private scalar, jointly produce a
//! single Schnorr signature[^schnorr] that verifies against the sum of their
//! public keys, without any party learning another's private key or private
//! nonce.
//!
//! # High-level protocol description
//! The protocol runs in two rounds over any transport the caller likes:
//! - **Round one.** Each signer derives a deterministic per-message nonce
//!   ([`derive_nonce`], an HMAC-SHA512 construction in the style of RFC
//!   6979[^rfc6979]) and publishes its public point. The parties' public keys
//!   are summed into the aggregate key and the public nonces into the
//!   aggregate nonce ([`combine_public_keys`], used for both).
//! - **Round two.** Each signer computes a partial signature
//!   ([`partial_sign`]) whose challenge binds the aggregate key and aggregate
//!   nonce, and whose response uses only its own secrets. Anyone can sum the
//!   partial signatures ([`combine_partial_signatures`]) into the final
//!   [`Signature`], which verifies against the aggregate key ([`verify`]).
//!
//! The additive structure is the whole trick: summing responses
//! `r_j + e·d_j` over all signers yields `Σr + e·Σd`, byte-for-byte the
//! signature that a single signer holding both sums would produce with
//! [`sign_with_nonce`].
//!
//! Every operation is a pure function over immutable inputs. The one
//! process-wide value, [`CurveParams`], is constructed once and only ever
//! read, so everything here may be called concurrently from independent
//! threads with no coordination.
//!
//! # Example
//! ```
//! use tss_schnorr::{
//!     combine_partial_signatures, combine_public_keys, derive_nonce, partial_sign, verify,
//!     CurveParams, PrivateKey, RFC6979_DOMAIN_TAG,
//! };
//!
//! # fn main() -> tss_schnorr::Result<()> {
//! let params = CurveParams::ed25519();
//! let message = b"settle channel 42";
//!
//! // Each party holds its own key; raw material would come from secure storage.
//! let alice = PrivateKey::derive(&params, &[0x11; 32])?;
//! let bob = PrivateKey::derive(&params, &[0x22; 32])?;
//!
//! // Round one: derive nonces, then combine public keys and public nonces.
//! let alice_nonce =
//!     derive_nonce(&params, &alice.to_be_bytes(), message, None, RFC6979_DOMAIN_TAG)?;
//! let bob_nonce = derive_nonce(&params, &bob.to_be_bytes(), message, None, RFC6979_DOMAIN_TAG)?;
//! let aggregate_key = combine_public_keys(&params, &[*alice.public_key(), *bob.public_key()])?;
//! let aggregate_nonce =
//!     combine_public_keys(&params, &[*alice_nonce.public_key(), *bob_nonce.public_key()])?;
//!
//! // Round two: partial signatures against the shared aggregates.
//! let partials = [
//!     partial_sign(
//!         &params,
//!         message,
//!         &alice,
//!         &aggregate_key.encode(),
//!         &alice_nonce,
//!         &aggregate_nonce.encode(),
//!     )?,
//!     partial_sign(
//!         &params,
//!         message,
//!         &bob,
//!         &aggregate_key.encode(),
//!         &bob_nonce,
//!         &aggregate_nonce.encode(),
//!     )?,
//! ];
//! let signature = combine_partial_signatures(&partials)?;
//! assert!(verify(&params, &aggregate_key, message, &signature));
//! # Ok(())
//! # }
//! ```
//!
//! # What this crate does not do
//! There is no transport, session management, or coordinator logic here; the
//! protocol is expressed as stateless functions over serialized byte buffers
//! and every step can be retried idempotently. A coordinator that shows
//! inconsistent aggregate values to different signers is outside the threat
//! model. Only the one curve family is supported.
//!
//! [^schnorr]: Claus-Peter Schnorr. Efficient signature generation by smart
//! cards. Journal of Cryptology 4, 1991.
//!
//! [^rfc6979]: Thomas Pornin. Deterministic Usage of the Digital Signature
//! Algorithm (DSA) and Elliptic Curve Digital Signature Algorithm (ECDSA).
//! [RFC 6979](https://www.rfc-editor.org/rfc/rfc6979).

#![warn(missing_docs)]

pub mod curve;
pub mod errors;
pub mod keys;
pub mod nonce;
pub mod scalar;
pub mod sign;
pub mod threshold;
mod utils;

pub use curve::{CurveParams, CurvePoint};
pub use errors::{Error, Result};
pub use keys::{PrivateKey, PublicKey};
pub use nonce::{derive_nonce, RFC6979_DOMAIN_TAG};
pub use scalar::Scalar;
pub use sign::{sign_with_nonce, verify, Signature};
pub use threshold::{combine_partial_signatures, combine_public_keys, partial_sign};

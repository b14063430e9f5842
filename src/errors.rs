// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Error types produced by the signing protocol.
//!
//! Every fallible operation in this crate returns one of the kinds below as an
//! explicit failure value. All of them are local, recoverable conditions: the
//! caller supplied something the protocol cannot accept, and may retry with
//! corrected input. Nothing in this crate panics on bad input.
//!
//! Note that a signature which is well-formed but simply does not verify is
//! *not* an error; [`verify`](crate::verify) reports that outcome as `false`.

use thiserror::Error;

/// Failure conditions surfaced by the protocol.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// A scalar was zero, or fell outside `[0, N)`, in a position that
    /// requires a non-zero canonical scalar.
    #[error("scalar is zero or out of range for its intended use")]
    InvalidScalar,

    /// A point failed the curve-equation check, or was the identity in a
    /// position that requires a non-identity point.
    #[error("point is not on the curve, or is the identity where a non-identity point is required")]
    InvalidPoint,

    /// Combining public keys or public nonces produced the identity point.
    /// The inputs cancelled out; the aggregate is unusable and the condition
    /// must be surfaced rather than signed under.
    #[error("aggregation of public points produced the identity")]
    DegenerateAggregate,

    /// Partial signatures disagreed on the shared nonce point. All signers
    /// must have committed to the same aggregate nonce before responding.
    #[error("partial signatures disagree on the shared nonce point")]
    MismatchedNonce,

    /// An input byte buffer had the wrong length or did not decode to a valid
    /// field element, scalar, or curve point.
    #[error("byte encoding has the wrong length or does not decode to a valid element")]
    MalformedEncoding,
}

/// Convenience alias for results returned by this crate.
pub type Result<T> = core::result::Result<T, Error>;

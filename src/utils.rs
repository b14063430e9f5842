// Copyright (c) 2023 Bolt Labs Holdings, Inc
//
// This source code is licensed under both the MIT license found in the
// LICENSE-MIT file in the root directory of this source tree and the Apache
// License, Version 2.0 found in the LICENSE-APACHE file in the root directory
// of this source tree.

//! Test-only utilities.
//!
//! Randomness in this crate exists solely to generate test fixtures: which
//! keys and which parties a test exercises. Nothing in the signing core
//! consults a random source; nonces are derived deterministically
//! ([`crate::nonce`]) and must stay that way.

////////////////////////////
// Test Utility Functions //
////////////////////////////

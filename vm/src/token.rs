// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

pub use fvm_shared::bigint::{bigint_ser, BigInt};

/// Token amount in the network's smallest denomination.
pub type TokenAmount = BigInt;

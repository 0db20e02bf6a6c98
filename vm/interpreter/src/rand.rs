// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use fvm_ipld_blockstore::Blockstore;
use fvm_shared::clock::ChainEpoch;
use std::error::Error as StdError;

/// Chain randomness provider interface.
///
/// The engine never samples randomness itself; this is the seam executor
/// implementations use to draw ticket-chain randomness for actor logic.
pub trait Rand {
    /// Gets 32 bytes of randomness from the ticket chain for the given
    /// round, mixed with the supplied entropy.
    fn get_chain_randomness<DB: Blockstore>(
        &self,
        db: &DB,
        round: ChainEpoch,
        entropy: &[u8],
    ) -> Result<[u8; 32], Box<dyn StdError>>;
}

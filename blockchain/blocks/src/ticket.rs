// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use fvm_ipld_encoding::strict_bytes;
use fvm_ipld_encoding::tuple::*;

/// A ticket is a marker of a tick of the blockchain's clock, generated by
/// the producer of a block. Tickets establish the canonical order of
/// sibling blocks within a tipset.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Default, Serialize_tuple, Deserialize_tuple)]
pub struct Ticket {
    /// VRF proof output by the block producer.
    #[serde(with = "strict_bytes")]
    pub vrfproof: Vec<u8>,
}

impl Ticket {
    /// Ticket constructor.
    pub fn new(vrfproof: Vec<u8>) -> Self {
        Self { vrfproof }
    }
}

// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::{Ticket, TipsetKeys};
use cid::Cid;
use ember_message::SignedMessage;
use fvm_ipld_encoding::tuple::*;
use fvm_ipld_encoding::Cbor;
use fvm_shared::clock::ChainEpoch;

/// A complete block: consensus header fields plus the signed messages to be
/// applied at the block's height.
#[derive(Clone, Debug, PartialEq, Serialize_tuple, Deserialize_tuple)]
pub struct Block {
    /// Key of the parent tipset this block builds on.
    pub parents: TipsetKeys,
    /// Chain height of the block.
    pub height: ChainEpoch,
    /// Election ticket ordering this block among its siblings.
    pub ticket: Ticket,
    /// Root of the state tree this block was produced against.
    pub state_root: Cid,
    /// Messages to apply, in consensus order.
    pub messages: Vec<SignedMessage>,
}

impl Cbor for Block {}

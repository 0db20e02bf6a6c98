// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

#![allow(dead_code)]

use cid::Cid;
use ember_actor::ACCOUNT_ACTOR_CODE_ID;
use ember_blocks::{Block, Ticket, TipsetKeys};
use ember_message::{SignedMessage, UnsignedMessage};
use ember_vm::{ActorState, TokenAmount};
use fvm_shared::address::Address;
use fvm_shared::clock::ChainEpoch;
use fvm_shared::crypto::signature::Signature;

/// Account actor fixture with the given balance and sequence.
pub fn account_actor(balance: u64, sequence: u64) -> ActorState {
    ActorState::new(
        Some(*ACCOUNT_ACTOR_CODE_ID),
        None,
        TokenAmount::from(balance),
        sequence,
    )
}

/// Bare value transfer between two addresses.
pub fn transfer(from: Address, to: Address, sequence: u64, value: u64) -> UnsignedMessage {
    UnsignedMessage::builder()
        .from(from)
        .to(to)
        .sequence(sequence)
        .value(TokenAmount::from(value))
        .build()
        .unwrap()
}

/// Wraps a message with a placeholder signature; the engine assumes
/// signatures were validated on ingestion.
pub fn signed(msg: UnsignedMessage) -> SignedMessage {
    SignedMessage::new(msg, Signature::new_secp256k1(vec![0; 65]))
}

/// Block fixture carrying the given messages at the given height.
pub fn block(height: ChainEpoch, ticket: u8, messages: Vec<SignedMessage>) -> Block {
    Block {
        parents: TipsetKeys::new(vec![Cid::default()]),
        height,
        ticket: Ticket::new(vec![ticket]),
        state_root: Cid::default(),
        messages,
    }
}

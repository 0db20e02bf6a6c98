// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use cid::Cid;
use ember_blocks::{Block, Error, Ticket, Tipset, TipsetKeys};
use fvm_shared::clock::ChainEpoch;

fn template_block(height: ChainEpoch, ticket: u8) -> Block {
    Block {
        parents: TipsetKeys::new(vec![Cid::default()]),
        height,
        ticket: Ticket::new(vec![ticket]),
        state_root: Cid::default(),
        messages: Vec::new(),
    }
}

#[test]
fn new_test() {
    let blocks = vec![template_block(1, 3), template_block(1, 1)];
    assert!(Tipset::new(blocks).is_ok(), "result is invalid");
}

#[test]
fn empty_tipset_rejected() {
    assert_eq!(Tipset::new(Vec::new()).unwrap_err(), Error::NoBlocks);
}

#[test]
fn mismatched_heights_rejected() {
    let blocks = vec![template_block(1, 1), template_block(2, 2)];
    assert!(matches!(
        Tipset::new(blocks).unwrap_err(),
        Error::InvalidTipset(_)
    ));
}

#[test]
fn mismatched_parents_rejected() {
    let mut other = template_block(1, 2);
    other.parents = TipsetKeys::default();
    let blocks = vec![template_block(1, 1), other];
    assert!(matches!(
        Tipset::new(blocks).unwrap_err(),
        Error::InvalidTipset(_)
    ));
}

#[test]
fn blocks_sorted_by_ticket() {
    let blocks = vec![
        template_block(1, 3),
        template_block(1, 1),
        template_block(1, 2),
    ];
    let tipset = Tipset::new(blocks).unwrap();

    let tickets: Vec<&[u8]> = tipset
        .blocks()
        .iter()
        .map(|blk| blk.ticket.vrfproof.as_slice())
        .collect();
    assert_eq!(tickets, vec![&[1u8][..], &[2u8][..], &[3u8][..]]);
    assert_eq!(tipset.min_ticket(), &Ticket::new(vec![1]));
    assert_eq!(tipset.len(), 3);
    assert_eq!(tipset.epoch(), 1);
}

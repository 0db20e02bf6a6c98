// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod common;

use common::*;
use ember_blocks::Tipset;
use ember_interpreter::{process_block, process_tipset, CancelToken, DefaultVm};
use ember_message::Message;
use ember_state_tree::StateTree;
use ember_vm::TokenAmount;
use fvm_ipld_blockstore::MemoryBlockstore;
use fvm_ipld_encoding::Cbor;
use fvm_shared::address::Address;

#[test]
fn process_block_applies_all_messages() {
    let (alice, bob) = (Address::new_id(100), Address::new_id(101));
    let store = MemoryBlockstore::default();
    let mut st = StateTree::new(&store);
    st.set_actor(&alice, account_actor(100, 3)).unwrap();
    st.set_actor(&bob, account_actor(0, 0)).unwrap();

    let blk = block(
        1,
        1,
        vec![
            signed(transfer(alice, bob, 3, 10)),
            signed(transfer(alice, bob, 4, 20)),
        ],
    );

    let results = process_block(&CancelToken::new(), &DefaultVm, &blk, &mut st, &store).unwrap();
    assert_eq!(results.len(), 2);

    let a = st.get_actor(&alice).unwrap().unwrap();
    assert_eq!(a.sequence, 5);
    assert_eq!(a.balance, TokenAmount::from(70u8));
    assert_eq!(
        st.get_actor(&bob).unwrap().unwrap().balance,
        TokenAmount::from(30u8)
    );
}

#[test]
fn process_block_rejects_permanent_failure() {
    let (alice, bob) = (Address::new_id(100), Address::new_id(101));
    let store = MemoryBlockstore::default();
    let mut st = StateTree::new(&store);
    st.set_actor(&alice, account_actor(100, 3)).unwrap();
    st.set_actor(&bob, account_actor(0, 0)).unwrap();

    // nonce too low: the block should never have included this message
    let blk = block(1, 1, vec![signed(transfer(alice, bob, 1, 10))]);

    let err = process_block(&CancelToken::new(), &DefaultVm, &blk, &mut st, &store).unwrap_err();
    assert!(err.is_permanent());
}

#[test]
fn process_block_rejects_temporary_failure() {
    let (alice, bob) = (Address::new_id(100), Address::new_id(101));
    let store = MemoryBlockstore::default();
    let mut st = StateTree::new(&store);
    st.set_actor(&alice, account_actor(100, 3)).unwrap();
    st.set_actor(&bob, account_actor(0, 0)).unwrap();

    // nonce too high is just as invalid inside a block
    let blk = block(1, 1, vec![signed(transfer(alice, bob, 9, 10))]);

    let err = process_block(&CancelToken::new(), &DefaultVm, &blk, &mut st, &store).unwrap_err();
    assert!(err.is_temporary());
}

#[test]
fn process_block_accepts_execution_errors() {
    let (alice, bob) = (Address::new_id(100), Address::new_id(101));
    let store = MemoryBlockstore::default();
    let mut st = StateTree::new(&store);
    st.set_actor(&alice, account_actor(5, 3)).unwrap();
    st.set_actor(&bob, account_actor(0, 0)).unwrap();

    // insufficient funds: applied with an execution error, block stays valid
    let blk = block(1, 1, vec![signed(transfer(alice, bob, 3, 10))]);

    let results = process_block(&CancelToken::new(), &DefaultVm, &blk, &mut st, &store).unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].execution_error.is_some());
    assert!(!results[0].receipt.exit_code.is_success());
}

#[test]
fn tipset_sibling_duplicate_considered_once() {
    let (alice, bob) = (Address::new_id(100), Address::new_id(101));
    let store = MemoryBlockstore::default();
    let mut st = StateTree::new(&store);
    st.set_actor(&alice, account_actor(100, 3)).unwrap();
    st.set_actor(&bob, account_actor(0, 0)).unwrap();

    // the same signed message lands in both sibling blocks
    let smsg = signed(transfer(alice, bob, 3, 10));
    let mcid = smsg.cid().unwrap();
    let ts = Tipset::new(vec![
        block(1, 1, vec![smsg.clone()]),
        block(1, 2, vec![smsg]),
    ])
    .unwrap();

    let res = process_tipset(&CancelToken::new(), &DefaultVm, &ts, &mut st, &store).unwrap();

    // the winning copy is the first occurrence in ticket order; the second
    // copy is skipped entirely rather than failed
    assert_eq!(res.results.len(), 1);
    assert!(res.successes.contains(&mcid));
    assert_eq!(res.successes.len(), 1);
    assert!(res.failures.is_empty());

    // the sender nonce is charged exactly once
    let a = st.get_actor(&alice).unwrap().unwrap();
    assert_eq!(a.sequence, 4);
    assert_eq!(a.balance, TokenAmount::from(90u8));
}

#[test]
fn tipset_blocks_apply_in_ticket_order() {
    let (alice, bob) = (Address::new_id(100), Address::new_id(101));
    let store = MemoryBlockstore::default();
    let mut st = StateTree::new(&store);
    st.set_actor(&alice, account_actor(100, 3)).unwrap();
    st.set_actor(&bob, account_actor(0, 0)).unwrap();

    // handed over out of order: the nonce sequence only works out if the
    // smaller ticket is applied first
    let ts = Tipset::new(vec![
        block(1, 2, vec![signed(transfer(alice, bob, 4, 1))]),
        block(1, 1, vec![signed(transfer(alice, bob, 3, 1))]),
    ])
    .unwrap();

    let res = process_tipset(&CancelToken::new(), &DefaultVm, &ts, &mut st, &store).unwrap();
    assert_eq!(res.successes.len(), 2);
    assert!(res.failures.is_empty());
    assert_eq!(st.get_actor(&alice).unwrap().unwrap().sequence, 5);
}

#[test]
fn tipset_conflicting_siblings_reported_in_failures() {
    let (alice, bob, carol) = (
        Address::new_id(100),
        Address::new_id(101),
        Address::new_id(102),
    );
    let store = MemoryBlockstore::default();
    let mut st = StateTree::new(&store);
    st.set_actor(&alice, account_actor(100, 3)).unwrap();
    st.set_actor(&bob, account_actor(0, 0)).unwrap();
    st.set_actor(&carol, account_actor(0, 0)).unwrap();

    // distinct messages spending the same nonce: the loser becomes a
    // permanent failure in its block, but the tipset stays processable
    let winner = signed(transfer(alice, bob, 3, 10));
    let loser = signed(transfer(alice, carol, 3, 10));
    let (winner_cid, loser_cid) = (winner.cid().unwrap(), loser.cid().unwrap());

    let ts = Tipset::new(vec![block(1, 1, vec![winner]), block(1, 2, vec![loser])]).unwrap();

    let res = process_tipset(&CancelToken::new(), &DefaultVm, &ts, &mut st, &store).unwrap();

    assert!(res.successes.contains(&winner_cid));
    assert!(res.failures.contains(&loser_cid));
    assert_eq!(res.results.len(), 1);

    let a = st.get_actor(&alice).unwrap().unwrap();
    assert_eq!(a.sequence, 4);
    assert_eq!(
        st.get_actor(&bob).unwrap().unwrap().balance,
        TokenAmount::from(10u8)
    );
    assert_eq!(
        st.get_actor(&carol).unwrap().unwrap().balance,
        TokenAmount::from(0u8)
    );
}

#[test]
fn tipset_message_outcome_lands_in_exactly_one_set() {
    let (alice, bob) = (Address::new_id(100), Address::new_id(101));
    let store = MemoryBlockstore::default();
    let mut st = StateTree::new(&store);
    st.set_actor(&alice, account_actor(100, 3)).unwrap();
    st.set_actor(&bob, account_actor(0, 0)).unwrap();

    let ok_msg = signed(transfer(alice, bob, 3, 10));
    let stale = signed(transfer(alice, bob, 0, 1));
    let ts = Tipset::new(vec![
        block(1, 1, vec![ok_msg.clone()]),
        block(1, 2, vec![stale.clone()]),
    ])
    .unwrap();

    let res = process_tipset(&CancelToken::new(), &DefaultVm, &ts, &mut st, &store).unwrap();

    for smsg in [&ok_msg, &stale] {
        let mcid = smsg.cid().unwrap();
        let in_successes = res.successes.contains(&mcid);
        let in_failures = res.failures.contains(&mcid);
        assert!(
            in_successes != in_failures,
            "message {} must land in exactly one outcome set",
            smsg.sequence()
        );
    }
}

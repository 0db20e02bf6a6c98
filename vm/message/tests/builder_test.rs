// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use ember_message::{Message, SignedMessage, UnsignedMessage};
use ember_vm::TokenAmount;
use fvm_ipld_encoding::{Cbor, RawBytes};
use fvm_shared::address::Address;
use fvm_shared::crypto::signature::Signature;

#[test]
fn generate_signed_message() {
    let msg = UnsignedMessage::builder()
        .to(Address::new_id(1))
        .from(Address::new_id(2))
        .sequence(0)
        .value(TokenAmount::from(6u8))
        .method(String::new())
        .params(RawBytes::default())
        .build()
        .unwrap();

    let signed = SignedMessage::new(msg.clone(), Signature::new_secp256k1(vec![0; 65]));

    // Assert message and signature are expected
    assert_eq!(signed.message(), &msg);
    assert_eq!(
        signed.signature(),
        &Signature::new_secp256k1(vec![0; 65])
    );
}

#[test]
fn builder_defaults() {
    let msg = UnsignedMessage::builder()
        .to(Address::new_id(1))
        .from(Address::new_id(2))
        .build()
        .unwrap();

    assert_eq!(msg.sequence(), 0);
    assert_eq!(msg.value(), &TokenAmount::default());
    assert_eq!(msg.method(), "");
    assert!(msg.params().is_empty());
}

#[test]
fn message_cids_track_content() {
    let build = |sequence: u64| {
        UnsignedMessage::builder()
            .to(Address::new_id(1))
            .from(Address::new_id(2))
            .sequence(sequence)
            .build()
            .unwrap()
    };

    let a = build(3);
    let b = build(3);
    let c = build(4);
    assert_eq!(a.cid().unwrap(), b.cid().unwrap());
    assert_ne!(a.cid().unwrap(), c.cid().unwrap());
}

// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use cid::{multihash::Multihash, Cid};
use fvm_ipld_encoding::IPLD_RAW;
use lazy_static::lazy_static;

lazy_static! {
    /// Code identifier of the account actor, the only actor kind permitted
    /// to originate external messages.
    pub static ref ACCOUNT_ACTOR_CODE_ID: Cid = make_builtin(b"ember/1/account");
}

fn make_builtin(bz: &[u8]) -> Cid {
    Cid::new_v1(IPLD_RAW, Multihash::wrap(0, bz).expect("name too long"))
}

/// Tests whether a code cid represents the account actor.
pub fn is_account_actor(code: &Cid) -> bool {
    code == &*ACCOUNT_ACTOR_CODE_ID
}

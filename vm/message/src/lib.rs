// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod cid_set;
mod message_receipt;
mod signed_message;
mod unsigned_message;

pub use self::cid_set::*;
pub use self::message_receipt::*;
pub use self::signed_message::*;
pub use self::unsigned_message::*;

use ember_vm::TokenAmount;
use fvm_ipld_encoding::RawBytes;
use fvm_shared::address::Address;

/// Message interface to interact with signed and unsigned messages in a
/// generic context.
pub trait Message {
    /// Returns the from address of the message.
    fn from(&self) -> &Address;
    /// Returns the destination address of the message.
    fn to(&self) -> &Address;
    /// Returns the message sequence or nonce.
    fn sequence(&self) -> u64;
    /// Returns the amount sent in the message.
    fn value(&self) -> &TokenAmount;
    /// Returns the method invoked on the receiver.
    fn method(&self) -> &str;
    /// Returns the encoded parameters for the method call.
    fn params(&self) -> &RawBytes;
}

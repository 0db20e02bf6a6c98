// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::Message;
use derive_builder::Builder;
use ember_vm::{bigint_ser, TokenAmount};
use fvm_ipld_encoding::tuple::*;
use fvm_ipld_encoding::{Cbor, RawBytes};
use fvm_shared::address::Address;

/// Default unsigned message type which includes all data needed for a state
/// transition.
///
/// Usage:
/// ```
/// use ember_message::{Message, UnsignedMessage};
/// use fvm_shared::address::Address;
///
/// // Use the builder pattern to generate a message
/// let message = UnsignedMessage::builder()
///     .to(Address::new_id(0))
///     .from(Address::new_id(1))
///     .sequence(0) // optional
///     .value(Default::default()) // optional
///     .method(String::new()) // optional
///     .params(Default::default()) // optional
///     .build()
///     .unwrap();
/// assert_eq!(message.sequence(), 0);
/// ```
#[derive(PartialEq, Clone, Debug, Serialize_tuple, Deserialize_tuple, Builder)]
#[builder(name = "MessageBuilder")]
pub struct UnsignedMessage {
    pub from: Address,
    pub to: Address,
    #[builder(default)]
    pub sequence: u64,
    #[builder(default)]
    #[serde(with = "bigint_ser")]
    pub value: TokenAmount,
    #[builder(default)]
    pub method: String,
    #[builder(default)]
    pub params: RawBytes,
}

impl UnsignedMessage {
    pub fn builder() -> MessageBuilder {
        MessageBuilder::default()
    }
}

impl Message for UnsignedMessage {
    fn from(&self) -> &Address {
        &self.from
    }
    fn to(&self) -> &Address {
        &self.to
    }
    fn sequence(&self) -> u64 {
        self.sequence
    }
    fn value(&self) -> &TokenAmount {
        &self.value
    }
    fn method(&self) -> &str {
        &self.method
    }
    fn params(&self) -> &RawBytes {
        &self.params
    }
}

impl Cbor for UnsignedMessage {}

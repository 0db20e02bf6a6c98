// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use super::{Message, UnsignedMessage};
use ember_vm::TokenAmount;
use fvm_ipld_encoding::tuple::*;
use fvm_ipld_encoding::{Cbor, RawBytes};
use fvm_shared::address::Address;
use fvm_shared::crypto::signature::Signature;

/// Represents a wrapped message with signature bytes.
#[derive(PartialEq, Clone, Debug, Serialize_tuple, Deserialize_tuple)]
pub struct SignedMessage {
    message: UnsignedMessage,
    signature: Signature,
}

impl SignedMessage {
    /// Wraps a message with a signature produced elsewhere. Validation of
    /// the signature happens on ingestion, before messages reach the engine.
    pub fn new(message: UnsignedMessage, signature: Signature) -> Self {
        SignedMessage { message, signature }
    }

    pub fn message(&self) -> &UnsignedMessage {
        &self.message
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }
}

impl Message for SignedMessage {
    fn from(&self) -> &Address {
        self.message.from()
    }
    fn to(&self) -> &Address {
        self.message.to()
    }
    fn sequence(&self) -> u64 {
        self.message.sequence()
    }
    fn value(&self) -> &TokenAmount {
        self.message.value()
    }
    fn method(&self) -> &str {
        self.message.method()
    }
    fn params(&self) -> &RawBytes {
        self.message.params()
    }
}

impl Cbor for SignedMessage {}

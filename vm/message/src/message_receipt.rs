// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use ember_vm::ExitCode;
use fvm_ipld_encoding::tuple::*;
use fvm_ipld_encoding::RawBytes;

/// Result of a state transition from a message.
#[derive(PartialEq, Clone, Debug, Serialize_tuple, Deserialize_tuple)]
pub struct MessageReceipt {
    pub exit_code: ExitCode,
    pub return_data: Vec<RawBytes>,
}

// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod actor_state;
mod error;
mod token;

pub use self::actor_state::*;
pub use self::error::*;
pub use self::token::*;

pub use fvm_shared::error::ExitCode;

// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod block;
mod errors;
mod ticket;
mod tipset;

pub use self::block::*;
pub use self::errors::*;
pub use self::ticket::*;
pub use self::tipset::*;

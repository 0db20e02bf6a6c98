// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

mod default_vm;
mod rand;
mod vm;

pub use self::default_vm::*;
pub use self::rand::*;
pub use self::vm::*;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation handle for message processing.
///
/// Cancellation is honored between messages only: once a message's VM
/// invocation has begun it runs to completion, and the batch unwinds with
/// [`ember_vm::ApplyError::Cancelled`] before the next message starts.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of the processing this token was handed to.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use fvm_shared::error::ExitCode;
use thiserror::Error;

/// Closed set of causes for which a message's state effects are rolled back.
///
/// These are only constructed by the message application path; they shouldn't
/// be used in any other context as they are an implementation detail.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RevertCause {
    #[error("account not found")]
    AccountNotFound,
    #[error("nonce too high")]
    NonceTooHigh,
    #[error("nonce too low")]
    NonceTooLow,
    #[error("cannot send to self")]
    SelfSend,
    #[error("message from non-account actor")]
    NonAccountActor,
    #[error("cannot transfer negative value")]
    NegativeValue,
    #[error("insufficient funds")]
    InsufficientFunds,
    /// Any other failure raised by actor code during execution.
    #[error("actor error (exit code {exit_code:?}): {msg}")]
    ActorError { exit_code: ExitCode, msg: String },
}

/// How a rolled-back message is presented to callers of the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CauseClass {
    /// The message can never become valid against this state history.
    Permanent,
    /// The message may become valid later.
    Temporary,
    /// The message is consumed: applied, with an execution error recorded.
    Execution,
}

impl RevertCause {
    /// Total classification of every cause. Making this a match on a closed
    /// enum is what keeps "error is neither fault, perm or temp" unrepresentable.
    pub fn class(&self) -> CauseClass {
        match self {
            RevertCause::AccountNotFound | RevertCause::NonceTooHigh => CauseClass::Temporary,
            RevertCause::NonceTooLow
            | RevertCause::SelfSend
            | RevertCause::NonAccountActor
            | RevertCause::NegativeValue => CauseClass::Permanent,
            RevertCause::InsufficientFunds | RevertCause::ActorError { .. } => {
                CauseClass::Execution
            }
        }
    }

    /// Exit code recorded on the receipt when this cause rides along with an
    /// applied message.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            RevertCause::AccountNotFound | RevertCause::NonAccountActor => {
                ExitCode::SYS_SENDER_INVALID
            }
            RevertCause::NonceTooHigh | RevertCause::NonceTooLow => {
                ExitCode::SYS_SENDER_STATE_INVALID
            }
            RevertCause::SelfSend | RevertCause::NegativeValue => ExitCode::USR_ILLEGAL_ARGUMENT,
            RevertCause::InsufficientFunds => ExitCode::USR_INSUFFICIENT_FUNDS,
            RevertCause::ActorError { exit_code, .. } => *exit_code,
        }
    }
}

/// Error channel between the VM and the engine: a system fault the engine
/// cannot reason about, or a rollback with a classified cause.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum VmError {
    #[error("fault: {0}")]
    Fault(String),
    #[error(transparent)]
    Revert(#[from] RevertCause),
}

impl VmError {
    pub fn fault(msg: impl Into<String>) -> Self {
        VmError::Fault(msg.into())
    }

    /// Returns true if the error is a system fault.
    pub fn is_fault(&self) -> bool {
        matches!(self, VmError::Fault(_))
    }
}

/// Errors surfaced by message application.
///
/// Every failure to apply a message satisfies exactly one of the three
/// predicates `is_fault`, `is_permanent`, `is_temporary`:
/// - fault: stop the current transition, no guarantees are made about the
///   state tree (cancellation surfaces here, see [`ApplyError::is_cancelled`]);
/// - permanent: the message will never apply against this chain, discard it;
/// - temporary: the message may apply later, keep it in the pool.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ApplyError {
    #[error("fault: {0}")]
    Fault(String),
    #[error("processing cancelled")]
    Cancelled,
    #[error("permanent apply failure: {0}")]
    Permanent(RevertCause),
    #[error("temporary apply failure: {0}")]
    Temporary(RevertCause),
}

impl ApplyError {
    pub fn fault(msg: impl Into<String>) -> Self {
        ApplyError::Fault(msg.into())
    }

    /// Returns true for any error that must halt the current transition.
    pub fn is_fault(&self) -> bool {
        matches!(self, ApplyError::Fault(_) | ApplyError::Cancelled)
    }

    /// Returns true if the transition was unwound by the caller's
    /// cancellation handle rather than a real fault.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApplyError::Cancelled)
    }

    pub fn is_permanent(&self) -> bool {
        matches!(self, ApplyError::Permanent(_))
    }

    pub fn is_temporary(&self) -> bool {
        matches!(self, ApplyError::Temporary(_))
    }
}

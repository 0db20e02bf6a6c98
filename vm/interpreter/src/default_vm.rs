// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use ember_actor::is_account_actor;
use ember_message::UnsignedMessage;
use ember_state_tree::CachedStateTree;
use ember_vm::{ExitCode, RevertCause, TokenAmount, VmError};
use fvm_ipld_blockstore::Blockstore;
use fvm_ipld_encoding::RawBytes;
use fvm_shared::address::Address;
use fvm_shared::clock::ChainEpoch;
use num_traits::{Signed, Zero};

/// Everything an executor may see while running one message: the parties,
/// the message, the state overlay, the content store, and the height the
/// containing block is applied at.
///
/// The context borrows the overlay created by message application; nothing
/// beneath this point can reach the base state tree.
pub struct VmContext<'a, 'b, 'db, S> {
    pub from: Address,
    pub to: Address,
    pub message: &'a UnsignedMessage,
    pub state: &'a mut CachedStateTree<'b, 'db, S>,
    pub store: &'a S,
    pub block_height: ChainEpoch,
}

/// Data returned by an executor for a completed invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct InvocationOutput {
    pub return_data: Vec<RawBytes>,
    pub exit_code: ExitCode,
}

impl InvocationOutput {
    /// Output of an invocation that returned nothing and succeeded.
    pub fn ok() -> Self {
        Self {
            return_data: Vec::new(),
            exit_code: ExitCode::OK,
        }
    }
}

/// Black-box actor executor seam.
///
/// Implementations receive a context holding the message parties and the
/// state overlay, run the invocation, and report its output or a classified
/// error: a `Revert` rolls the overlay back, a `Fault` halts the transition.
pub trait Vm<S: Blockstore> {
    /// Sends the context's message to its receiver.
    fn send(&self, ctx: &mut VmContext<'_, '_, '_, S>) -> Result<InvocationOutput, VmError>;
}

/// Reference executor with the semantics builtin actors rely on: value
/// transfer between sender and receiver, then method dispatch by the
/// receiver's installed code.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultVm;

impl<S: Blockstore> Vm<S> for DefaultVm {
    fn send(&self, ctx: &mut VmContext<'_, '_, '_, S>) -> Result<InvocationOutput, VmError> {
        let msg = ctx.message;

        if msg.value.is_negative() {
            return Err(RevertCause::NegativeValue.into());
        }
        if !msg.value.is_zero() {
            transfer(ctx, &msg.value)?;
        }

        if !msg.method.is_empty() {
            return dispatch(ctx);
        }

        Ok(InvocationOutput::ok())
    }
}

/// Moves value from the sender to the receiver on the overlay.
fn transfer<S: Blockstore>(
    ctx: &mut VmContext<'_, '_, '_, S>,
    value: &TokenAmount,
) -> Result<(), VmError> {
    let (from, to) = (ctx.from, ctx.to);

    let mut from_actor = ctx
        .state
        .get_actor(&from)
        .map_err(|e| VmError::fault(format!("failed to load sender actor {from}: {e}")))?
        .ok_or_else(|| VmError::fault(format!("sender actor {from} missing during transfer")))?;
    let mut to_actor = ctx
        .state
        .get_actor(&to)
        .map_err(|e| VmError::fault(format!("failed to load receiver actor {to}: {e}")))?
        .ok_or_else(|| VmError::fault(format!("receiver actor {to} missing during transfer")))?;

    from_actor
        .deduct_funds(value)
        .map_err(|_| RevertCause::InsufficientFunds)?;
    to_actor.deposit_funds(value);

    ctx.state
        .set_actor(&from, from_actor)
        .map_err(|e| VmError::fault(format!("failed to store sender actor {from}: {e}")))?;
    ctx.state
        .set_actor(&to, to_actor)
        .map_err(|e| VmError::fault(format!("failed to store receiver actor {to}: {e}")))?;

    Ok(())
}

/// Dispatches a method call through the receiver's installed code.
fn dispatch<S: Blockstore>(ctx: &mut VmContext<'_, '_, '_, S>) -> Result<InvocationOutput, VmError> {
    let to = ctx.to;
    let to_actor = ctx
        .state
        .get_actor(&to)
        .map_err(|e| VmError::fault(format!("failed to load receiver actor {to}: {e}")))?
        .ok_or_else(|| VmError::fault(format!("receiver actor {to} missing during dispatch")))?;

    let method = &ctx.message.method;
    match &to_actor.code {
        // The account actor exports no methods.
        Some(code) if is_account_actor(code) => Err(RevertCause::ActorError {
            exit_code: ExitCode::USR_UNHANDLED_MESSAGE,
            msg: format!("account actor does not export method {method}"),
        }
        .into()),
        Some(code) => Err(RevertCause::ActorError {
            exit_code: ExitCode::USR_UNHANDLED_MESSAGE,
            msg: format!("no code registered for receiver code {code}"),
        }
        .into()),
        None => Err(RevertCause::ActorError {
            exit_code: ExitCode::USR_UNHANDLED_MESSAGE,
            msg: format!("method {method} called on actor with no code"),
        }
        .into()),
    }
}

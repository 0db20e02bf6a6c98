// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::{CancelToken, InvocationOutput, Vm, VmContext};
use cid::Cid;
use ember_actor::{account, is_account_actor};
use ember_blocks::{Block, Tipset};
use ember_message::{Message, MessageReceipt, SignedMessage, SortedCidSet, UnsignedMessage};
use ember_state_tree::{CachedStateTree, StateTree};
use ember_vm::{ActorState, ApplyError, CauseClass, ExitCode, RevertCause, VmError};
use fvm_ipld_blockstore::Blockstore;
use fvm_ipld_encoding::{Cbor, RawBytes};
use fvm_shared::address::Address;
use fvm_shared::clock::ChainEpoch;
use log::{debug, warn};
use std::collections::HashSet;

/// Contains the result of successfully applying one message.
///
/// A message can report an execution error and still be applied: its state
/// changes were rolled back, but the sender's nonce advanced, making the
/// message a consumed, non-replayable event.
#[derive(Clone, Debug, PartialEq)]
pub struct ApplicationResult {
    pub receipt: MessageReceipt,
    pub execution_error: Option<RevertCause>,
}

/// Output of [`apply_messages`]. It exists to prevent callers from
/// mistakenly mixing up outputs of the same type.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ApplyMessagesResponse {
    pub results: Vec<ApplicationResult>,
    pub successful_messages: Vec<SignedMessage>,
    pub permanent_failures: Vec<SignedMessage>,
    pub temporary_failures: Vec<SignedMessage>,

    /// Application errors paired with the failure groupings above.
    pub permanent_errors: Vec<ApplyError>,
    pub temporary_errors: Vec<ApplyError>,
}

/// Records the results of successfully applied messages and the sets of
/// successful and failed message cids across a tipset. Success and failure
/// information is key for matching user messages with receipts when sibling
/// blocks carry conflicting messages.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProcessTipsetResponse {
    pub results: Vec<ApplicationResult>,
    pub successes: SortedCidSet,
    pub failures: SortedCidSet,
}

/// Applies a message to a state tree. This is the sole driver of state tree
/// transitions in the system: both block validation and mining flow through
/// it, so treat any change to it with extreme care.
///
/// Returning `Ok` means the message was successfully applied: the sender's
/// nonce advanced and the message belongs in a block. It does not
/// necessarily mean the sender's intent was realized; an invocation that
/// errors inside the VM is in many cases still applied, with its state
/// changes rolled back and the error recorded on the result. Failing
/// transfers in particular are consumed rather than rejected, so that an
/// underfunded message still spends its nonce and cannot be replayed.
///
/// Returning `Err` means the message was not applied, and exactly one of
/// the [`ApplyError`] predicates holds:
/// - `is_fault`: a system fault occurred (corrupt store, violated
///   precondition); stop the current transition, no guarantees are made
///   about the state tree;
/// - `is_permanent`: the message can never become applyable against this
///   chain (nonce too low, self-send, non-account sender, negative value);
///   callers should discard it;
/// - `is_temporary`: the message may become applyable later (sender not yet
///   created, nonce too high); callers may keep it in their pool.
///
/// In every `Err` case all state mutations have been reverted.
pub fn apply_message<S, V>(
    ctx: &CancelToken,
    vm: &V,
    st: &mut StateTree<'_, S>,
    store: &S,
    msg: &UnsignedMessage,
    block_height: ChainEpoch,
) -> Result<ApplicationResult, ApplyError>
where
    S: Blockstore,
    V: Vm<S>,
{
    if ctx.is_cancelled() {
        return Err(ApplyError::Cancelled);
    }

    let mut cache = CachedStateTree::new(st);
    let attempt = attempt_apply_message(vm, &mut cache, store, msg, block_height);

    let (receipt, execution_error) = match attempt {
        Ok((receipt, None)) => {
            cache
                .commit()
                .map_err(|e| ApplyError::fault(format!("could not commit state tree: {e}")))?;
            (receipt, None)
        }
        Ok((receipt, Some(cause))) => match cause.class() {
            CauseClass::Permanent => return Err(ApplyError::Permanent(cause)),
            CauseClass::Temporary => return Err(ApplyError::Temporary(cause)),
            CauseClass::Execution => {
                // The invocation failed but the message is still applied:
                // the overlay is dropped and the nonce is charged below.
                warn!("apply message execution error: {cause}");
                drop(cache);
                (receipt, Some(cause))
            }
        },
        Err(VmError::Fault(e)) => return Err(ApplyError::Fault(e)),
        Err(VmError::Revert(cause)) => {
            debug!("apply message failed: {cause}");
            return Err(match cause.class() {
                CauseClass::Permanent => ApplyError::Permanent(cause),
                CauseClass::Temporary => ApplyError::Temporary(cause),
                // Execution-class causes always come back with a receipt.
                CauseClass::Execution => {
                    ApplyError::fault(format!("execution-class revert without a receipt: {cause}"))
                }
            });
        }
    };

    // At this point the message is considered successfully applied, so the
    // sender pays its nonce on the base tree; the overlay may already be
    // gone.
    st.mutate_actor(msg.from(), |act| {
        act.sequence += 1;
        Ok(())
    })
    .map_err(|e| ApplyError::fault(format!("could not increment sender sequence: {e}")))?;

    Ok(ApplicationResult {
        receipt,
        execution_error,
    })
}

/// Encapsulates the work of trying to apply the message, keeping
/// [`apply_message`] focused on classification and side effects. This is
/// the only place the write overlay is visible; callers never see it.
///
/// Pre-dispatch rejections surface as `Err(VmError::Revert(_))` and carry
/// no receipt. Reverts raised by the executor surface as
/// `Ok((receipt, Some(cause)))` so the caller can classify the cause while
/// keeping the receipt. Faults pass straight through.
fn attempt_apply_message<S, V>(
    vm: &V,
    st: &mut CachedStateTree<'_, '_, S>,
    store: &S,
    msg: &UnsignedMessage,
    block_height: ChainEpoch,
) -> Result<(MessageReceipt, Option<RevertCause>), VmError>
where
    S: Blockstore,
    V: Vm<S>,
{
    let mut from_actor = match st.get_actor(msg.from()) {
        Ok(Some(act)) => act,
        Ok(None) => return Err(RevertCause::AccountNotFound.into()),
        Err(e) => {
            return Err(VmError::fault(format!(
                "failed to get sender actor {}: {e}",
                msg.from()
            )))
        }
    };

    if msg.from() == msg.to() {
        return Err(RevertCause::SelfSend.into());
    }

    // Addresses are deterministic, so sending to a non-existent address
    // must not install code ahead of address activation: the receiver
    // starts as an empty, upgradable actor that can collect any balance
    // transferred to it.
    st.get_or_create_actor(msg.to(), || Ok(ActorState::default()))
        .map_err(|e| {
            VmError::fault(format!("failed to get receiver actor {}: {e}", msg.to()))
        })?;

    // An external message from an empty actor upgrades it to an account
    // actor.
    if from_actor.is_empty() {
        account::upgrade_actor(&mut from_actor)
            .map_err(|e| VmError::fault(format!("failed to upgrade empty actor: {e}")))?;
        st.set_actor(msg.from(), from_actor.clone())
            .map_err(|e| VmError::fault(format!("failed to store upgraded actor: {e}")))?;
    }

    // Only account actors may originate external messages.
    match &from_actor.code {
        Some(code) if is_account_actor(code) => {}
        _ => return Err(RevertCause::NonAccountActor.into()),
    }

    if msg.sequence() < from_actor.sequence {
        return Err(RevertCause::NonceTooLow.into());
    }
    if msg.sequence() > from_actor.sequence {
        return Err(RevertCause::NonceTooHigh.into());
    }

    let mut vm_ctx = VmContext {
        from: *msg.from(),
        to: *msg.to(),
        message: msg,
        state: st,
        store,
        block_height,
    };

    match vm.send(&mut vm_ctx) {
        Ok(InvocationOutput {
            return_data,
            exit_code,
        }) => Ok((
            MessageReceipt {
                exit_code,
                return_data,
            },
            None,
        )),
        Err(VmError::Fault(e)) => Err(VmError::Fault(e)),
        Err(VmError::Revert(cause)) => Ok((
            MessageReceipt {
                exit_code: cause.exit_code(),
                return_data: Vec::new(),
            },
            Some(cause),
        )),
    }
}

/// Applies an ordered sequence of signed messages to a state tree,
/// grouping messages into successes, permanent failures and temporary
/// failures along with the errors raised for each failure group. Returns
/// an error iff a fault occurs; classified failures never abort the batch.
pub fn apply_messages<S, V>(
    ctx: &CancelToken,
    vm: &V,
    messages: &[SignedMessage],
    st: &mut StateTree<'_, S>,
    store: &S,
    block_height: ChainEpoch,
) -> Result<ApplyMessagesResponse, ApplyError>
where
    S: Blockstore,
    V: Vm<S>,
{
    let mut ret = ApplyMessagesResponse::default();

    for smsg in messages {
        // Cancellation is honored between messages only.
        if ctx.is_cancelled() {
            return Err(ApplyError::Cancelled);
        }

        // Only the message is applied; its signature was validated before
        // it reached the engine.
        match apply_message(ctx, vm, st, store, smsg.message(), block_height) {
            Ok(r) => {
                ret.successful_messages.push(smsg.clone());
                ret.results.push(r);
            }
            Err(err) if err.is_permanent() => {
                ret.permanent_failures.push(smsg.clone());
                ret.permanent_errors.push(err);
            }
            Err(err) if err.is_temporary() => {
                ret.temporary_failures.push(smsg.clone());
                ret.temporary_errors.push(err);
            }
            // Faults abort the batch with no response.
            Err(err) => return Err(err),
        }
    }

    Ok(ret)
}

/// Entrypoint for validating the state transitions of the messages in a
/// block: applies the block's messages at the block's height, accumulating
/// changes in the state tree and returning the application results.
///
/// An error signals that the block contains a message which should not have
/// been included. For block validation the distinction between permanent
/// and temporary hardly matters, since either way the block carries a bad
/// message and should be thrown out. Faults must still be recognized by the
/// caller, as they mean the transition itself cannot be trusted.
/// Successful application of a message does not imply its invocation
/// succeeded, only that the transition was valid.
pub fn process_block<S, V>(
    ctx: &CancelToken,
    vm: &V,
    blk: &Block,
    st: &mut StateTree<'_, S>,
    store: &S,
) -> Result<Vec<ApplicationResult>, ApplyError>
where
    S: Blockstore,
    V: Vm<S>,
{
    let mut res = apply_messages(ctx, vm, &blk.messages, st, store, blk.height)?;
    if !res.permanent_errors.is_empty() {
        return Err(res.permanent_errors.remove(0));
    }
    if !res.temporary_errors.is_empty() {
        return Err(res.temporary_errors.remove(0));
    }
    Ok(res.results)
}

/// Computes the combined state transition specified by the messages in all
/// blocks of a tipset.
///
/// Relies on the precondition that each member block is individually valid
/// with respect to the base state, i.e. [`process_block`] is free of errors
/// when applied to each block over the given state. Only faults abort
/// processing: other application errors trace back to conflicting messages
/// between sibling blocks and are reported through the response's failure
/// set. Blocks are applied in the sorted order of their tickets.
pub fn process_tipset<S, V>(
    ctx: &CancelToken,
    vm: &V,
    ts: &Tipset,
    st: &mut StateTree<'_, S>,
    store: &S,
) -> Result<ProcessTipsetResponse, ApplyError>
where
    S: Blockstore,
    V: Vm<S>,
{
    // Member blocks must agree on the height their messages apply at.
    let block_height = ts.epoch();
    if ts.blocks().iter().any(|blk| blk.height != block_height) {
        return Err(ApplyError::fault(
            "processing tipset with non-uniform heights",
        ));
    }

    let mut res = ProcessTipsetResponse::default();
    let mut msg_filter: HashSet<Cid> = HashSet::new();

    // Tipset construction ordered the blocks by ticket.
    for blk in ts.blocks() {
        // Drop any message already considered for an earlier sibling. The
        // first occurrence in ticket order wins; later copies must not be
        // retried, so each sender nonce is charged exactly once. Every
        // considered cid enters the filter regardless of its outcome.
        let mut msgs = Vec::with_capacity(blk.messages.len());
        for smsg in &blk.messages {
            let mcid = smsg
                .cid()
                .map_err(|e| ApplyError::fault(format!("error getting message cid: {e}")))?;
            if msg_filter.insert(mcid) {
                msgs.push(smsg.clone());
            }
        }

        let amres = apply_messages(ctx, vm, &msgs, st, store, block_height)?;

        for smsg in &amres.successful_messages {
            let mcid = smsg
                .cid()
                .map_err(|e| ApplyError::fault(format!("error getting message cid: {e}")))?;
            res.successes.insert(mcid);
        }
        for smsg in amres
            .permanent_failures
            .iter()
            .chain(amres.temporary_failures.iter())
        {
            let mcid = smsg
                .cid()
                .map_err(|e| ApplyError::fault(format!("error getting message cid: {e}")))?;
            res.failures.insert(mcid);
        }
        res.results.extend(amres.results);
    }

    Ok(res)
}

/// Calls a read-only method on an actor in the given state tree. It makes
/// no changes to the stored state and is useful for interrogating actor
/// state from external read APIs: the overlay built for the call is never
/// committed and the store is never flushed, so no observable change can
/// reach the state tree. The block height is optional; executors may
/// ignore it.
pub fn call_query_method<S, V>(
    ctx: &CancelToken,
    vm: &V,
    st: &mut StateTree<'_, S>,
    store: &S,
    to: Address,
    method: &str,
    params: &[u8],
    from: Address,
    opt_height: Option<ChainEpoch>,
) -> Result<(Vec<RawBytes>, ExitCode, Option<RevertCause>), ApplyError>
where
    S: Blockstore,
    V: Vm<S>,
{
    if ctx.is_cancelled() {
        return Err(ApplyError::Cancelled);
    }

    // A query against an actor absent from this state can never succeed
    // against it.
    st.get_actor(&to)
        .map_err(|e| ApplyError::fault(format!("failed to get receiver actor {to}: {e}")))?
        .ok_or(ApplyError::Permanent(RevertCause::AccountNotFound))?;

    let mut cache = CachedStateTree::new(st);

    let msg = UnsignedMessage::builder()
        .from(from)
        .to(to)
        .method(method.to_owned())
        .params(RawBytes::new(params.to_vec()))
        .build()
        .map_err(|e| ApplyError::fault(format!("failed to build query message: {e}")))?;

    let mut vm_ctx = VmContext {
        from,
        to,
        message: &msg,
        state: &mut cache,
        store,
        block_height: opt_height.unwrap_or_default(),
    };

    match vm.send(&mut vm_ctx) {
        Ok(InvocationOutput {
            return_data,
            exit_code,
        }) => Ok((return_data, exit_code, None)),
        Err(VmError::Fault(e)) => Err(ApplyError::Fault(e)),
        Err(VmError::Revert(cause)) => Ok((Vec::new(), cause.exit_code(), Some(cause))),
    }
}

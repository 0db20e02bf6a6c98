// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::ACCOUNT_ACTOR_CODE_ID;
use ember_vm::ActorState;

/// Upgrades an empty actor into an account actor in place, preserving its
/// balance and sequence. Upgrading an actor that already carries the account
/// code is a no-op; any other installed code refuses the upgrade.
pub fn upgrade_actor(actor: &mut ActorState) -> Result<(), String> {
    match &actor.code {
        None => {
            actor.code = Some(*ACCOUNT_ACTOR_CODE_ID);
            Ok(())
        }
        Some(code) if code == &*ACCOUNT_ACTOR_CODE_ID => Ok(()),
        Some(code) => Err(format!("cannot upgrade actor with code {}", code)),
    }
}

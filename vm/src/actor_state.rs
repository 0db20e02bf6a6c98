// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::{bigint_ser, TokenAmount};
use cid::Cid;
use fvm_ipld_encoding::tuple::*;

/// On-chain record of a single actor.
///
/// An actor with no code is *empty*: it can hold balance transferred to it
/// but cannot originate messages until upgraded to an account actor.
#[derive(PartialEq, Eq, Clone, Debug, Default, Serialize_tuple, Deserialize_tuple)]
pub struct ActorState {
    /// Link to code for the actor, if any has been installed.
    pub code: Option<Cid>,
    /// Link to the actor's state root, if it has stored any.
    pub head: Option<Cid>,
    /// Expected sequence number of the next message from this actor.
    pub sequence: u64,
    /// Tokens available to the actor.
    #[serde(with = "bigint_ser")]
    pub balance: TokenAmount,
}

impl ActorState {
    /// Constructor for actor state.
    pub fn new(code: Option<Cid>, head: Option<Cid>, balance: TokenAmount, sequence: u64) -> Self {
        Self {
            code,
            head,
            sequence,
            balance,
        }
    }

    /// Returns true when no code has been installed on the actor.
    pub fn is_empty(&self) -> bool {
        self.code.is_none()
    }

    /// Safely deducts funds from an actor.
    pub fn deduct_funds(&mut self, amt: &TokenAmount) -> Result<(), String> {
        if &self.balance < amt {
            return Err("not enough funds".to_owned());
        }
        self.balance -= amt;

        Ok(())
    }

    /// Deposits funds into an actor.
    pub fn deposit_funds(&mut self, amt: &TokenAmount) {
        self.balance += amt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fund_accounting() {
        let mut act = ActorState::new(None, None, TokenAmount::from(10u8), 0);
        act.deposit_funds(&TokenAmount::from(5u8));
        assert_eq!(act.balance, TokenAmount::from(15u8));

        act.deduct_funds(&TokenAmount::from(15u8)).unwrap();
        assert_eq!(act.balance, TokenAmount::from(0u8));

        // overdraft leaves the balance untouched
        assert!(act.deduct_funds(&TokenAmount::from(1u8)).is_err());
        assert_eq!(act.balance, TokenAmount::from(0u8));
    }

    #[test]
    fn empty_actor_default() {
        let act = ActorState::default();
        assert!(act.is_empty());
        assert_eq!(act.sequence, 0);
        assert_eq!(act.balance, TokenAmount::default());
    }
}

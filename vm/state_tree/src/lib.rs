// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use anyhow::anyhow;
use cid::Cid;
use ember_vm::ActorState;
use fvm_ipld_blockstore::Blockstore;
use fvm_ipld_hamt::{BytesKey, Hamt};
use fvm_shared::address::Address;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Bit width of the HAMT backing the state tree.
pub const HAMT_BIT_WIDTH: u32 = 5;

/// State tree implementation using a HAMT over a content-addressed store.
///
/// Reads within one message application observe a consistent snapshot of the
/// underlying store; writes are buffered until [`StateTree::flush`].
pub struct StateTree<'db, S> {
    hamt: Hamt<&'db S, ActorState>,
    store: &'db S,

    /// Cache of loaded and pending actor states, folded into the HAMT on flush.
    cache: RwLock<HashMap<Address, ActorState>>,
}

impl<'db, S> StateTree<'db, S>
where
    S: Blockstore,
{
    /// Constructor for an empty state tree.
    pub fn new(store: &'db S) -> Self {
        Self {
            hamt: Hamt::new_with_bit_width(store, HAMT_BIT_WIDTH),
            store,
            cache: RwLock::new(HashMap::default()),
        }
    }

    /// Constructor for a state tree rooted at a previously flushed cid.
    pub fn new_from_root(store: &'db S, root: &Cid) -> anyhow::Result<Self> {
        let hamt = Hamt::load_with_bit_width(root, store, HAMT_BIT_WIDTH)?;
        Ok(Self {
            hamt,
            store,
            cache: RwLock::new(HashMap::default()),
        })
    }

    /// Retrieve a reference to the underlying store.
    pub fn store(&self) -> &'db S {
        self.store
    }

    /// Get the actor state at an address.
    pub fn get_actor(&self, addr: &Address) -> anyhow::Result<Option<ActorState>> {
        if let Some(state) = self.cache.read().get(addr) {
            return Ok(Some(state.clone()));
        }

        let act = self
            .hamt
            .get(&BytesKey(addr.to_bytes()))
            .map_err(|e| anyhow!("failed to load actor {}: {}", addr, e))?
            .cloned();

        // Populate the cache so repeated reads observe one snapshot.
        if let Some(act_s) = &act {
            self.cache.write().insert(*addr, act_s.clone());
        }

        Ok(act)
    }

    /// Set the actor state at an address. The write is buffered until flush.
    pub fn set_actor(&mut self, addr: &Address, actor: ActorState) -> anyhow::Result<()> {
        self.cache.write().insert(*addr, actor);
        Ok(())
    }

    /// Get the actor at an address, or install the state produced by `init`
    /// if none exists. `init` must be pure; it must not read chain state.
    pub fn get_or_create_actor<F>(&mut self, addr: &Address, init: F) -> anyhow::Result<ActorState>
    where
        F: FnOnce() -> anyhow::Result<ActorState>,
    {
        match self.get_actor(addr)? {
            Some(act) => Ok(act),
            None => {
                let act = init()?;
                self.set_actor(addr, act.clone())?;
                Ok(act)
            }
        }
    }

    /// Mutate and set the actor state at an address.
    pub fn mutate_actor<F>(&mut self, addr: &Address, mutate: F) -> anyhow::Result<()>
    where
        F: FnOnce(&mut ActorState) -> Result<(), String>,
    {
        let mut act = self
            .get_actor(addr)?
            .ok_or_else(|| anyhow!("actor for address {} does not exist", addr))?;

        mutate(&mut act).map_err(|e| anyhow!(e))?;
        self.set_actor(addr, act)
    }

    /// Flush buffered writes into the store and return the new root cid.
    pub fn flush(&mut self) -> anyhow::Result<Cid> {
        let mut cache = self.cache.write();
        for (addr, state) in cache.drain() {
            self.hamt
                .set(BytesKey(addr.to_bytes()), state)
                .map_err(|e| anyhow!("failed to write actor {}: {}", addr, e))?;
        }
        drop(cache);

        Ok(self.hamt.flush()?)
    }
}

/// Overlay buffering tentative writes on top of a base state tree.
///
/// All state access beneath message application flows through the overlay:
/// either the buffered writes are committed into the base tree as one unit,
/// or the overlay is dropped and the base tree is left untouched.
pub struct CachedStateTree<'a, 'db, S> {
    base: &'a mut StateTree<'db, S>,
    cache: HashMap<Address, ActorState>,
}

impl<'a, 'db, S> CachedStateTree<'a, 'db, S>
where
    S: Blockstore,
{
    pub fn new(base: &'a mut StateTree<'db, S>) -> Self {
        Self {
            base,
            cache: HashMap::default(),
        }
    }

    /// Retrieve a reference to the store backing the base tree.
    pub fn store(&self) -> &'db S {
        self.base.store()
    }

    /// Get the actor state from the overlay, falling back to the base tree.
    pub fn get_actor(&self, addr: &Address) -> anyhow::Result<Option<ActorState>> {
        if let Some(act) = self.cache.get(addr) {
            return Ok(Some(act.clone()));
        }
        self.base.get_actor(addr)
    }

    /// Set the actor state in the overlay. The base tree is not touched.
    pub fn set_actor(&mut self, addr: &Address, actor: ActorState) -> anyhow::Result<()> {
        self.cache.insert(*addr, actor);
        Ok(())
    }

    /// Get the actor at an address, or buffer the state produced by `init`
    /// if none exists in the overlay or the base tree.
    pub fn get_or_create_actor<F>(&mut self, addr: &Address, init: F) -> anyhow::Result<ActorState>
    where
        F: FnOnce() -> anyhow::Result<ActorState>,
    {
        match self.get_actor(addr)? {
            Some(act) => Ok(act),
            None => {
                let act = init()?;
                self.set_actor(addr, act.clone())?;
                Ok(act)
            }
        }
    }

    /// Fold every buffered write into the base tree.
    pub fn commit(self) -> anyhow::Result<()> {
        let CachedStateTree { base, cache } = self;
        for (addr, actor) in cache {
            base.set_actor(&addr, actor)?;
        }
        Ok(())
    }
}

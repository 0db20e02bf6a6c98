// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use cid::Cid;
use std::collections::BTreeSet;

/// Ordered set of content identifiers with deterministic iteration order.
///
/// Used to report which messages succeeded and which failed across the
/// sibling blocks of a tipset; the stable order lets callers match user
/// messages with receipts when siblings carry conflicting copies.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortedCidSet(BTreeSet<Cid>);

impl SortedCidSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a cid to the set. Returns false if the cid was already present.
    pub fn insert(&mut self, cid: Cid) -> bool {
        self.0.insert(cid)
    }

    pub fn contains(&self, cid: &Cid) -> bool {
        self.0.contains(cid)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates cids in their canonical sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &Cid> {
        self.0.iter()
    }
}

impl FromIterator<Cid> for SortedCidSet {
    fn from_iter<I: IntoIterator<Item = Cid>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

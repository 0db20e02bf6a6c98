// Copyright 2019-2023 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use crate::{Block, Error, Ticket};
use cid::Cid;
use fvm_ipld_encoding::Cbor;
use fvm_shared::clock::ChainEpoch;
use serde::{Deserialize, Serialize};

/// A set of cids forming a unique key for a tipset.
/// Equal keys will have equivalent iteration order, but note that the cids
/// are *not* maintained in the canonical iteration order of blocks in a
/// tipset (which is by ticket).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TipsetKeys {
    pub cids: Vec<Cid>,
}

impl TipsetKeys {
    pub fn new(cids: Vec<Cid>) -> Self {
        Self { cids }
    }

    /// Returns tipset header cids
    pub fn cids(&self) -> &[Cid] {
        &self.cids
    }
}

/// An immutable set of sibling blocks at the same height with the same
/// parent set. Blocks in a tipset are canonically ordered by ticket,
/// smallest first, with block cids breaking ties.
#[derive(Clone, Debug, PartialEq)]
pub struct Tipset {
    blocks: Vec<Block>,
}

#[allow(clippy::len_without_is_empty)]
impl Tipset {
    /// Builds a new tipset from a collection of blocks.
    /// A valid tipset contains a non-empty collection of blocks that all
    /// specify an identical height and identical parents.
    pub fn new(blocks: Vec<Block>) -> Result<Self, Error> {
        if blocks.is_empty() {
            return Err(Error::NoBlocks);
        }

        // validate conditions against the 0th block
        for blk in &blocks[1..] {
            if blk.parents != blocks[0].parents {
                return Err(Error::InvalidTipset("parent cids are not equal".to_string()));
            }
            if blk.height != blocks[0].height {
                return Err(Error::InvalidTipset("heights are not equal".to_string()));
            }
        }

        // sort blocks by ticket, breaking ties with the block cids, which
        // are distinct
        let mut keyed = Vec::with_capacity(blocks.len());
        for blk in blocks {
            let cid = blk
                .cid()
                .map_err(|e| Error::InvalidTipset(format!("could not get block cid: {e}")))?;
            keyed.push((blk.ticket.clone(), cid.to_bytes(), blk));
        }
        keyed.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));

        Ok(Self {
            blocks: keyed.into_iter().map(|(_, _, blk)| blk).collect(),
        })
    }

    /// Returns the height of the tipset.
    pub fn epoch(&self) -> ChainEpoch {
        self.blocks[0].height
    }

    /// Returns all blocks in the tipset, in canonical order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Returns all blocks in the tipset.
    pub fn into_blocks(self) -> Vec<Block> {
        self.blocks
    }

    /// Returns the number of blocks in the tipset.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns the smallest ticket of all blocks in the tipset.
    pub fn min_ticket(&self) -> &Ticket {
        &self.blocks[0].ticket
    }
}

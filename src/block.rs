//! A partition block: a bucket array plus the cell count used for the
//! balance criterion.

use crate::bucket::BucketArray;
use crate::cell::{self, Cell, CellId};
use crate::net::{Net, NetId};
use crate::side::Side;

/// One of the two halves of the partition.
#[derive(Clone, Debug)]
pub struct Block {
    name: Side,
    pub(crate) size: usize,
    pub(crate) bucket: BucketArray,
}

impl Block {
    /// An empty block named `name`, with a bucket array sized for `pmax`.
    pub fn new(name: Side, pmax: i32) -> Self {
        Block {
            name,
            size: 0,
            bucket: BucketArray::new(pmax),
        }
    }

    /// Which side of the partition this is.
    pub fn name(&self) -> Side {
        self.name
    }

    /// Number of cells currently assigned to this block.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The bucket array's cached highest non-empty gain slot.
    pub fn max_gain(&self) -> i32 {
        self.bucket.max_gain()
    }

    /// The next base-cell candidate from this block, or `None` if it has
    /// no free cells.
    pub fn get_candidate_base_cell(&self) -> Option<CellId> {
        self.bucket.get_candidate_base_cell()
    }

    /// Ingestion-time insert: the cell starts out staged (locked-equivalent)
    /// in the free-cell list and is bucketed by the first `initialize`.
    pub fn add_cell(&mut self, cells: &mut [Cell], id: CellId) {
        self.bucket.add_to_free_cell_list(cells, id);
        self.size += 1;
    }

    /// Count a permanently-restricted cell toward this block's size without
    /// ever staging it into the bucket array — it must never be unlocked by
    /// [`Block::initialize`].
    pub fn add_restricted_cell(&mut self) {
        self.size += 1;
    }

    /// Unlock and bucket every staged cell. Called once at ingestion (block
    /// A only) and at the start of every subsequent pass (both blocks).
    pub fn initialize(&mut self, cells: &mut [Cell], nets: &mut [Net]) {
        self.bucket.initialize(cells, nets);
    }
}

/// Move `id` to its complementary block, applying the critical-net gain
/// update: nets where the destination side is empty or singly-occupied get
/// their affected free cells' gains adjusted in O(1) per net, rather than
/// recomputing every incident cell's gain from scratch. Returns the total
/// cutset delta produced by this move (sum of each incident net's -1/0/+1).
pub fn move_cell(cells: &mut [Cell], nets: &mut [Net], blocks: &mut [Block; 2], id: CellId) -> i32 {
    let from = cells[id.0].block;
    let to = from.other();
    let net_ids: Vec<NetId> = cells[id.0].nets.clone();

    blocks[from.idx()].bucket.remove_cell(cells, id);
    cell::lock_cell(cells, nets, id);

    for &nid in &net_ids {
        match nets[nid.0].count(to) {
            0 => nets[nid.0].inc_gains_of_free_cells(cells, blocks),
            1 => nets[nid.0].dec_gain_of_free_cell(cells, blocks, to),
            _ => {}
        }
    }

    cells[id.0].block = to;
    let mut delta = 0i32;
    for &nid in &net_ids {
        delta += nets[nid.0].cell_to_block(cells, id, to);
    }

    for &nid in &net_ids {
        match nets[nid.0].count(from) {
            0 => nets[nid.0].dec_gains_of_free_cells(cells, blocks),
            1 => nets[nid.0].inc_gain_of_free_cell(cells, blocks, from),
            _ => {}
        }
    }

    blocks[to.idx()].bucket.add_to_free_cell_list(cells, id);
    blocks[from.idx()].size -= 1;
    blocks[to.idx()].size += 1;

    delta
}

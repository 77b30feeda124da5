//! The gain-indexed bucket array: O(1)-amortized priority structure over
//! free cells in a single block.

use crate::cell::{Cell, CellId};
use crate::link::{self, ListEnds};

/// A dense array of `2*pmax + 1` gain slots plus a staging list for locked
/// (or not-yet-bucketed) cells.
#[derive(Clone, Debug)]
pub struct BucketArray {
    pmax: i32,
    slots: Vec<ListEnds>,
    max_gain: i32,
    free_cell_list: ListEnds,
}

impl BucketArray {
    /// An empty array of `2*pmax + 1` gain slots, `max_gain` seeded at
    /// `-pmax` (the "array is empty" sentinel).
    pub fn new(pmax: i32) -> Self {
        debug_assert!(pmax >= 0);
        BucketArray {
            pmax,
            slots: vec![ListEnds::default(); (2 * pmax + 1) as usize],
            max_gain: -pmax,
            free_cell_list: ListEnds::default(),
        }
    }

    /// The maximum pin count this array was sized for; gains range over
    /// `[-pmax, pmax]`.
    pub fn pmax(&self) -> i32 {
        self.pmax
    }

    /// The cached highest gain whose slot is non-empty, or `-pmax` if the
    /// array holds no free cells.
    pub fn max_gain(&self) -> i32 {
        self.max_gain
    }

    /// Whether the staging list (locked or not-yet-bucketed cells) is empty.
    pub fn free_cell_list_is_empty(&self) -> bool {
        self.free_cell_list.is_empty()
    }

    fn slot_index(&self, gain: i32) -> usize {
        debug_assert!(-self.pmax <= gain && gain <= self.pmax, "gain {gain} out of range");
        (gain + self.pmax) as usize
    }

    /// Append `id` to `slot[cells[id].gain]`, updating `max_gain` if needed.
    pub fn add_cell(&mut self, cells: &mut [Cell], id: CellId) {
        let idx = self.slot_index(cells[id.0].gain);
        link::append(cells, &mut self.slots[idx], id);
        cells[id.0].staged = false;
        if cells[id.0].gain > self.max_gain {
            self.max_gain = cells[id.0].gain;
        }
    }

    /// Remove `id` from its current gain slot. If that slot was the
    /// `max_gain` slot and is now empty, slide `max_gain` down.
    pub fn remove_cell(&mut self, cells: &mut [Cell], id: CellId) {
        let idx = self.slot_index(cells[id.0].gain);
        link::unlink(cells, &mut self.slots[idx], id);
        let max_idx = self.slot_index(self.max_gain);
        if idx == max_idx && self.slots[max_idx].is_empty() {
            self.decrement_max_gain();
        }
    }

    /// Move a free cell to a new gain: remove it from its current slot,
    /// record the new gain, and re-insert. Only valid for free cells.
    pub fn yank_cell(&mut self, cells: &mut [Cell], id: CellId, new_gain: i32) {
        debug_assert!(!cells[id.0].locked, "only free cells may be yanked");
        self.remove_cell(cells, id);
        cells[id.0].gain = new_gain;
        self.add_cell(cells, id);
    }

    /// Stage a cell (locked, or not yet assigned a bucket) in the free-cell
    /// list until the next [`BucketArray::initialize`].
    pub fn add_to_free_cell_list(&mut self, cells: &mut [Cell], id: CellId) {
        link::append(cells, &mut self.free_cell_list, id);
        cells[id.0].staged = true;
    }

    /// O(pmax) worst case: slide `max_gain` down until it points at a
    /// non-empty slot, or reaches `-pmax`.
    pub fn decrement_max_gain(&mut self) {
        while self.max_gain > -self.pmax {
            self.max_gain -= 1;
            if !self.slots[self.slot_index(self.max_gain)].is_empty() {
                break;
            }
        }
    }

    /// The head of the `max_gain` slot, i.e. the next base-cell candidate
    /// from this array, or `None` if it has no free cells.
    pub fn get_candidate_base_cell(&self) -> Option<CellId> {
        self.slots[self.slot_index(self.max_gain)].head
    }

    /// Unlock and bucket every cell staged in the free-cell list, then clear
    /// the staging list. Run between passes to rehydrate the structure.
    pub fn initialize(&mut self, cells: &mut [Cell], nets: &mut [crate::net::Net]) {
        let mut staged = Vec::new();
        let mut cur = self.free_cell_list.head;
        while let Some(id) = cur {
            staged.push(id);
            cur = cells[id.0].next;
        }
        self.free_cell_list = ListEnds::default();
        for id in staged {
            crate::cell::unlock_cell(cells, nets, id);
            self.add_cell(cells, id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(n: usize, block: crate::side::Side) -> Vec<Cell> {
        (0..n).map(|i| Cell::new(CellId(i), block)).collect()
    }

    #[test]
    fn new_array_is_empty_at_neg_pmax() {
        let bucket = BucketArray::new(2);
        assert_eq!(bucket.max_gain(), -2);
        assert!(bucket.get_candidate_base_cell().is_none());
    }

    #[test]
    fn add_cell_tracks_max_gain() {
        let mut cells = cells(2, crate::side::Side::A);
        let mut bucket = BucketArray::new(2);
        cells[0].gain = -1;
        cells[1].gain = 2;
        bucket.add_cell(&mut cells, CellId(0));
        assert_eq!(bucket.max_gain(), -1);
        bucket.add_cell(&mut cells, CellId(1));
        assert_eq!(bucket.max_gain(), 2);
        assert_eq!(bucket.get_candidate_base_cell(), Some(CellId(1)));
    }

    #[test]
    fn remove_cell_slides_max_gain_down() {
        let mut cells = cells(2, crate::side::Side::A);
        let mut bucket = BucketArray::new(2);
        cells[0].gain = 0;
        cells[1].gain = 2;
        bucket.add_cell(&mut cells, CellId(0));
        bucket.add_cell(&mut cells, CellId(1));
        bucket.remove_cell(&mut cells, CellId(1));
        assert_eq!(bucket.max_gain(), 0);
        assert_eq!(bucket.get_candidate_base_cell(), Some(CellId(0)));
    }

    #[test]
    fn yank_cell_rebuckets_at_new_gain() {
        let mut cells = cells(1, crate::side::Side::A);
        let mut bucket = BucketArray::new(2);
        cells[0].gain = 0;
        bucket.add_cell(&mut cells, CellId(0));
        bucket.yank_cell(&mut cells, CellId(0), -2);
        assert_eq!(cells[0].gain(), -2);
        assert_eq!(bucket.max_gain(), -2);
    }

    #[test]
    fn initialize_unlocks_and_buckets_staged_cells() {
        let mut cells = cells(2, crate::side::Side::A);
        let mut nets: Vec<crate::net::Net> = Vec::new();
        let mut bucket = BucketArray::new(1);
        cells[0].locked = true;
        cells[1].locked = true;
        bucket.add_to_free_cell_list(&mut cells, CellId(0));
        bucket.add_to_free_cell_list(&mut cells, CellId(1));
        assert!(!bucket.free_cell_list_is_empty());

        bucket.initialize(&mut cells, &mut nets);

        assert!(bucket.free_cell_list_is_empty());
        assert!(!cells[0].is_locked());
        assert!(!cells[1].is_locked());
        assert!(bucket.get_candidate_base_cell().is_some());
    }
}

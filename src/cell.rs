//! Cell identity, block membership, lock state and gain.

use crate::net::{Net, NetId};
use crate::side::Side;

/// Stable handle into the partitioner's cell arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId(pub usize);

impl CellId {
    /// The underlying arena index.
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0
    }
}

/// A single cell of the hypergraph.
///
/// `prev`/`next` are the intrusive links (see [`crate::link`]) for whichever
/// list currently holds this cell: a bucket-array gain slot when `staged` is
/// `false`, or the owning block's free-cell list when `staged` is `true`.
#[derive(Clone, Debug)]
pub struct Cell {
    pub(crate) id: CellId,
    pub(crate) block: Side,
    pub(crate) gain: i32,
    pub(crate) locked: bool,
    pub(crate) nets: Vec<NetId>,
    pub(crate) staged: bool,
    pub(crate) restricted: bool,
    pub(crate) prev: Option<CellId>,
    pub(crate) next: Option<CellId>,
}

impl Cell {
    /// A fresh, unlocked, staged cell with no incident nets yet.
    pub fn new(id: CellId, block: Side) -> Self {
        Cell {
            id,
            block,
            gain: 0,
            locked: false,
            nets: Vec::new(),
            staged: true,
            restricted: false,
            prev: None,
            next: None,
        }
    }

    /// Whether this cell was pinned to its block at ingestion and can never
    /// be chosen as a base cell again.
    pub fn is_restricted(&self) -> bool {
        self.restricted
    }

    /// This cell's handle.
    pub fn id(&self) -> CellId {
        self.id
    }

    /// The block this cell currently belongs to.
    pub fn block(&self) -> Side {
        self.block
    }

    /// The cutset delta a move to the complementary block would produce.
    pub fn gain(&self) -> i32 {
        self.gain
    }

    /// Whether this cell has already moved during the current pass.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Number of nets incident to this cell.
    pub fn pins(&self) -> usize {
        self.nets.len()
    }

    /// The nets incident to this cell.
    pub fn nets(&self) -> &[NetId] {
        &self.nets
    }

    /// Idempotent insert; `pins` tracks `nets.len()`.
    pub fn add_net(&mut self, net: NetId) {
        if !self.nets.contains(&net) {
            self.nets.push(net);
        }
    }
}

/// Lock a free cell: flips `locked` and, for every incident net, shifts that
/// net's free/locked counters on the cell's *current* side. A no-op if the
/// cell is already locked.
pub fn lock_cell(cells: &mut [Cell], nets: &mut [Net], id: CellId) {
    if cells[id.0].locked {
        return;
    }
    cells[id.0].locked = true;
    let side = cells[id.0].block;
    let net_ids = cells[id.0].nets.clone();
    for nid in net_ids {
        nets[nid.0].lock_cell_on_side(side);
    }
}

/// Unlock a locked cell. A no-op if already free.
pub fn unlock_cell(cells: &mut [Cell], nets: &mut [Net], id: CellId) {
    if !cells[id.0].locked {
        return;
    }
    cells[id.0].locked = false;
    let side = cells[id.0].block;
    let net_ids = cells[id.0].nets.clone();
    for nid in net_ids {
        nets[nid.0].unlock_cell_on_side(side);
    }
}

/// After `cells[id].block` has been flipped to its new side, tell every
/// incident net so it can update its per-side bookkeeping. Returns the sum
/// of cutset deltas produced (each net contributes -1, 0 or +1).
pub fn adjust_net_distribution(cells: &[Cell], nets: &mut [Net], id: CellId) -> i32 {
    let to = cells[id.0].block;
    let net_ids = cells[id.0].nets.clone();
    let mut delta = 0i32;
    for nid in net_ids {
        delta += nets[nid.0].cell_to_block(cells, id, to);
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::Net;

    #[test]
    fn add_net_is_idempotent() {
        let mut cell = Cell::new(CellId(0), Side::A);
        cell.add_net(NetId(0));
        cell.add_net(NetId(0));
        assert_eq!(cell.pins(), 1);
    }

    #[test]
    fn lock_then_unlock_restores_net_side_counts() {
        let mut cells = vec![Cell::new(CellId(0), Side::A), Cell::new(CellId(1), Side::A)];
        let mut nets = vec![Net::new(NetId(0))];
        cells[0].add_net(NetId(0));
        cells[1].add_net(NetId(0));
        nets[0].add_cell(&cells, CellId(0));
        nets[0].add_cell(&cells, CellId(1));

        lock_cell(&mut cells, &mut nets, CellId(0));
        assert!(cells[0].is_locked());
        assert_eq!(nets[0].free(Side::A), 1);
        assert_eq!(nets[0].locked(Side::A), 1);

        lock_cell(&mut cells, &mut nets, CellId(0));
        assert_eq!(nets[0].locked(Side::A), 1, "locking an already-locked cell is a no-op");

        unlock_cell(&mut cells, &mut nets, CellId(0));
        assert!(!cells[0].is_locked());
        assert_eq!(nets[0].free(Side::A), 2);
        assert_eq!(nets[0].locked(Side::A), 0);
    }

    #[test]
    fn adjust_net_distribution_reports_cutset_delta() {
        let mut cells = vec![Cell::new(CellId(0), Side::A), Cell::new(CellId(1), Side::A)];
        let mut nets = vec![Net::new(NetId(0))];
        cells[0].add_net(NetId(0));
        cells[1].add_net(NetId(0));
        nets[0].add_cell(&cells, CellId(0));
        nets[0].add_cell(&cells, CellId(1));

        cells[0].block = Side::B;
        let delta = adjust_net_distribution(&cells, &mut nets, CellId(0));
        assert_eq!(delta, 1);
        assert!(nets[0].is_cut());
    }
}

//! The two partition blocks, tagged rather than named by string.

/// Which of the two blocks a cell currently belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// The block all cells start in.
    A,
    /// The complementary block.
    B,
}

impl Side {
    /// The complementary block.
    #[inline]
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// `0` for `A`, `1` for `B` — the index into a `[T; 2]` per-side array.
    #[inline]
    pub fn idx(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }
}

/// Both sides, for iterating `[A, B]` without allocating.
pub const SIDES: [Side; 2] = [Side::A, Side::B];

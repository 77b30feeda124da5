//! Crate root: public surface for the Fiduccia-Mattheyses two-way
//! hypergraph partitioner.
//!
//! This module is the canonical entry point for downstream users: it
//! re-exports the arena types (`Cell`/`Net`/`CellId`/`NetId`), the `Side`
//! tag for the two partition blocks, the ingestion error taxonomy, and the
//! `Partitioner` that drives the algorithm.
//!
//! ## Invariants
//!
//! - Single-threaded, synchronous, no I/O beyond what callers hand in as an
//!   already-parsed matrix.
//! - A net's `count == free + locked` on each side, checked in debug builds.
//! - A pass never leaves the live cutset worse than it was at the pass's
//!   start (see [`partitioner::Partitioner::perform_pass`]).
//!
//! Invariant violations are bugs in this crate, not caller error, so they
//! surface as `debug_assert!` failures rather than `Result`s. Malformed
//! input (a non-square matrix, an out-of-range restriction) surfaces as
//! [`IngestError`].

#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms)]

/// The gain-indexed priority structure underlying each block.
pub mod bucket;
/// The two blocks of the partition and the critical-net move protocol.
pub mod block;
/// Cell identity, lock state and gain.
pub mod cell;
/// Ingestion failure taxonomy.
pub mod error;
/// Intrusive doubly-linked list helpers shared by [`bucket`] and [`block`].
pub mod link;
/// Validated adjacency-matrix input.
pub mod matrix;
/// Hyperedges and their per-side membership.
pub mod net;
/// The top-level orchestrator.
pub mod partitioner;
/// The two-valued block tag.
pub mod side;

pub use cell::{Cell, CellId};
pub use error::IngestError;
pub use matrix::AdjacencyMatrix;
pub use net::{Net, NetId};
pub use partitioner::{BalanceSlack, Config, Partitioner};
pub use side::{Side, SIDES};

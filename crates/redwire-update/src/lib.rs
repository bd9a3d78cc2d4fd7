//! Neighbour-update schedulers for redwire.
//!
//! Two implementations of [`NeighborUpdater`](redwire_core::NeighborUpdater):
//!
//! - [`InstantNeighborUpdater`] runs every request inside the call that
//!   made it. Stack depth grows with the length of the notification chain.
//! - [`CollectingNeighborUpdater`] is a trampoline. Requests become
//!   records on an explicit stack, drained in layers, with a cap on how
//!   many chained requests one transaction may issue.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod collecting;
pub mod instant;

pub use collecting::{CollectingNeighborUpdater, DEFAULT_MAX_CHAINED_NEIGHBOR_UPDATES};
pub use instant::InstantNeighborUpdater;

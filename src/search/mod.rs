//! Local search over machine orders.
//!
//! Improves a schedule by best-improvement hill climbing over the
//! [`AdjacentSwaps`] neighborhood: swapping two adjacent operations of
//! different jobs on one machine.
//!
//! # Reference
//! van Laarhoven, Aarts & Lenstra (1992), "Job Shop Scheduling by Simulated
//! Annealing" (adjacent-interchange neighborhoods)

mod local_search;
mod neighborhood;

pub use local_search::{improve, LocalSearch, LocalSearchConfig, SearchOutcome, SwapMove};
pub use neighborhood::{AdjacentSwap, AdjacentSwaps};

//! Cycle-aware classification and ordering of a user's open issues.

pub mod classify;
pub mod cycle_index;
pub mod ordering;
pub mod pipeline;
pub mod snapshot;

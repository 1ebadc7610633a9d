//! Analysis components over a single price series.
//!
//! All components are pure functions over an immutable snapshot: they
//! share nothing, mutate nothing and perform no I/O, which is what makes
//! [`crate::analyze_parallel`] coordination-free.

pub mod events;
pub mod extrema;
pub mod levels;
pub mod patterns;
pub mod stats;
pub mod trend;

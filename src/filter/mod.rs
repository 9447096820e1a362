//! Image filters built on the dispatch registry.
//!
//! Each filter owns a lazily built registry of its per-`(P, D)` execution
//! entries and routes `execute` through it.

mod collapse;
mod extract;

pub use collapse::DirectionCollapseStrategy;
pub use extract::ExtractImageFilter;

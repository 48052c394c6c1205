//! The lead pipeline: pure transforms from raw storage rows to the
//! dashboard's canonical views. Everything here is deterministic given its
//! inputs; `now` is always passed in rather than read from the clock.

pub mod analytics;
pub mod filter;
pub mod normalize;
pub mod options;
pub mod scoring;
pub mod stats;

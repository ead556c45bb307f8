//! Showcase layer: gallery filtering, the bundled seed dataset, and the
//! per-session synchronization engine built on top of the achievement store.

pub mod filters;
pub mod http;
pub mod seed;
pub mod sync;

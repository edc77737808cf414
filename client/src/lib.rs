//! Client for the literature search backend: query state, concurrent
//! result/facet fetches, and the renderer-facing snapshot.

pub mod api;
pub mod sync;

pub use sync::{SearchQuerySync, SearchSnapshot, SearchSource};

//! Budgeted movement search over a Navgrid scene.
//!
//! [`PathSearch`] runs a single-source Dijkstra from one tile, stopping at
//! the movement budget. Every step is checked for traversability and swept
//! against the host world's [`ng_core::ObstructionOracle`].

/// Step pricing.
pub mod cost;
/// Error types for searches.
pub mod error;
/// Reconstructed routes.
pub mod path;
/// The search itself and its per-tile scratch state.
pub mod search;

/// Re-export cost models.
pub use cost::{ClimbCost, CostModel, EuclideanCost};
/// Re-export error types.
pub use error::{PathError, PathResult};
/// Re-export of [`path::Path`].
pub use path::Path;
/// Re-export search types.
pub use search::{PathSearch, SearchRequest, SearchSummary, TileScratch};

//! Nested-document mutation engine.
//!
//! Pure and synchronous: everything here works on an in-memory `Board` and
//! never touches storage or the network.

pub mod cascade;
pub mod invariants;
pub mod ops;
pub mod order;
pub mod patch;
pub mod path;

pub use ops::{apply, build_board, Effect, NewEntity, Operation};
pub use patch::Patch;
pub use path::{EntityPath, ParentPath, PathSegments};

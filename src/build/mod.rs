//! Build step drivers.
//!
//! - `cmake` - configures the project and builds the release targets

pub mod cmake;

pub use cmake::build_targets;

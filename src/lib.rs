//! Release packaging library.
//!
//! Builds the CMake release targets, mirrors the staged package tree into
//! the release directory and zips the result into `release.zip`.

pub mod archive;
pub mod build;
pub mod config;
pub mod process;
pub mod stage;

//! Core domain types, errors, and constants for `warden`.
//!
//! This crate establishes the foundational data structures and error handling
//! mechanisms used throughout the workspace.
//!
//! ## Key Components
//!
//! - **`errors`**: Defines the primary `Error` enum and `Result` type alias,
//!   centralizing all possible failure modes for predictable error handling.
//! - **`constants`**: Shared, static constants such as the lock polling
//!   schedule and the environment table's growth increment.

pub mod constants;
pub mod errors;

pub use self::{
    constants::*,
    errors::{Error, Result, ResultExt},
};

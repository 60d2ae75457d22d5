//! Core domain types and utilities for the greenline operations console.
//!
//! This crate provides the foundational types, error handling, and shared
//! utilities used throughout the greenline console backend.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{ChatTurnId, RelayRequestId};

// src/lib.rs
// FileFlow - filesystem and interactive shell tools over MCP

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod config;
pub mod error;
pub mod mcp;
pub mod runner;
pub mod tools;

pub use error::{FileFlowError, Result};

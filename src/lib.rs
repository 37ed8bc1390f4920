//! memtools - thin bindings for two Windows facilities.
//!
//! - [`working_set`]: read and adjust the working-set limits of a process.
//! - [`idle`]: find out when the user last touched the keyboard or mouse,
//!   and how long the system has been idle since.
//!
//! The raw Win32 calls live in [`winapi_utils`]; everything above it works
//! with plain Rust types. The tick arithmetic and data types compile on every
//! target, the native operations only on Windows.

pub mod config;
pub mod error;
pub mod idle;
pub mod monitor;
pub mod working_set;

#[cfg(windows)]
pub mod winapi_utils;

pub use error::{Error, Result};

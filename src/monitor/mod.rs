//! Background idle watching.
//!
//! This module turns repeated idle samples into active/away transitions on a
//! polling thread.

pub mod idle_watch;

pub use idle_watch::*;

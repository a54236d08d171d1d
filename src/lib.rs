// src/lib.rs

#[macro_use]
pub mod macros;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod split;

pub mod file;
pub mod log;
pub mod patch;
pub mod progress;
pub mod runner;

pub use runner::{Report, run};
pub use split::{SplitError, split_document};

//! CLI command handlers

pub mod commands;

pub use commands::{create, fetch, resolve, save_as, sheets};

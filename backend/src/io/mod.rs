//! # IO Module
//!
//! The interface layer between the user and the domain services. It parses
//! commands, coerces user input, and renders results; it holds no business
//! rules of its own.

pub mod cli;
pub mod presenter;

pub use cli::{run, Cli, Command};

//! CLI command implementations.
//!
//! Each subcommand has its own module with its arguments and handler.
//!
//! # Command Modules
//!
//! - [`inspect`] - Leg and step summary of a route file
//! - [`replay`] - Full navigation session along a route file

pub mod common;
pub mod inspect;
pub mod replay;

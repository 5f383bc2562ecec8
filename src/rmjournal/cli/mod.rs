//! # CLI Layer
//!
//! The terminal client for the journal library. It is the **only** place that:
//! - Parses arguments
//! - Writes to stdout or stderr
//! - Reads the clock and the current directory
//!
//! ## Structure
//!
//! - `setup.rs`: clap definitions; `update` runs when no command is given
//! - `commands.rs`: builds the `JournalApi` over `rmapi` and dispatches
//! - `render.rs`: turns `CmdResult`s into colored terminal text
//!
//! Errors bubble up to `main.rs`, which prints them and exits with status 1.

mod commands;
mod render;
mod setup;

pub use commands::run;

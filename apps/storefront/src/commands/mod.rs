//! # Commands Module
//!
//! What each `zaynar` subcommand does once the session is open.
//!
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── cart.rs     ◄─── Dispatch, notices, drawer rendering
//! └── catalog.rs  ◄─── Product listing
//! ```
//!
//! Every function returns the text to print instead of printing it, so
//! the CLI and the tests see the same output.

pub mod cart;
pub mod catalog;

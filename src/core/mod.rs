//! # Core Picker Logic
//!
//! Everything here is independent of how the terminal is driven.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • key      (decode)    │
//!                    │  • layout   (paging)    │
//!                    │  • listing  (read_dir)  │
//!                    │  • launcher (open file) │
//!                    └───────────┬─────────────┘
//!                                │
//!                                ▼
//!                        ┌──────────────┐
//!                        │     TUI      │
//!                        │ (crossterm)  │
//!                        └──────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`key`]: raw 3-byte reads → `KeyName`
//! - [`layout`]: header/body/footer geometry and page arithmetic
//! - [`listing`]: directory snapshots with type indicators
//! - [`launcher`]: extension table and detached process spawn
//! - [`session`]: current and previous directory
//! - [`config`]: `~/.sf/config.toml` and override resolution
//! - [`error`]: `PickerError`

pub mod config;
pub mod error;
pub mod key;
pub mod launcher;
pub mod layout;
pub mod listing;
pub mod session;

pub use error::PickerError;

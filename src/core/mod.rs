//! # Core Application Logic
//!
//! This module contains pyassist's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (session bag)  │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • History (JSON file)  │
//!                    └───────────┬─────────────┘
//!                                │
//!                         ┌──────▼─────┐
//!                         │    TUI     │
//!                         │  Adapter   │
//!                         │ (ratatui)  │
//!                         └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: `SessionState` and the `App` that wraps it
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`history`]: `HistoryEntry` and the flat-file `HistoryStore`
//! - [`config`]: Config file, env and CLI resolution

pub mod action;
pub mod config;
pub mod history;
pub mod state;

//! # TUI Components
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `Header`: title, header line, subheader with model and status
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `InputBox`: the question box (cursor, wrapping, internal scroll)
//! - `HistorySidebar`: collapsible newest-first history rows
//! - `ResponseViewport`: scrollable question/answer panel
//!
//! Stateful components keep their persistent part in `TuiState` and are
//! wrapped per frame with borrowed state plus props. They never read `App`
//! directly; everything they show is passed in.
//!
//! ```text
//! components/
//! ├── mod.rs              (this file)
//! ├── header.rs
//! ├── history_sidebar.rs
//! ├── viewport.rs
//! └── input_box/          (text input, cursor, wrapping)
//! ```

pub mod header;
pub mod history_sidebar;
pub mod input_box;
pub mod viewport;

pub use header::Header;
pub use history_sidebar::{HistorySidebar, HistorySidebarState, SidebarEvent};
pub use input_box::{InputBox, InputEvent};
pub use viewport::{ResponseViewport, ViewportState};

//! # Core Application Logic
//!
//! The marker, its grid and the actions that move it.
//! It knows nothing about terminals, threads or channels.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • PositionModel        │
//!                    │  • Action (keys)        │
//!                    │  • update() (reducer)   │
//!                    │  • GridSnapshot         │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                                ▼
//!                         ┌────────────┐
//!                         │    TUI     │
//!                         │  Adapter   │
//!                         │ (crossterm)│
//!                         └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`position`]: `PositionModel`, coordinates plus clamping
//! - [`grid`]: `GridSnapshot`, the derived cell matrix
//! - [`action`]: the `Action` enum and the `update()` reducer
//! - [`config`]: settings file, env and CLI resolution

pub mod action;
pub mod config;
pub mod grid;
pub mod position;

pub use action::{Action, Effect, update};
pub use position::{GridError, PositionModel};

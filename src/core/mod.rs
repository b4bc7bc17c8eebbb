//! # Core Dashboard Logic
//!
//! Timekeeping, commands and persistence for Tempo.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Dashboard (state)    │
//!                    │  • advance() (timers)   │
//!                    │  • update() (actions)   │
//!                    │  • SharedState (lock)   │
//!                    └───────────┬─────────────┘
//!                                │
//!                 ┌──────────────┴──────────────┐
//!                 ▼                             ▼
//!          ┌────────────┐                ┌────────────┐
//!          │  Renderer  │                │   Input    │
//!          │  (ticks)   │                │  (keys)    │
//!          └────────────┘                └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`clock`]: the `Clock` trait, where "now" comes from
//! - [`timer`]: the timer engine: Pomodoro, stopwatch, alarm
//! - [`state`]: the `Dashboard` record and its render `Snapshot`
//! - [`action`]: the `Action` enum and the `update()` reducer
//! - [`command`]: command letters and prompt-answer parsing
//! - [`shared`]: `SharedState`, the lock both loops go through
//! - [`zones`]: time zone lookup and clock formatting
//! - [`config`]: TOML settings and session resume

pub mod action;
pub mod clock;
pub mod command;
pub mod config;
pub mod shared;
pub mod state;
pub mod timer;
pub mod zones;

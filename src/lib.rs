//! Terminal window manager for concurrent remote shell sessions.
//!
//! Every session is a floating window holding a terminal emulator, fed by
//! a WebSocket bridge that speaks SSH on the far side. [`manager`] holds
//! all session and window state; [`app`] is the crossterm/ratatui front end
//! driving it.

pub mod actions;
pub mod app;
pub mod components;
pub mod config;
pub mod constants;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod manager;
pub mod protocol;
pub mod runner;
pub mod session;
pub mod shortcuts;
pub mod terminal;
pub mod theme;
pub mod tracing_sub;
pub mod transport;
pub mod tray;
pub mod ui;
pub mod window;

pub use error::{Error, Result};

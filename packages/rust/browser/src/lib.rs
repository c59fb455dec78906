//! Browser session plumbing for Reachout.
//!
//! This crate provides:
//! - [`PageDriver`] — the page-interaction surface stages depend on
//! - [`WebDriverPage`] — the real thirtyfour-backed implementation
//! - [`fake::FakeDriver`] — scripted driver for tests
//! - [`OperatorGate`] — pluggable human-in-the-loop suspension points
//! - [`session::log_in`] — the shared manual-login flow

pub mod driver;
pub mod fake;
pub mod gate;
pub mod session;

pub use driver::{PageDriver, WebDriverPage};
pub use gate::{InteractiveGate, OperatorGate, ScriptedGate};
pub use session::log_in;

//! Output for check reports.
//!
//! The checker returns structured reports; this module renders them as
//! colored tables or JSON.

pub mod console;

pub use console::ConsoleOutput;

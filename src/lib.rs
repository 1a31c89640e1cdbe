//! Driver library for the Sino Wealth SH1106 OLED controller on an I2C-style bus.
//!
//! The SH1106 only offers page addressing, while frame buffers are laid out as one horizontal scan
//! of the whole screen. `Display` bridges the two: it cuts each write into page-addressed segments,
//! pads every finished row out to the controller's physical column count, and keeps its cursor
//! between calls so a frame can be streamed in several pieces.

#![cfg_attr(not(test), no_std)]

#[macro_use]
pub mod interface;
pub mod command;
pub mod config;
pub mod display;

// Re-exports for primary API.
pub use command::{consts, AddressingMode, Command};
pub use config::{ColumnLayout, Config};
pub use display::paging::Cursor;
pub use display::Display;
pub use interface::i2c::I2cInterface;
pub use interface::BusInterface;

//! # ap-connector — ArmoníaPlus controller connector
//!
//! HTTP client for the device controller's configuration API.
//!
//! ## Features
//!
//! - Device listing and details (`GetSystemStatus`)
//! - EQ gain / delay / phase per channel
//! - FIR upload to output and speaker EQ slots
//! - Channel groups

pub mod client;
pub mod config;
pub mod error;
pub mod protocol;

pub use client::*;
pub use config::*;
pub use error::*;
pub use protocol::*;

//! Generator constants organized by domain.
//!
//! Centralizing magic numbers makes tuning easier and documents intent.
//! Every value here is the default for the matching configuration field.

mod connection;
mod dungeon;
mod shaping;

pub use connection::*;
pub use dungeon::*;
pub use shaping::*;

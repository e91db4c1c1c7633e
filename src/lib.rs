//! Servoshock 2 driver - packet codec and SPI transaction engine for the
//! Servoshock controller-interface board.
//!
//! The host owns an [`OutputPacket`] of overrides and an [`InputPacket`]
//! that every [`Servoshock::execute`] call overwrites with live controller
//! state. The daemon modules wrap this in a polling service for Linux SPI.

pub mod config;
pub mod daemon;
pub mod dump;
pub mod error;
pub mod packet;
pub mod transaction;
pub mod transport;

// Re-export main types for convenience
pub use error::{Error, Result};
pub use packet::{Button, Channel, Feedback, InputPacket, OutputPacket};
pub use transaction::Servoshock;
pub use transport::{BusTransport, HalTransport};

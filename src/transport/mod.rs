//! # Transport
//!
//! Forwards emitted button events to an MQTT broker. Each event is published
//! as one JSON object on `<topic_prefix>/<connection_code>/buttons`:
//!
//! ```text
//! ButtonEvent ──mpsc──► EventForwarder ──publish──► AsyncClient
//!                                                     │
//!                        poll_connection ◄── EventLoop┘ (ConnectionState watch)
//! ```
//!
//! - `config.rs` - broker settings stored in the `[transport]` table
//! - `forwarder.rs` - the forwarding task, url parsing and payload encoding

pub mod config;
pub mod forwarder;

pub use config::TransportConfig;
pub use forwarder::{ConnectionState, EventForwarder, TransportError};

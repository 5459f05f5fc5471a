//! Client for the cgminer RPC API.
//!
//! cgminer and its descendants (bmminer, bfgminer, sgminer) expose a
//! management API on TCP port 4028. Each connection carries one JSON command
//! and one JSON response terminated by a NUL byte. This crate provides:
//!
//! - [`framing`]: terminator-delimited reads and repair of the daemon's
//!   malformed array output
//! - [`connection`]: the one-shot TCP exchange behind the [`Transport`] trait
//! - [`commands`]: per-command response decoding and cardinality rules
//! - [`Client`]: the typed operations (`devs`, `pools`, `summary`, `stats`,
//!   pool management, `restart`, `quit`)

pub mod client;
pub mod commands;
pub mod config;
pub mod connection;
pub mod error;
pub mod framing;
pub mod messages;
pub mod tracing;
pub mod types;

pub use client::Client;
pub use config::{ClientConfig, Endpoint};
pub use connection::{TcpTransport, Transport};
pub use error::{ApiError, ApiResult};
pub use messages::{CommandRequest, StatusCode, StatusEntry};
pub use types::{Device, HashRate, MinerStats, PoolId, PoolInfo, SummaryStats};

//! Settings Module
//!
//! Remembers the last-used connection config between runs.
//!
//! ## File Format
//! ```text
//! ┌─────────┬─────────┬──────────────────────────────┐
//! │ CRC (4) │ Len (4) │ bincode(ConnectionConfig)    │
//! └─────────┴─────────┴──────────────────────────────┘
//! ```
//! Both integers are little-endian; the CRC32 covers the payload only.

mod store;

pub use store::{SettingsStore, HEADER_SIZE};

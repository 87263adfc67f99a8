//! # verse-gateway
//!
//! REST API and WebSocket gateway serving emotion-indexed verses.
//!
//! Public clients browse emotions and verses and draw a random verse for a
//! chosen emotion; authenticated administrators curate the catalog and read
//! interaction analytics. Every successful content mutation is broadcast to
//! realtime WebSocket subscribers on a best-effort basis.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── Session Gate (auth/)
//!     ├── ChangeBroadcaster (ws/)
//!     │
//!     └── Storage trait (storage/)
//!           ├── PostgresStorage
//!           └── MemoryStorage
//! ```

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod storage;
pub mod ws;

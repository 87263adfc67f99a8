//! WebSocket layer: change broadcaster, upgrade handler, connection loop.
//!
//! The endpoint at `/ws` is server-to-client only: clients connect (with
//! `?admin=true` for the admin audience) and receive `{type, data}` JSON
//! frames whenever content changes. Delivery is best-effort with no replay;
//! a reconnecting client re-fetches current state over REST.

pub mod broadcaster;
pub mod connection;
pub mod handler;

pub use broadcaster::{Audience, ChangeBroadcaster};
pub use handler::ws_handler;

//! Authentication: password hashing, the session store, and the admin
//! gate middleware.
//!
//! Sessions are server-side records keyed by an opaque cookie value.
//! The gate only checks the session record; it does not re-validate the
//! admin row on every request.

pub mod middleware;
pub mod password;
pub mod session;

pub use middleware::{AdminIdentity, require_admin};
pub use session::{SESSION_COOKIE, SessionStore, session_id_from_cookie_header};

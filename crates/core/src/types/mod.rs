//! Shared type definitions.

pub mod id;
pub mod role;
pub mod transport;
pub mod username;

pub use id::{TransportId, UserId};
pub use role::Role;
pub use transport::{TransportKind, TransportStatus};
pub use username::{Username, UsernameError};

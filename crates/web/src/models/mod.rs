//! Domain models for the web application.

pub mod notice;
pub mod session;
pub mod transport;
pub mod user;

pub use notice::{Notice, NoticeLevel};
pub use session::{CurrentUser, session_keys};
pub use transport::{FleetStats, Transport, TransportDraft, TransportFieldErrors, TransportFields};
pub use user::User;

//! Remote calls to the admin panel backend

pub mod admin_backend;
pub mod dashboard_backend;
pub mod remote_backend;

pub use admin_backend::{ActionOutcome, AdminAction, AdminBackend, FollowUp, InviteRequest};
pub use dashboard_backend::{CardList, DashboardBackend};
pub use remote_backend::{ActionButton, RemoteClient, RemoteError};

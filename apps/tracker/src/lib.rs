//! Client core for a job-application tracker backed by a REST service.

pub mod aggregate;
pub mod api;
pub mod config;
pub mod errors;
pub mod feedback;
pub mod index;
pub mod models;
pub mod session;
pub mod store;
pub mod workspace;

pub use api::http::HttpTransport;
pub use api::Transport;
pub use errors::TrackerError;
pub use session::{Session, SessionManager};
pub use workspace::Workspace;

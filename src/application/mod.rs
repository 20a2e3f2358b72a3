// Application layer - the transfer orchestrator and its collaborators.

pub mod error;
pub mod service;
pub mod sessions;

pub use error::*;
pub use service::*;
pub use sessions::*;

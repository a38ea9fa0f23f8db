pub mod api;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod jobs;
pub mod mail;
pub mod models;
pub mod render;
pub mod security;
pub mod state;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use dispatch::BatchInvitationDispatcher;
pub use error::{AppError, Result};
pub use state::AppState;

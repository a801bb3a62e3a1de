//! HTTP API, authentication, and the background CRM poller.

pub mod auth;
pub mod config;
pub mod flow;
pub mod handlers;
pub mod poller;
pub mod startup;

pub use config::Config;
pub use poller::Poller;
pub use startup::{AppState, Application};

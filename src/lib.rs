pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod notify;
pub mod prompts;
pub mod session;
pub mod storage;
pub mod view;

pub use api::ApiClient;
pub use app::App;
pub use config::Config;
pub use error::{PromptdeskError, Result};

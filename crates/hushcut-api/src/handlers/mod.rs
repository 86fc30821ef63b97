//! Request handlers.

pub mod health;
pub mod jobs;
pub mod process;

pub use health::{health, home};
pub use jobs::{get_job, submit_async};
pub use process::process_audio;

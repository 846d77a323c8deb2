pub mod args;
pub mod automation;
pub mod config;
pub mod content;
pub mod desktop;
pub mod vision;

#[cfg(test)]
mod test_utils;

pub use automation::{AutomationRunner, LaunchOutcome, RunError, RunResult};
pub use config::AppConfig;

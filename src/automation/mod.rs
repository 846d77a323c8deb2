// Launch automation module
// A bounded state machine launches the target application for each item,
// first through the localized icon and then through the system launcher.

pub mod error;
pub mod fsm;
pub mod poll;
pub mod runner;
pub mod types;


// Re-export the main types and functions for easy access
pub use error::{RunError, RunResult};
pub use fsm::{LaunchMachine, scan_until_found};
pub use poll::PollPolicy;
pub use runner::AutomationRunner;
pub use types::{ItemReport, LaunchOutcome, LaunchState, RunSummary};

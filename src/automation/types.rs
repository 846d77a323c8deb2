// Types and enums for the launch automation
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaunchState {
    Idle,
    Scanning,
    IconFound,
    IconAbsent,
    Launching,
    Verifying,
    RetryLaunch,
    FallbackLaunching,
    FallbackVerifying,
    Success,
    Failed,
}

impl LaunchState {
    /// Decision points that do no work of their own
    pub fn is_transient(self) -> bool {
        matches!(
            self,
            LaunchState::Idle | LaunchState::IconFound | LaunchState::IconAbsent | LaunchState::RetryLaunch
        )
    }
}

impl fmt::Display for LaunchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchOutcome {
    LaunchedDirect,
    LaunchedFallback,
    Failed,
}

impl LaunchOutcome {
    pub fn is_launched(self) -> bool {
        !matches!(self, LaunchOutcome::Failed)
    }
}

/// What happened to one item of the batch
#[derive(Debug, Clone, PartialEq)]
pub struct ItemReport {
    pub item_id: u64,
    pub outcome: LaunchOutcome,
    /// Last working stage before `Failed`
    pub failed_stage: Option<LaunchState>,
    /// Path handed to the save dialog
    pub saved: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub items: Vec<ItemReport>,
}

impl RunSummary {
    pub fn count(&self, outcome: LaunchOutcome) -> usize {
        self.items.iter().filter(|item| item.outcome == outcome).count()
    }

    pub fn direct(&self) -> usize {
        self.count(LaunchOutcome::LaunchedDirect)
    }

    pub fn fallback(&self) -> usize {
        self.count(LaunchOutcome::LaunchedFallback)
    }

    pub fn failed(&self) -> usize {
        self.count(LaunchOutcome::Failed)
    }
}

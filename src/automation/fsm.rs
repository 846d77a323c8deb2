// Finite state machine for launching the target application once per item
use super::poll::PollPolicy;
use super::types::{LaunchOutcome, LaunchState};
use crate::config::LaunchConfig;
use crate::desktop::{ClickKind, Desktop, InputSimulator, WindowManager, warn_on_failure};
use crate::vision::{Candidate, LocalizationSession, ScanReport};
use tokio::time::sleep;

pub struct LaunchMachine {
    config: LaunchConfig,
    state: LaunchState,
    trace: Vec<LaunchState>,
}

impl LaunchMachine {
    pub fn new(config: LaunchConfig) -> Self {
        Self {
            config,
            state: LaunchState::Idle,
            trace: vec![LaunchState::Idle],
        }
    }

    pub fn config(&self) -> &LaunchConfig {
        &self.config
    }

    pub fn state(&self) -> LaunchState {
        self.state
    }

    /// Every state entered during the last `run`, in order
    pub fn trace(&self) -> &[LaunchState] {
        &self.trace
    }

    /// The working stages of the last `run`, decision points left out
    pub fn stages(&self) -> Vec<LaunchState> {
        self.trace.iter().copied().filter(|s| !s.is_transient()).collect()
    }

    /// The stage that gave up, when the last `run` ended in `Failed`
    pub fn failed_stage(&self) -> Option<LaunchState> {
        if self.state != LaunchState::Failed {
            return None;
        }
        self.trace.iter().rev().nth(1).copied()
    }

    fn reset(&mut self) {
        self.state = LaunchState::Idle;
        self.trace.clear();
        self.trace.push(LaunchState::Idle);
    }

    fn change_state(&mut self, new_state: LaunchState) {
        log::debug!("🚦 Launch state: {:?} -> {:?}", self.state, new_state);
        self.state = new_state;
        self.trace.push(new_state);
    }

    /// Drive one launch: icon click with verification first, then the
    /// system launcher. Never returns an error; exhaustion is `Failed`.
    pub async fn run<D: Desktop>(
        &mut self,
        session: &mut LocalizationSession,
        desktop: &D,
        item_id: u64,
    ) -> LaunchOutcome {
        self.reset();
        let label = format!("[Post {item_id}]");

        let candidate = if session.anchor().is_some() {
            self.change_state(LaunchState::Scanning);
            let report = scan_until_found(&self.config, session, desktop, item_id, &label).await;
            session.track(&report.candidates)
        } else {
            log::info!("{} No icon anchor established, skipping the icon scan.", label);
            None
        };

        match candidate {
            Some(candidate) => {
                self.change_state(LaunchState::IconFound);
                if self.launch_direct(desktop, &candidate, &label).await {
                    self.change_state(LaunchState::Success);
                    return LaunchOutcome::LaunchedDirect;
                }
                log::warn!("{} Direct launch failed. Trying the launcher.", label);
            }
            None => {
                self.change_state(LaunchState::IconAbsent);
                log::warn!("{} Icon not available. Using the launcher.", label);
            }
        }

        self.change_state(LaunchState::FallbackLaunching);
        self.open_via_launcher(desktop, &label).await;
        self.change_state(LaunchState::FallbackVerifying);
        if self.verify(desktop, &label).await {
            self.change_state(LaunchState::Success);
            LaunchOutcome::LaunchedFallback
        } else {
            self.change_state(LaunchState::Failed);
            LaunchOutcome::Failed
        }
    }

    /// Double-click the candidate and verify, retrying up to the configured
    /// number of direct attempts
    async fn launch_direct<D: Desktop>(&mut self, desktop: &D, candidate: &Candidate, label: &str) -> bool {
        let attempts = self.config.direct_launch_attempts.max(1);
        for attempt in 1..=attempts {
            if attempt > 1 {
                self.change_state(LaunchState::RetryLaunch);
            }
            self.change_state(LaunchState::Launching);
            let (x, y) = candidate.center();
            log::info!(
                "🖱️ {} Double-clicking icon at ({}, {}) (attempt {}/{})",
                label, x, y, attempt, attempts
            );
            warn_on_failure("move pointer", desktop.move_to(x, y).await);
            warn_on_failure("double-click", desktop.click(ClickKind::Double).await);

            self.change_state(LaunchState::Verifying);
            if self.verify(desktop, label).await {
                return true;
            }
        }
        false
    }

    async fn open_via_launcher<I: InputSimulator>(&self, input: &I, label: &str) {
        log::info!("🔎 {} Opening '{}' via the system launcher", label, self.config.launcher_query);
        warn_on_failure("open launcher", input.key_press(&self.config.launcher_key).await);
        sleep(self.config.launcher_open()).await;
        warn_on_failure(
            "type launcher query",
            input
                .type_text(&self.config.launcher_query, self.config.launcher_type_interval())
                .await,
        );
        sleep(self.config.launcher_open()).await;
        warn_on_failure("confirm launcher", input.key_press("enter").await);
        sleep(self.config.launcher_confirm()).await;
    }

    /// Poll for the application window and focus it
    async fn verify<W: WindowManager>(&self, windows: &W, label: &str) -> bool {
        let title = self.config.app_title.as_str();
        let policy = PollPolicy::new(self.config.verify_polls, self.config.verify_interval()).delay_first();

        let window = policy
            .until(move |poll| async move {
                match windows.find_windows(title).await {
                    Ok(found) => found.into_iter().next(),
                    Err(e) => {
                        log::debug!("{} window query {} failed: {}", label, poll, e);
                        None
                    }
                }
            })
            .await;

        let Some(window) = window else {
            log::warn!(
                "⏱️ {} No '{}' window after {} checks",
                label,
                title,
                policy.attempts()
            );
            return false;
        };

        log::info!("✅ {} '{}' window is open ({})", label, title, window.id);
        if let Err(e) = windows.activate(&window).await {
            log::warn!("⚠️ {} Could not focus window {}: {}", label, window.id, e);
        }
        sleep(self.config.focus_settle()).await;
        true
    }
}

/// Scan with bounded retries, minimizing all windows before each attempt.
///
/// Returns the first non-empty report, or an empty one when every attempt
/// came up empty.
pub async fn scan_until_found<D: Desktop>(
    config: &LaunchConfig,
    session: &LocalizationSession,
    desktop: &D,
    scan_index: u64,
    label: &str,
) -> ScanReport {
    let keys: Vec<&str> = config.minimize_keys.iter().map(String::as_str).collect();
    let keys = keys.as_slice();
    let attempts = config.scan_attempts;

    PollPolicy::new(attempts, config.scan_backoff())
        .until(move |attempt| async move {
            log::info!("🔍 {} Scanning for the icon (attempt {}/{})", label, attempt, attempts);
            warn_on_failure("minimize windows", desktop.hotkey(keys).await);
            sleep(config.settle()).await;

            let report = session.scan(desktop, scan_index).await;
            if report.is_empty() {
                log::info!(" -> Icon not found.");
                None
            } else {
                log::info!(" -> {} candidate(s) found.", report.candidates.len());
                Some(report)
            }
        })
        .await
        .unwrap_or_default()
}

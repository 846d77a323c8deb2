//! Configuration for icon localization, launching and content entry
//!
//! Every component receives its section at construction; nothing reads
//! global state. Delays are stored in milliseconds so the structure can be
//! loaded from a plain JSON file.

use crate::automation::{RunError, RunResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Template matching parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Reference icon image
    pub template_path: PathBuf,
    /// Minimum normalized correlation for a raw match (0.0 to 1.0)
    pub confidence_threshold: f32,
    /// Smallest template scale factor (inclusive)
    pub scale_min: f32,
    /// Largest template scale factor (inclusive)
    pub scale_max: f32,
    /// Number of scale factors in the sweep
    pub scale_count: usize,
    /// Canny hysteresis thresholds
    pub canny_low: f32,
    pub canny_high: f32,
    /// Raw matches closer than this on both axes collapse into one candidate
    pub dedup_radius: u32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from("notepad_template.png"),
            confidence_threshold: 0.5,
            scale_min: 0.5,
            scale_max: 2.0,
            scale_count: 10,
            canny_low: 50.0,
            canny_high: 150.0,
            dedup_radius: 20,
        }
    }
}

/// Bounds and waits for the launch state machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// Substring of the target application's window title
    pub app_title: String,
    /// Text typed into the system launcher
    pub launcher_query: String,
    /// Key that opens the system launcher
    pub launcher_key: String,
    /// Chord that minimizes all windows before a scan
    pub minimize_keys: Vec<String>,
    pub scan_attempts: u32,
    pub scan_backoff_ms: u64,
    /// Wait after minimizing, before capturing
    pub settle_ms: u64,
    pub direct_launch_attempts: u32,
    pub verify_polls: u32,
    pub verify_interval_ms: u64,
    pub focus_settle_ms: u64,
    pub launcher_open_ms: u64,
    pub launcher_type_interval_ms: u64,
    pub launcher_confirm_ms: u64,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            app_title: "Notepad".to_string(),
            launcher_query: "Notepad".to_string(),
            launcher_key: "super".to_string(),
            minimize_keys: vec!["super".to_string(), "d".to_string()],
            scan_attempts: 3,
            scan_backoff_ms: 2000,
            settle_ms: 1000,
            direct_launch_attempts: 1,
            verify_polls: 5,
            verify_interval_ms: 1000,
            focus_settle_ms: 500,
            launcher_open_ms: 1500,
            launcher_type_interval_ms: 50,
            launcher_confirm_ms: 2000,
        }
    }
}

impl LaunchConfig {
    pub fn scan_backoff(&self) -> Duration {
        Duration::from_millis(self.scan_backoff_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn verify_interval(&self) -> Duration {
        Duration::from_millis(self.verify_interval_ms)
    }

    pub fn focus_settle(&self) -> Duration {
        Duration::from_millis(self.focus_settle_ms)
    }

    pub fn launcher_open(&self) -> Duration {
        Duration::from_millis(self.launcher_open_ms)
    }

    pub fn launcher_type_interval(&self) -> Duration {
        Duration::from_millis(self.launcher_type_interval_ms)
    }

    pub fn launcher_confirm(&self) -> Duration {
        Duration::from_millis(self.launcher_confirm_ms)
    }
}

/// Text entry, saving and closing of each item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommitConfig {
    /// Directory saved documents land in
    pub output_dir: PathBuf,
    pub type_interval_ms: u64,
    /// Wait after the last line is typed, before saving
    pub post_type_settle_ms: u64,
    pub save_dialog_ms: u64,
    pub path_entry_ms: u64,
    pub save_settle_ms: u64,
    pub close_keys: Vec<String>,
    pub close_settle_ms: u64,
    /// Where the pointer is parked after closing, away from the icon
    pub park_pointer: (u32, u32),
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            output_dir: default_project_dir(),
            type_interval_ms: 30,
            post_type_settle_ms: 500,
            save_dialog_ms: 2000,
            path_entry_ms: 1000,
            save_settle_ms: 1500,
            close_keys: vec!["alt".to_string(), "F4".to_string()],
            close_settle_ms: 2000,
            park_pointer: (50, 50),
        }
    }
}

impl CommitConfig {
    pub fn type_interval(&self) -> Duration {
        Duration::from_millis(self.type_interval_ms)
    }
}

/// Top-level configuration handed to the automation runner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub matching: MatchConfig,
    pub launch: LaunchConfig,
    pub commit: CommitConfig,
    /// Annotated scan frames are written here when set
    pub diagnostics_dir: Option<PathBuf>,
    /// Number of offline items generated when no post source is usable
    pub offline_item_count: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let commit = CommitConfig::default();
        let diagnostics_dir = Some(commit.output_dir.join("annotated"));
        Self {
            matching: MatchConfig::default(),
            launch: LaunchConfig::default(),
            commit,
            diagnostics_dir,
            offline_item_count: 10,
        }
    }
}

impl AppConfig {
    /// Load a JSON config file; missing fields keep their defaults
    pub fn load(path: &Path) -> RunResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| RunError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| RunError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// `~/Desktop/tjm-project`.
///
/// Without a known home the folder is left relative; the runner makes it
/// absolute against the working directory before anything is saved.
fn default_project_dir() -> PathBuf {
    match homedir::my_home() {
        Ok(Some(home)) => home.join("Desktop").join("tjm-project"),
        Ok(None) => {
            log::warn!("⚠️ No home directory known, saving under the working directory");
            PathBuf::from("tjm-project")
        }
        Err(e) => {
            log::warn!("⚠️ Failed to determine home directory ({}), saving under the working directory", e);
            PathBuf::from("tjm-project")
        }
    }
}

/// Preset with short waits, for a fast local desktop
pub fn create_fast_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.launch.scan_backoff_ms = 500;
    config.launch.settle_ms = 300;
    config.launch.verify_interval_ms = 300;
    config.launch.launcher_open_ms = 600;
    config.launch.launcher_confirm_ms = 800;
    config.commit.save_dialog_ms = 800;
    config.commit.close_settle_ms = 800;
    config
}

/// Preset for slow or remote desktops: more polls, longer waits
pub fn create_patient_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.launch.scan_attempts = 5;
    config.launch.direct_launch_attempts = 2;
    config.launch.verify_polls = 10;
    config.launch.launcher_open_ms = 3000;
    config.launch.launcher_confirm_ms = 4000;
    config.commit.save_dialog_ms = 4000;
    config
}

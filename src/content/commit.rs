//! Typing an item into the launched editor and saving it

use super::posts::Post;
use crate::config::CommitConfig;
use crate::desktop::{InputSimulator, warn_on_failure};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::sleep;

/// First of `base.ext`, `base-1.ext`, `base-2.ext`, ... not present in `dir`
pub fn next_available_path(dir: &Path, base: &str, ext: &str) -> PathBuf {
    let mut path = dir.join(format!("{base}.{ext}"));
    let mut counter = 1;
    while path.exists() {
        path = dir.join(format!("{base}-{counter}.{ext}"));
        counter += 1;
    }
    path
}

pub struct ContentCommitter {
    config: CommitConfig,
}

impl ContentCommitter {
    pub fn new(config: CommitConfig) -> Self {
        Self { config }
    }

    pub fn output_dir(&self) -> &Path {
        &self.config.output_dir
    }

    pub fn set_output_dir(&mut self, dir: PathBuf) {
        self.config.output_dir = dir;
    }

    /// Type the post line by line, then save it under a fresh name.
    ///
    /// Returns the path handed to the save dialog.
    pub async fn commit<I: InputSimulator>(&self, input: &I, post: &Post) -> PathBuf {
        for line in post.document().lines() {
            if !line.is_empty() {
                warn_on_failure("type line", input.type_text(line, self.config.type_interval()).await);
            }
            warn_on_failure("enter", input.key_press("enter").await);
        }
        sleep(Duration::from_millis(self.config.post_type_settle_ms)).await;

        let path = next_available_path(&self.config.output_dir, &post.base_name(), "txt");

        warn_on_failure("save hotkey", input.hotkey(&["ctrl", "s"]).await);
        sleep(Duration::from_millis(self.config.save_dialog_ms)).await;
        warn_on_failure(
            "type save path",
            input
                .type_text(&path.to_string_lossy(), self.config.type_interval())
                .await,
        );
        sleep(Duration::from_millis(self.config.path_entry_ms)).await;
        warn_on_failure("confirm save", input.key_press("enter").await);
        sleep(Duration::from_millis(self.config.save_settle_ms)).await;

        path
    }

    /// Close the editor and park the pointer away from the icon
    pub async fn close<I: InputSimulator>(&self, input: &I) {
        let keys: Vec<&str> = self.config.close_keys.iter().map(String::as_str).collect();
        warn_on_failure("close hotkey", input.hotkey(&keys).await);
        sleep(Duration::from_millis(self.config.close_settle_ms)).await;
        let (x, y) = self.config.park_pointer;
        warn_on_failure("park pointer", input.move_to(x, y).await);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::desktop::{ClickKind, DesktopResult};
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<String>>,
    }

    impl InputSimulator for Recorder {
        async fn move_to(&self, x: u32, y: u32) -> DesktopResult<()> {
            self.events.borrow_mut().push(format!("move {x},{y}"));
            Ok(())
        }
        async fn click(&self, kind: ClickKind) -> DesktopResult<()> {
            self.events.borrow_mut().push(format!("click {kind:?}"));
            Ok(())
        }
        async fn key_press(&self, key: &str) -> DesktopResult<()> {
            self.events.borrow_mut().push(format!("key {key}"));
            Ok(())
        }
        async fn type_text(&self, text: &str, _interval: Duration) -> DesktopResult<()> {
            self.events.borrow_mut().push(format!("type {text}"));
            Ok(())
        }
        async fn hotkey(&self, keys: &[&str]) -> DesktopResult<()> {
            self.events.borrow_mut().push(format!("hotkey {}", keys.join("+")));
            Ok(())
        }
    }

    #[test]
    fn test_duplicate_safe_naming() {
        let dir = tempfile::tempdir().unwrap();
        let first = next_available_path(dir.path(), "post_7", "txt");
        assert_eq!(first, dir.path().join("post_7.txt"));

        std::fs::write(&first, "x").unwrap();
        let second = next_available_path(dir.path(), "post_7", "txt");
        assert_eq!(second, dir.path().join("post_7-1.txt"));

        std::fs::write(&second, "x").unwrap();
        let third = next_available_path(dir.path(), "post_7", "txt");
        assert_eq!(third, dir.path().join("post_7-2.txt"));

        // Other ids are unaffected
        assert_eq!(next_available_path(dir.path(), "post_8", "txt"), dir.path().join("post_8.txt"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_commit_types_lines_then_saves() {
        let dir = tempfile::tempdir().unwrap();
        let committer = ContentCommitter::new(CommitConfig {
            output_dir: dir.path().to_path_buf(),
            ..CommitConfig::default()
        });
        let post = Post {
            id: 3,
            title: "T".to_string(),
            body: "B".to_string(),
        };
        let recorder = Recorder::default();

        let path = committer.commit(&recorder, &post).await;
        assert_eq!(path, dir.path().join("post_3.txt"));

        let events = recorder.events.borrow();
        let expected_path = format!("type {}", path.display());
        assert_eq!(
            events.as_slice(),
            [
                "type Title: T",
                "key enter",
                "key enter",
                "type B",
                "key enter",
                "key enter",
                "hotkey ctrl+s",
                expected_path.as_str(),
                "key enter",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_commit_waits_come_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let committer = ContentCommitter::new(CommitConfig {
            output_dir: dir.path().to_path_buf(),
            type_interval_ms: 0,
            post_type_settle_ms: 7000,
            save_dialog_ms: 0,
            path_entry_ms: 0,
            save_settle_ms: 0,
            ..CommitConfig::default()
        });
        let post = Post {
            id: 1,
            title: "T".to_string(),
            body: "B".to_string(),
        };

        let start = tokio::time::Instant::now();
        committer.commit(&Recorder::default(), &post).await;
        assert_eq!(start.elapsed(), Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_parks_pointer() {
        let committer = ContentCommitter::new(CommitConfig::default());
        let recorder = Recorder::default();

        committer.close(&recorder).await;
        assert_eq!(recorder.events.borrow().as_slice(), ["hotkey alt+F4", "move 50,50"]);
    }
}

// Automation loop: one launch, type, save, close cycle per post
use super::error::{RunError, RunResult};
use super::fsm::{LaunchMachine, scan_until_found};
use super::types::{ItemReport, RunSummary};
use crate::config::AppConfig;
use crate::content::{ContentCommitter, Post};
use crate::desktop::{Desktop, Selector};
use crate::vision::{Anchor, LocalizationSession};

pub struct AutomationRunner<D, S> {
    desktop: D,
    selector: S,
    session: LocalizationSession,
    machine: LaunchMachine,
    committer: ContentCommitter,
}

impl<D: Desktop, S: Selector> AutomationRunner<D, S> {
    pub fn new(config: &AppConfig, desktop: D, selector: S) -> Self {
        let mut session = LocalizationSession::new(&config.matching);
        if let Some(dir) = &config.diagnostics_dir {
            session = session.with_diagnostics(dir, &config.launch.app_title.to_uppercase());
        }

        Self {
            desktop,
            selector,
            session,
            machine: LaunchMachine::new(config.launch.clone()),
            committer: ContentCommitter::new(config.commit.clone()),
        }
    }

    pub fn desktop(&self) -> &D {
        &self.desktop
    }

    pub fn selector(&self) -> &S {
        &self.selector
    }

    pub fn session(&self) -> &LocalizationSession {
        &self.session
    }

    /// Create the output directory and establish the initial anchor.
    ///
    /// Finding no icon is not an error: every item then goes through the
    /// launcher. A refused selection is.
    pub async fn prepare(&mut self) -> RunResult<Option<Anchor>> {
        // Save paths are typed into the editor, which has its own working directory
        let configured = self.committer.output_dir().to_path_buf();
        let out = std::path::absolute(&configured).map_err(|source| RunError::OutputDir {
            path: configured,
            source,
        })?;
        tokio::fs::create_dir_all(&out)
            .await
            .map_err(|source| RunError::OutputDir {
                path: out.clone(),
                source,
            })?;
        log::info!("📁 Saving posts to {}", out.display());
        self.committer.set_output_dir(out);

        if !self.session.has_template() {
            log::warn!("⚠️ No icon template loaded, every item will use the launcher.");
            return Ok(None);
        }

        let report = scan_until_found(
            self.machine.config(),
            &self.session,
            &self.desktop,
            0,
            "[Setup]",
        )
        .await;
        let anchor = self.session.establish_anchor(&report, &self.selector).await?;
        match anchor {
            Some(anchor) => log::info!("📍 Icon anchored at {}", anchor),
            None => log::warn!("⚠️ Icon not found during setup, every item will use the launcher."),
        }
        Ok(anchor)
    }

    /// Launch, fill and close the editor for one post. Failures are
    /// reported, never propagated.
    pub async fn process(&mut self, post: &Post) -> ItemReport {
        log::info!("--- Processing Post {} ---", post.id);
        let outcome = self.machine.run(&mut self.session, &self.desktop, post.id).await;

        if !outcome.is_launched() {
            let stage = self.machine.failed_stage();
            log::error!(
                "❌ [Post {}] Could not open the application (gave up in {}). Skipping.",
                post.id,
                stage.map_or_else(|| "?".to_string(), |s| s.to_string())
            );
            return ItemReport {
                item_id: post.id,
                outcome,
                failed_stage: stage,
                saved: None,
            };
        }

        let saved = self.committer.commit(&self.desktop, post).await;
        log::info!("💾 [Post {}] Saved as {}", post.id, saved.display());
        self.committer.close(&self.desktop).await;

        ItemReport {
            item_id: post.id,
            outcome,
            failed_stage: None,
            saved: Some(saved),
        }
    }

    /// Prepare, then process every post in order
    pub async fn run(&mut self, posts: &[Post]) -> RunResult<RunSummary> {
        self.prepare().await?;

        let mut summary = RunSummary::default();
        for post in posts {
            summary.items.push(self.process(post).await);
        }

        log::info!(
            "🏁 Run complete: {} direct, {} via launcher, {} failed",
            summary.direct(),
            summary.fallback(),
            summary.failed()
        );
        Ok(summary)
    }
}

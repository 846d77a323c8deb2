use icon_launch_run::args::{Args, Mode};
use icon_launch_run::content::posts_or_offline;
use icon_launch_run::desktop::{ConsoleSelector, ImageFileCapture, ScreenCapture, XdoDesktop};
use icon_launch_run::vision::{Annotator, LocalizationSession};
use icon_launch_run::{AppConfig, AutomationRunner, RunResult};
use std::path::Path;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let Some(args) = Args::parse() else {
        return ExitCode::SUCCESS;
    };

    let level = if args.debug_mode { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> RunResult<()> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(template) = args.template {
        config.matching.template_path = template;
    }
    if let Some(out) = args.output_dir {
        config.diagnostics_dir = Some(out.join("annotated"));
        config.commit.output_dir = out;
    }

    match args.mode {
        Mode::Scan(frame) => scan_frame(&config, &frame).await,
        Mode::Run => run_automation(&config, args.posts.as_deref()).await,
    }
}

/// Locate the icon in a saved screenshot, print the candidates and write
/// the annotated frame
async fn scan_frame(config: &AppConfig, frame: &Path) -> RunResult<()> {
    println!("🔍 Scanning {} for {:?}", frame.display(), config.matching.template_path);
    let session = LocalizationSession::new(&config.matching);
    let rgb = ImageFileCapture::new(frame).capture().await?;
    let (candidates, frame) = session.locate(rgb);

    if candidates.is_empty() {
        println!("👀 No candidates found");
    }
    for (i, candidate) in candidates.iter().enumerate() {
        let (x, y) = candidate.center();
        println!(
            "🎯 Candidate {}: center ({}, {}) size {}x{}",
            i + 1,
            x,
            y,
            candidate.width,
            candidate.height
        );
    }

    if let Some(dir) = &config.diagnostics_dir {
        let annotated = Annotator::new(&config.launch.app_title.to_uppercase()).annotate(&frame, &candidates);
        match Annotator::save(&annotated, dir, 0) {
            Ok(path) => println!("✅ Annotated frame saved to {}", path.display()),
            Err(e) => log::warn!("⚠️ Could not save annotated frame: {}", e),
        }
        let report = dir.join("scan_0.json");
        match serde_json::to_string_pretty(&candidates) {
            Ok(json) => match tokio::fs::write(&report, json).await {
                Ok(()) => println!("✅ Candidates written to {}", report.display()),
                Err(e) => log::warn!("⚠️ Could not write {}: {}", report.display(), e),
            },
            Err(e) => log::warn!("⚠️ Could not serialize candidates: {}", e),
        }
    }
    Ok(())
}

async fn run_automation(config: &AppConfig, posts: Option<&Path>) -> RunResult<()> {
    let desktop = XdoDesktop::new()?;
    let crop_dir = config
        .diagnostics_dir
        .clone()
        .unwrap_or_else(|| config.commit.output_dir.clone());
    let selector = ConsoleSelector::new(crop_dir);

    let (posts, offline) = posts_or_offline(posts, config.offline_item_count).await;
    if offline {
        println!("📴 Running with {} offline posts", posts.len());
    }

    let mut runner = AutomationRunner::new(config, desktop, selector);
    let summary = runner.run(&posts).await?;

    println!(
        "✅ Finished {} posts: {} direct, {} via launcher, {} failed",
        summary.items.len(),
        summary.direct(),
        summary.fallback(),
        summary.failed()
    );
    for item in &summary.items {
        if let Some(path) = &item.saved {
            println!("   Post {} -> {}", item.item_id, path.display());
        }
    }
    Ok(())
}

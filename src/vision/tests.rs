//! Tests for icon localization against synthetic desktops

use crate::desktop::{DesktopError, DesktopResult, ScreenCapture, Selector};
use crate::test_utils::{desktop_with_icons, icon_template, match_config, near, write_template};
use crate::vision::{
    Anchor, Candidate, EdgeDetector, LocalizationSession, MultiScaleMatcher, ScanReport, TemplateSet,
    dedup_matches,
};
use crate::automation::RunError;
use image::RgbImage;
use std::cell::Cell;
use std::path::PathBuf;

struct StaticCapture(Option<RgbImage>);

impl ScreenCapture for StaticCapture {
    async fn capture(&self) -> DesktopResult<RgbImage> {
        self.0.clone().ok_or(DesktopError::ToolNotFound {
            program: "import".to_string(),
        })
    }
}

struct PickNearest {
    target: (u32, u32),
    calls: Cell<u32>,
}

impl Selector for PickNearest {
    async fn choose(&self, candidates: &[Candidate], _frame: &RgbImage) -> Option<(u32, u32)> {
        self.calls.set(self.calls.get() + 1);
        crate::vision::nearest_to(candidates, Anchor::from(self.target)).map(|c| c.center())
    }
}

struct Refuse;

impl Selector for Refuse {
    async fn choose(&self, _candidates: &[Candidate], _frame: &RgbImage) -> Option<(u32, u32)> {
        None
    }
}

#[test]
fn test_single_icon_is_localized() {
    let dir = tempfile::tempdir().unwrap();
    let session = LocalizationSession::new(&match_config(write_template(dir.path())));
    assert!(session.has_template());

    let (candidates, _) = session.locate(desktop_with_icons(160, 80, &[(70, 40)]));
    assert_eq!(candidates.len(), 1, "got {candidates:?}");
    assert!(near(candidates[0].center(), (70, 40), 8), "got {:?}", candidates[0]);
}

#[test]
fn test_three_icons_give_three_candidates() {
    let dir = tempfile::tempdir().unwrap();
    let session = LocalizationSession::new(&match_config(write_template(dir.path())));

    let centers = [(40, 40), (120, 40), (200, 40)];
    let (candidates, _) = session.locate(desktop_with_icons(240, 80, &centers));

    assert_eq!(candidates.len(), 3, "got {candidates:?}");
    for expected in centers {
        assert!(
            candidates.iter().any(|c| near(c.center(), expected, 8)),
            "no candidate near {expected:?} in {candidates:?}"
        );
    }
}

#[test]
fn test_empty_desktop_has_no_candidates() {
    let dir = tempfile::tempdir().unwrap();
    let session = LocalizationSession::new(&match_config(write_template(dir.path())));

    let (candidates, _) = session.locate(desktop_with_icons(160, 80, &[]));
    assert!(candidates.is_empty());
}

#[test]
fn test_scaled_icon_is_still_found() {
    let dir = tempfile::tempdir().unwrap();
    let session = LocalizationSession::new(&match_config(write_template(dir.path())));

    // Render the icon at 2x, as on a high-DPI display
    let big = image::imageops::resize(
        &icon_template(),
        48,
        48,
        image::imageops::FilterType::Nearest,
    );
    let mut desktop = desktop_with_icons(160, 100, &[]);
    image::imageops::replace(&mut desktop, &big, 60, 30);

    let (candidates, _) = session.locate(desktop);
    assert!(!candidates.is_empty());
    assert!(near(candidates[0].center(), (84, 54), 14), "got {candidates:?}");
}

#[test]
fn test_raising_threshold_never_adds_matches() {
    let detector = EdgeDetector::default();
    let dir = tempfile::tempdir().unwrap();
    let config = match_config(write_template(dir.path()));
    let templates = TemplateSet::load(&config, &detector).unwrap();
    let frame_edges = detector.edges(&image::imageops::grayscale(&desktop_with_icons(
        160,
        80,
        &[(40, 40), (110, 45)],
    )));

    let mut previous = usize::MAX;
    for threshold in [0.2, 0.3, 0.4, 0.5, 0.6, 0.8, 0.95, 1.01] {
        let count = MultiScaleMatcher::new(threshold)
            .find_matches(&frame_edges, templates.variants())
            .len();
        assert!(count <= previous, "threshold {threshold}: {count} > {previous}");
        previous = count;
    }
    assert_eq!(previous, 0);
}

#[test]
fn test_small_frame_skips_large_scales_without_error() {
    let dir = tempfile::tempdir().unwrap();
    let session = LocalizationSession::new(&match_config(write_template(dir.path())));

    // 30x30 only fits the variants up to 28px
    let (candidates, _) = session.locate(desktop_with_icons(30, 30, &[(15, 15)]));
    assert_eq!(candidates.len(), 1);
}

#[test]
fn test_dedup_output_is_deterministic_on_real_matches() {
    let detector = EdgeDetector::default();
    let dir = tempfile::tempdir().unwrap();
    let config = match_config(write_template(dir.path()));
    let templates = TemplateSet::load(&config, &detector).unwrap();
    let frame_edges = detector.edges(&image::imageops::grayscale(&desktop_with_icons(
        200,
        80,
        &[(40, 40), (140, 40)],
    )));

    let raw = MultiScaleMatcher::new(0.5).find_matches(&frame_edges, templates.variants());
    assert!(raw.len() >= 2);
    assert_eq!(dedup_matches(&raw, 20), dedup_matches(&raw, 20));
}

#[test]
fn test_parallel_and_serial_matching_agree() {
    let detector = EdgeDetector::default();
    let dir = tempfile::tempdir().unwrap();
    let config = match_config(write_template(dir.path()));
    let templates = TemplateSet::load(&config, &detector).unwrap();
    let frame_edges = detector.edges(&image::imageops::grayscale(&desktop_with_icons(
        240,
        80,
        &[(40, 40), (120, 40), (200, 40)],
    )));

    let parallel = MultiScaleMatcher::new(0.5).find_matches(&frame_edges, templates.variants());
    let serial = MultiScaleMatcher::new(0.5)
        .serial()
        .find_matches(&frame_edges, templates.variants());

    assert_eq!(parallel.len(), serial.len());
    assert_eq!(dedup_matches(&parallel, 20), dedup_matches(&serial, 20));
    assert_eq!(dedup_matches(&parallel, 20).len(), 3);
}

#[tokio::test]
async fn test_missing_template_scans_empty() {
    let session = LocalizationSession::new(&match_config(PathBuf::from("/nonexistent/icon.png")));
    assert!(!session.has_template());

    let capture = StaticCapture(Some(desktop_with_icons(160, 80, &[(70, 40)])));
    let report = session.scan(&capture, 0).await;
    assert!(report.is_empty());
    assert!(report.frame.is_none());
}

#[tokio::test]
async fn test_capture_failure_scans_empty() {
    let dir = tempfile::tempdir().unwrap();
    let session = LocalizationSession::new(&match_config(write_template(dir.path())));

    let report = session.scan(&StaticCapture(None), 0).await;
    assert!(report.is_empty());
}

#[tokio::test]
async fn test_scan_keeps_frame_for_selection() {
    let dir = tempfile::tempdir().unwrap();
    let session = LocalizationSession::new(&match_config(write_template(dir.path())));

    let capture = StaticCapture(Some(desktop_with_icons(160, 80, &[(70, 40)])));
    let report = session.scan(&capture, 0).await;
    assert_eq!(report.candidates.len(), 1);
    assert_eq!(report.frame.map(|f| f.dimensions()), Some((160, 80)));
}

#[tokio::test]
async fn test_single_candidate_anchors_without_selector() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = LocalizationSession::new(&match_config(write_template(dir.path())));
    let report = session
        .scan(&StaticCapture(Some(desktop_with_icons(160, 80, &[(70, 40)]))), 0)
        .await;

    let selector = PickNearest {
        target: (0, 0),
        calls: Cell::new(0),
    };
    let anchor = session.establish_anchor(&report, &selector).await.unwrap();

    assert_eq!(selector.calls.get(), 0);
    assert_eq!(anchor, Some(Anchor::from(&report.candidates[0])));
    assert_eq!(session.anchor(), anchor);
}

#[tokio::test]
async fn test_no_candidates_leave_session_unanchored() {
    let mut session = LocalizationSession::new(&match_config(PathBuf::from("/nonexistent/icon.png")));
    let anchor = session
        .establish_anchor(&ScanReport::default(), &Refuse)
        .await
        .unwrap();
    assert_eq!(anchor, None);
    assert_eq!(session.anchor(), None);
}

#[tokio::test]
async fn test_ambiguous_candidates_use_selector() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = LocalizationSession::new(&match_config(write_template(dir.path())));
    let report = session
        .scan(
            &StaticCapture(Some(desktop_with_icons(240, 80, &[(40, 40), (120, 40), (200, 40)]))),
            0,
        )
        .await;

    let selector = PickNearest {
        target: (120, 40),
        calls: Cell::new(0),
    };
    let anchor = session.establish_anchor(&report, &selector).await.unwrap().unwrap();

    assert_eq!(selector.calls.get(), 1);
    assert!(near((anchor.x, anchor.y), (120, 40), 8));
}

#[tokio::test]
async fn test_refused_selection_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = LocalizationSession::new(&match_config(write_template(dir.path())));
    let report = session
        .scan(&StaticCapture(Some(desktop_with_icons(240, 80, &[(40, 40), (200, 40)]))), 0)
        .await;
    assert_eq!(report.candidates.len(), 2);

    let err = session.establish_anchor(&report, &Refuse).await.unwrap_err();
    assert!(matches!(err, RunError::SelectionAborted));
    assert_eq!(session.anchor(), None);
}

#[test]
fn test_tracking_follows_nearest_and_updates_anchor() {
    let mut session = LocalizationSession::new(&match_config(PathBuf::from("/nonexistent/icon.png")));
    let candidates = [
        Candidate::new(40, 40, 24, 24),
        Candidate::new(130, 45, 24, 24),
        Candidate::new(200, 40, 24, 24),
    ];

    // No anchor yet: nothing to track against
    assert_eq!(session.track(&candidates), None);

    session.set_anchor(Some(Anchor::new(120, 40)));
    let picked = session.track(&candidates).unwrap();
    assert_eq!(picked.center(), (130, 45));
    assert_eq!(session.anchor(), Some(Anchor::new(130, 45)));

    // The icon drifted; the anchor follows it
    let drifted = [Candidate::new(40, 40, 24, 24), Candidate::new(150, 50, 24, 24)];
    assert_eq!(session.track(&drifted).unwrap().center(), (150, 50));
    assert_eq!(session.anchor(), Some(Anchor::new(150, 50)));

    // Nothing on screen: anchor kept
    assert_eq!(session.track(&[]), None);
    assert_eq!(session.anchor(), Some(Anchor::new(150, 50)));
}

#[tokio::test]
async fn test_diagnostics_written_per_scan_index() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("annotated");
    let session = LocalizationSession::new(&match_config(write_template(dir.path())))
        .with_diagnostics(&out, "NOTEPAD");

    let report = session
        .scan(&StaticCapture(Some(desktop_with_icons(160, 80, &[(70, 40)]))), 3)
        .await;
    assert_eq!(report.candidates.len(), 1);

    // Saving runs on the blocking pool; wait for it to land
    let path = out.join("scan_3.png");
    for _ in 0..200 {
        if path.exists() && image::open(&path).is_ok() {
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(10));
    }
    assert!(image::open(&path).is_ok());
}

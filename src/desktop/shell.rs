use super::error::{DesktopError, DesktopResult};
use super::types::{ClickKind, InputSimulator, ScreenCapture, WindowHandle, WindowManager};
use image::RgbImage;
use std::time::Duration;
use tokio::process::Command;

/// X11 desktop driven through the `xdotool` and ImageMagick `import` binaries
pub struct XdoDesktop {
    xdotool: String,
    import: String,
}

impl XdoDesktop {
    fn ensure_available(program: &str, probe_arg: &str) -> DesktopResult<()> {
        match std::process::Command::new(program).arg(probe_arg).output() {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(DesktopError::ToolNotFound {
                program: program.to_string(),
            }),
            Err(source) => Err(DesktopError::SpawnFailed {
                program: program.to_string(),
                source,
            }),
        }
    }

    pub fn new() -> DesktopResult<Self> {
        Self::with_programs("xdotool", "import")
    }

    pub fn with_programs(xdotool: &str, import: &str) -> DesktopResult<Self> {
        Self::ensure_available(xdotool, "version")?;
        Self::ensure_available(import, "-version")?;
        Ok(Self {
            xdotool: xdotool.to_string(),
            import: import.to_string(),
        })
    }

    async fn run(program: &str, args: &[String]) -> DesktopResult<Vec<u8>> {
        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|source| DesktopError::SpawnFailed {
                program: program.to_string(),
                source,
            })?;
        if !output.status.success() {
            return Err(DesktopError::CommandFailed {
                command: format!("{} {}", program, args.join(" ")),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }

    async fn xdo(&self, args: Vec<String>) -> DesktopResult<Vec<u8>> {
        log::debug!("🖱️ xdotool {}", args.join(" "));
        Self::run(&self.xdotool, &args).await
    }

    /// Map portable key names onto X keysyms understood by xdotool
    pub fn keysym(key: &str) -> String {
        match key.to_lowercase().as_str() {
            "win" | "super" | "cmd" => "super".to_string(),
            "enter" | "return" => "Return".to_string(),
            "ctrl" | "control" => "ctrl".to_string(),
            "esc" | "escape" => "Escape".to_string(),
            "tab" => "Tab".to_string(),
            "space" => "space".to_string(),
            "backspace" => "BackSpace".to_string(),
            lower if lower.len() > 1 && lower.starts_with('f') && lower[1..].parse::<u8>().is_ok() => {
                lower.to_uppercase()
            }
            _ => key.to_string(),
        }
    }

    /// Arguments for a chord like ctrl+s
    pub fn chord_args(keys: &[&str]) -> Vec<String> {
        let chord = keys
            .iter()
            .map(|k| Self::keysym(k))
            .collect::<Vec<_>>()
            .join("+");
        vec!["key".to_string(), "--clearmodifiers".to_string(), chord]
    }

    pub fn click_args(kind: ClickKind) -> Vec<String> {
        let args: &[&str] = match kind {
            ClickKind::Left => &["click", "1"],
            ClickKind::Double => &["click", "--repeat", "2", "--delay", "80", "1"],
            ClickKind::Right => &["click", "3"],
        };
        args.iter().map(|s| s.to_string()).collect()
    }

    /// `xdotool search` prints one decimal window id per line
    pub fn parse_window_ids(stdout: &str) -> Vec<String> {
        stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && line.chars().all(|c| c.is_ascii_digit()))
            .map(str::to_string)
            .collect()
    }
}

impl ScreenCapture for XdoDesktop {
    async fn capture(&self) -> DesktopResult<RgbImage> {
        let args = ["-window", "root", "png:-"].map(String::from);
        let bytes = Self::run(&self.import, &args).await?;
        let frame = image::load_from_memory(&bytes)?.to_rgb8();
        log::debug!("📸 Captured {}x{} frame", frame.width(), frame.height());
        Ok(frame)
    }
}

impl InputSimulator for XdoDesktop {
    async fn move_to(&self, x: u32, y: u32) -> DesktopResult<()> {
        self.xdo(vec!["mousemove".to_string(), x.to_string(), y.to_string()])
            .await
            .map(|_| ())
    }

    async fn click(&self, kind: ClickKind) -> DesktopResult<()> {
        self.xdo(Self::click_args(kind)).await.map(|_| ())
    }

    async fn key_press(&self, key: &str) -> DesktopResult<()> {
        self.xdo(vec!["key".to_string(), Self::keysym(key)])
            .await
            .map(|_| ())
    }

    async fn type_text(&self, text: &str, interval: Duration) -> DesktopResult<()> {
        self.xdo(vec![
            "type".to_string(),
            "--delay".to_string(),
            interval.as_millis().to_string(),
            "--".to_string(),
            text.to_string(),
        ])
        .await
        .map(|_| ())
    }

    async fn hotkey(&self, keys: &[&str]) -> DesktopResult<()> {
        self.xdo(Self::chord_args(keys)).await.map(|_| ())
    }
}

impl WindowManager for XdoDesktop {
    async fn find_windows(&self, title_substring: &str) -> DesktopResult<Vec<WindowHandle>> {
        let search = self
            .xdo(vec![
                "search".to_string(),
                "--onlyvisible".to_string(),
                "--name".to_string(),
                title_substring.to_string(),
            ])
            .await;
        let ids = match search {
            Ok(stdout) => Self::parse_window_ids(&String::from_utf8_lossy(&stdout)),
            // xdotool exits 1 when nothing matches
            Err(DesktopError::CommandFailed { stderr, .. }) if stderr.is_empty() => Vec::new(),
            Err(e) => return Err(e),
        };

        let mut windows = Vec::new();
        for id in ids {
            let name = self
                .xdo(vec!["getwindowname".to_string(), id.clone()])
                .await?;
            let title = String::from_utf8_lossy(&name).trim().to_string();
            // --name is a regex; confirm a literal substring match
            if title.contains(title_substring) {
                windows.push(WindowHandle { id, title });
            }
        }
        Ok(windows)
    }

    async fn activate(&self, window: &WindowHandle) -> DesktopResult<()> {
        self.xdo(vec![
            "windowactivate".to_string(),
            "--sync".to_string(),
            window.id.clone(),
        ])
        .await
        .map(|_| ())
        .map_err(|e| DesktopError::ActivationFailed {
            id: window.id.clone(),
            description: e.to_string(),
        })
    }
}

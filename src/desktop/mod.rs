// Desktop module - collaborators around the localization and launch core.
// Screen capture, input simulation and window lookup are consumed through
// the traits in types.rs; shell.rs drives a real X11 session via xdotool.

pub mod error;
pub mod replay;
pub mod selector;
pub mod shell;
pub mod types;


// Re-export the main types for easy access
pub use error::{DesktopError, DesktopResult};
pub use replay::ImageFileCapture;
pub use selector::ConsoleSelector;
pub use shell::XdoDesktop;
pub use types::{
    ClickKind, Desktop, InputSimulator, ScreenCapture, Selector, WindowHandle, WindowManager,
    warn_on_failure,
};

use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    /// Full automation loop against the live desktop
    Run,
    /// One-off localization against a saved frame
    Scan(PathBuf),
}

#[derive(Debug, PartialEq)]
pub struct Args {
    pub mode: Mode,
    pub config: Option<PathBuf>,
    pub posts: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub debug_mode: bool,
}

impl Args {
    pub fn parse() -> Option<Self> {
        Self::parse_from(env::args().skip(1))
    }

    /// Parse flags (program name already stripped). `None` means the
    /// process should exit: help or version was printed, or a flag was bad.
    pub fn parse_from<I: IntoIterator<Item = String>>(args: I) -> Option<Self> {
        let mut mode: Option<Mode> = None;
        let mut config = None;
        let mut posts = None;
        let mut template = None;
        let mut output_dir = None;
        let mut debug_mode = false;

        for arg in args {
            if arg == "--help" || arg == "-h" {
                print_help();
                return None;
            } else if arg == "--version" || arg == "-v" {
                println!("Icon Launch Run v{}", env!("CARGO_PKG_VERSION"));
                return None;
            } else if arg == "--debug" {
                debug_mode = true;
            } else if arg == "--run" {
                mode = Some(Mode::Run);
            } else if let Some(val) = arg.strip_prefix("--scan=") {
                mode = Some(Mode::Scan(path_value("--scan", val)?));
            } else if let Some(val) = arg.strip_prefix("--config=") {
                config = Some(path_value("--config", val)?);
            } else if let Some(val) = arg.strip_prefix("--posts=") {
                posts = Some(path_value("--posts", val)?);
            } else if let Some(val) = arg.strip_prefix("--template=") {
                template = Some(path_value("--template", val)?);
            } else if let Some(val) = arg.strip_prefix("--out=") {
                output_dir = Some(path_value("--out", val)?);
            } else {
                eprintln!("❌ Unknown argument: {}", arg);
                print_help();
                return None;
            }
        }

        Some(Args {
            mode: mode.unwrap_or(Mode::Run),
            config,
            posts,
            template,
            output_dir,
            debug_mode,
        })
    }
}

fn path_value(flag: &str, val: &str) -> Option<PathBuf> {
    if val.is_empty() {
        eprintln!("❌ {} needs a path", flag);
        return None;
    }
    Some(PathBuf::from(val))
}

fn print_help() {
    println!("🖱️ Icon Launch Automation Tool");
    println!();
    println!("USAGE:");
    println!("    icon-launch-run [FLAGS]");
    println!();
    println!("FLAGS:");
    println!("    (no flags)          Run the automation loop on the live desktop");
    println!("    --run               Run the automation loop on the live desktop");
    println!("    --scan=FILE         Locate the icon in a saved screenshot and exit");
    println!("    --config=FILE       Load settings from a JSON file");
    println!("    --posts=FILE        Read posts from a JSON array (offline data otherwise)");
    println!("    --template=FILE     Icon template image");
    println!("    --out=DIR           Directory saved documents go to");
    println!("    --debug             Enable debug logging");
    println!("    --help, -h          Show this help message");
    println!("    --version, -v       Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    icon-launch-run --scan=desktop.png --template=notepad_template.png");
    println!("    icon-launch-run --posts=posts.json --debug");
}

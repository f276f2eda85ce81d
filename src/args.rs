use crate::config::{DEFAULT_MONITOR_CONFIG, DEFAULT_REFORGE_CONFIG};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Gui,
    /// Headless reforge loop
    Run,
    /// Headless bar monitor
    Monitor,
    /// Offline pipeline check on a saved screenshot
    MatchTest(PathBuf),
}

#[derive(Debug, PartialEq)]
pub struct Args {
    pub mode: Mode,
    pub debug_mode: bool,
    pub reforge_config: PathBuf,
    pub monitor_config: PathBuf,
}

impl Args {
    pub fn parse() -> Option<Self> {
        Self::parse_from(env::args().skip(1))
    }

    /// Parse flags without the program name; `None` means exit now
    pub fn parse_from<I, S>(args: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut mode: Option<Mode> = None;
        let mut debug_mode = false;
        let mut reforge_config = PathBuf::from(DEFAULT_REFORGE_CONFIG);
        let mut monitor_config = PathBuf::from(DEFAULT_MONITOR_CONFIG);

        for arg in args {
            let arg = arg.as_ref();
            if arg == "--help" || arg == "-h" {
                print_help();
                return None;
            } else if arg == "--version" || arg == "-v" {
                println!("Reforge Assist v{}", env!("CARGO_PKG_VERSION"));
                return None;
            } else if arg == "--debug" {
                debug_mode = true;
            } else if arg == "--gui" {
                mode = Some(Mode::Gui);
            } else if arg == "--run" || arg == "-r" {
                mode = Some(Mode::Run);
            } else if arg == "--monitor" || arg == "-m" {
                mode = Some(Mode::Monitor);
            } else if let Some(val) = arg.strip_prefix("--match-test=") {
                if val.is_empty() {
                    eprintln!("❌ --match-test needs a screenshot path");
                    return None;
                }
                mode = Some(Mode::MatchTest(PathBuf::from(val)));
            } else if let Some(val) = arg.strip_prefix("--reforge-config=") {
                reforge_config = PathBuf::from(val);
            } else if let Some(val) = arg.strip_prefix("--monitor-config=") {
                monitor_config = PathBuf::from(val);
            } else {
                eprintln!("❌ Unknown argument: {}", arg);
                print_help();
                return None;
            }
        }

        Some(Args {
            mode: mode.unwrap_or(Mode::Gui),
            debug_mode,
            reforge_config,
            monitor_config,
        })
    }
}

fn print_help() {
    println!("⚒️ Reforge Assist");
    println!();
    println!("USAGE:");
    println!("    reforge-assist [FLAGS]");
    println!();
    println!("FLAGS:");
    println!("    (no flags)                 Launch GUI interface");
    println!("    --gui                      Launch GUI interface");
    println!("    --run, -r                  Run the reforge loop headless (F12 stops)");
    println!("    --monitor, -m              Run the HP/MP bar monitor headless (F12 stops)");
    println!("    --match-test=<PNG>         Match templates against a screenshot once");
    println!("    --reforge-config=<PATH>    Reforge settings (default {DEFAULT_REFORGE_CONFIG})");
    println!("    --monitor-config=<PATH>    Monitor settings (default {DEFAULT_MONITOR_CONFIG})");
    println!("    --debug                    Enable debug logging");
    println!("    --help, -h                 Show this help message");
    println!("    --version, -v              Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    reforge-assist --run");
    println!("    reforge-assist --match-test=screenshot.png --debug");
    println!("    reforge-assist --monitor --monitor-config=d2.json");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_gui() {
        let args = Args::parse_from(Vec::<String>::new()).unwrap();
        assert_eq!(args.mode, Mode::Gui);
        assert!(!args.debug_mode);
        assert_eq!(args.reforge_config, PathBuf::from(DEFAULT_REFORGE_CONFIG));
    }

    #[test]
    fn test_modes_and_paths() {
        let args = Args::parse_from(["--match-test=shot.png", "--debug", "--reforge-config=cfg/r.json"]).unwrap();
        assert_eq!(args.mode, Mode::MatchTest(PathBuf::from("shot.png")));
        assert!(args.debug_mode);
        assert_eq!(args.reforge_config, PathBuf::from("cfg/r.json"));

        let args = Args::parse_from(["--monitor"]).unwrap();
        assert_eq!(args.mode, Mode::Monitor);
    }

    #[test]
    fn test_unknown_flag_exits() {
        assert!(Args::parse_from(["--bogus"]).is_none());
        assert!(Args::parse_from(["--match-test="]).is_none());
    }
}

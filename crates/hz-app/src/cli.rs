use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, CommandFactory, Parser};
use hz_core::config::{self, Options, WriterConfig};

/// Usage text; `{version}` is filled in by clap.
const HELP_TEMPLATE: &str = "\
Hozumi Command

USAGE:
  {usage}

VERSION:
  {version}

OPTIONS:
{options}
";

/// hozumi: typewriter animation for the terminal.
#[derive(Parser, Debug)]
#[command(
    name = "hozumi",
    version,
    disable_help_flag = true,
    disable_version_flag = true,
    help_template = HELP_TEMPLATE,
    override_usage = "hozumi [options] [content...]"
)]
pub struct Cli {
    /// He displays help message.
    #[arg(short = 'h', long, action = ArgAction::SetTrue)]
    pub help: bool,

    /// He displays his version.
    #[arg(short = 'v', long, action = ArgAction::SetTrue)]
    pub version: bool,

    /// He displays by specified speed: low, middle, high.
    #[arg(short, long, value_name = "low|middle|high")]
    pub speed: Option<String>,

    /// He sometimes shouts, "Cool".
    #[arg(short, long, default_value_t = false)]
    pub cool: bool,

    /// He dances (scroll mode only).
    #[arg(short, long, default_value_t = false)]
    pub graphical: bool,

    /// He displays in parallel (grid mode only).
    #[arg(short, long, default_value_t = false)]
    pub parallel: bool,

    /// Rendering regime: scroll or grid.
    #[arg(short, long, value_name = "scroll|grid")]
    pub mode: Option<String>,

    /// TOML config file, ignored if it does not exist.
    #[arg(long, default_value = "hozumi.toml")]
    pub config: PathBuf,

    /// Log level: error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Strings to reveal, one row each.
    #[arg(value_name = "content")]
    pub contents: Vec<OsString>,
}

/// What `main` should do once the command line is understood.
#[derive(Debug, PartialEq, Eq)]
pub enum Launch {
    /// Print the usage and exit successfully.
    Help,
    /// Print the version line and exit successfully.
    Version,
    /// Animate with the resolved configuration.
    Run(WriterConfig),
}

impl Cli {
    /// Resolve the command line, merged over the config file if present.
    ///
    /// Help wins over version, which wins over everything else. Contents
    /// that are not valid UTF-8 are decoded lossily.
    ///
    /// # Errors
    /// Returns [`hz_core::CoreError`] for bad values or conflicting flags,
    /// or an error if the config file exists but cannot be loaded.
    pub fn launch(&self) -> Result<Launch> {
        if self.help {
            return Ok(Launch::Help);
        }
        if self.version {
            return Ok(Launch::Version);
        }

        let file = if self.config.exists() {
            Some(config::load_config(&self.config)?)
        } else {
            log::debug!(
                "No config file at {}, using defaults",
                self.config.display()
            );
            None
        };

        let opts = Options {
            speed: self.speed.clone(),
            cool: self.cool,
            graphical: self.graphical,
            parallel: self.parallel,
            mode: self.mode.clone(),
            contents: self
                .contents
                .iter()
                .map(|c| c.to_string_lossy().into_owned())
                .collect(),
        };
        let resolved = config::resolve(opts, file.as_ref().map(|f| &f.writer))?;
        Ok(Launch::Run(resolved))
    }
}

/// Usage text, version included.
#[must_use]
pub fn usage() -> String {
    Cli::command().render_help().to_string()
}

/// Line printed by `--version`.
#[must_use]
pub fn version_line() -> String {
    format!("hozumi version ({})", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hz_core::config::DisplayMode;
    use hz_core::error::CoreError;
    use hz_core::reveal::DEFAULT_CONTENT;
    use hz_core::timing::{SpeedTier, Timing};
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["hozumi", "--config", "/nonexistent/hozumi.toml"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn run(args: &[&str]) -> WriterConfig {
        match parse(args).launch().unwrap() {
            Launch::Run(config) => config,
            other => panic!("expected a run, got {other:?}"),
        }
    }

    fn core_error(args: &[&str]) -> CoreError {
        let err = parse(args).launch().unwrap_err();
        err.downcast::<CoreError>().unwrap()
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert_eq!(parse(&["-h"]).launch().unwrap(), Launch::Help);
        assert_eq!(parse(&["--version"]).launch().unwrap(), Launch::Version);
        assert_eq!(parse(&["-v", "-s", "bogus"]).launch().unwrap(), Launch::Version);
        assert_eq!(parse(&["-v", "-h"]).launch().unwrap(), Launch::Help);
    }

    #[test]
    fn defaults_to_placeholder_content() {
        let config = run(&[]);
        assert_eq!(config.contents, [DEFAULT_CONTENT]);
        assert_eq!(config.timing, Timing::for_tier(SpeedTier::Middle));
        assert_eq!(config.mode, DisplayMode::Scroll);
        assert!(!config.cool);
    }

    #[test]
    fn positional_contents_and_short_flags() {
        let config = run(&["-s", "high", "-c", "foo", "bar"]);
        assert_eq!(config.contents, ["foo", "bar"]);
        assert_eq!(config.timing, Timing::for_tier(SpeedTier::High));
        assert!(config.cool);
    }

    #[test]
    fn parallel_selects_grid_mode() {
        let config = run(&["--parallel", "a"]);
        assert!(config.parallel);
        assert_eq!(config.mode, DisplayMode::Grid);
    }

    #[test]
    fn bad_values_are_core_errors() {
        assert_eq!(
            core_error(&["--speed", "turbo"]),
            CoreError::InvalidTier("turbo".into())
        );
        assert!(matches!(
            core_error(&["-m", "spiral"]),
            CoreError::InvalidMode(_)
        ));
        assert!(matches!(
            core_error(&["-g", "-c"]),
            CoreError::ConflictingFlags { .. }
        ));
        assert!(matches!(
            core_error(&["-p", "-m", "scroll"]),
            CoreError::ConflictingFlags { .. }
        ));
    }

    #[test]
    fn unknown_flag_is_a_parse_error() {
        assert!(Cli::try_parse_from(["hozumi", "--bogus"]).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_content_is_decoded_lossily() {
        use std::os::unix::ffi::OsStringExt;
        let raw = OsString::from_vec(b"a\xffb".to_vec());
        let cli = Cli::try_parse_from([
            OsString::from("hozumi"),
            OsString::from("--config"),
            OsString::from("/nonexistent/hozumi.toml"),
            raw,
        ])
        .unwrap();
        let Launch::Run(config) = cli.launch().unwrap() else {
            panic!("expected a run");
        };
        assert_eq!(config.contents, ["a\u{FFFD}b"]);
    }

    #[test]
    fn config_file_supplies_defaults_cli_wins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[writer]\nspeed = \"low\"\ncool = true\ncontents = [\"from file\"]"
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let cli = Cli::try_parse_from(["hozumi", "--config", path]).unwrap();
        let Launch::Run(config) = cli.launch().unwrap() else {
            panic!("expected a run");
        };
        assert_eq!(config.contents, ["from file"]);
        assert_eq!(config.timing, Timing::for_tier(SpeedTier::Low));
        assert!(config.cool);

        let cli = Cli::try_parse_from(["hozumi", "--config", path, "-s", "high", "x"]).unwrap();
        let Launch::Run(config) = cli.launch().unwrap() else {
            panic!("expected a run");
        };
        assert_eq!(config.contents, ["x"]);
        assert_eq!(config.timing, Timing::for_tier(SpeedTier::High));
    }

    #[test]
    fn malformed_config_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[writer]\nspeed = ").unwrap();
        let path = file.path().to_str().unwrap();
        let cli = Cli::try_parse_from(["hozumi", "--config", path]).unwrap();
        assert!(cli.launch().is_err());
    }

    #[test]
    fn usage_embeds_version() {
        let text = usage();
        assert!(text.contains(env!("CARGO_PKG_VERSION")));
        assert!(text.contains("--parallel"));
        assert!(version_line().starts_with("hozumi version ("));
    }
}

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::CoreError;
use crate::reveal::DEFAULT_CONTENT;
use crate::timing::{self, SpeedTier, Timing};

/// Rendering regime.
///
/// # Example
/// ```
/// use hz_core::config::DisplayMode;
/// assert_eq!("grid".parse::<DisplayMode>().unwrap(), DisplayMode::Grid);
/// assert!("tiles".parse::<DisplayMode>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DisplayMode {
    /// Print the whole buffer, hold, erase it with cursor moves.
    #[default]
    Scroll,
    /// Alternate screen, cells addressed by (column, row).
    Grid,
}

impl FromStr for DisplayMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scroll" => Ok(DisplayMode::Scroll),
            "grid" => Ok(DisplayMode::Grid),
            other => Err(CoreError::InvalidMode(other.to_string())),
        }
    }
}

/// Fully resolved, immutable configuration of the writer.
///
/// Built once at startup and passed explicitly to the sequencer.
///
/// # Example
/// ```
/// use hz_core::config::{DisplayMode, WriterConfig};
/// let config = WriterConfig::default();
/// assert_eq!(config.contents, vec!["ほずみ".to_string()]);
/// assert_eq!(config.mode, DisplayMode::Scroll);
/// ```
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriterConfig {
    /// Strings to reveal, one row each. Never empty.
    pub contents: Vec<String>,
    /// Hold durations.
    pub timing: Timing,
    /// Shout `Cool!` after every cycle.
    pub cool: bool,
    /// Dance instead of revealing text.
    pub graphical: bool,
    /// Animate all rows of a band at once.
    pub parallel: bool,
    /// Rendering regime.
    pub mode: DisplayMode,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            contents: vec![DEFAULT_CONTENT.to_string()],
            timing: Timing::default(),
            cool: false,
            graphical: false,
            parallel: false,
            mode: DisplayMode::Scroll,
        }
    }
}

/// Options as given on the command line, before resolution.
#[allow(clippy::struct_excessive_bools)]
#[derive(Clone, Debug, Default)]
pub struct Options {
    /// Tier name, `None` when the flag was not given.
    pub speed: Option<String>,
    /// `--cool`.
    pub cool: bool,
    /// `--graphical`.
    pub graphical: bool,
    /// `--parallel`.
    pub parallel: bool,
    /// Mode name, `None` when the flag was not given.
    pub mode: Option<String>,
    /// Positional arguments.
    pub contents: Vec<String>,
}

/// Intermediate TOML structure; every value is optional.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct FileConfig {
    /// `[writer]` section.
    #[serde(default)]
    pub writer: WriterSection,
}

/// Writer section of the TOML config, all fields optional for partial override.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WriterSection {
    /// Tier, parsed by serde from `low`, `middle` or `high`.
    pub speed: Option<SpeedTier>,
    /// Shout after every cycle.
    pub cool: Option<bool>,
    /// Mode name.
    pub mode: Option<String>,
    /// Contents used when none are given on the command line.
    pub contents: Option<Vec<String>>,
}

/// Load a TOML file of default values.
///
/// # Errors
/// Returns an error if the file cannot be read, or [`CoreError::Config`] if
/// it is not a valid `[writer]` TOML document.
///
/// # Example
/// ```no_run
/// use hz_core::config::load_config;
/// use std::path::Path;
/// let file = load_config(Path::new("hozumi.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let file: FileConfig = toml::from_str(&content)
        .map_err(|e| CoreError::Config(format!("{}: {e}", path.display())))?;
    log::debug!("Loaded config from {}", path.display());
    Ok(file)
}

/// Merge command-line options over the file section and resolve them.
///
/// Precedence: command line, then file, then defaults. Flags conflicting
/// with each other are rejected rather than silently ignored.
///
/// # Errors
/// Returns [`CoreError::InvalidTier`], [`CoreError::InvalidMode`] or
/// [`CoreError::ConflictingFlags`].
///
/// # Example
/// ```
/// use hz_core::config::{resolve, DisplayMode, Options};
/// let opts = Options { parallel: true, ..Options::default() };
/// let config = resolve(opts, None).unwrap();
/// assert_eq!(config.mode, DisplayMode::Grid);
/// ```
pub fn resolve(opts: Options, file: Option<&WriterSection>) -> Result<WriterConfig, CoreError> {
    let file = file.cloned().unwrap_or_default();

    let timing = match (opts.speed, file.speed) {
        (Some(name), _) => timing::resolve(&name)?,
        (None, Some(tier)) => Timing::for_tier(tier),
        (None, None) => Timing::default(),
    };

    let cool = opts.cool || file.cool.unwrap_or(false);
    let graphical = opts.graphical;
    let parallel = opts.parallel;

    // Nomme la source de la valeur dans les messages de conflit.
    let cool_source = if opts.cool {
        "--cool"
    } else {
        "cool = true in the config file"
    };
    let mode_source = if opts.mode.is_some() {
        "grid mode"
    } else {
        "mode = \"grid\" in the config file"
    };

    let mode = match opts.mode.or(file.mode) {
        Some(name) => name.parse()?,
        None if parallel => DisplayMode::Grid,
        None => DisplayMode::Scroll,
    };

    if graphical {
        if cool {
            return Err(CoreError::ConflictingFlags {
                first: "graphical",
                second: cool_source,
            });
        }
        if parallel {
            return Err(CoreError::ConflictingFlags {
                first: "graphical",
                second: "--parallel",
            });
        }
        if mode == DisplayMode::Grid {
            return Err(CoreError::ConflictingFlags {
                first: "graphical",
                second: mode_source,
            });
        }
    }
    if parallel && mode == DisplayMode::Scroll {
        return Err(CoreError::ConflictingFlags {
            first: "parallel",
            second: "scroll mode",
        });
    }

    let contents = if !opts.contents.is_empty() {
        opts.contents
    } else if let Some(contents) = file.contents.filter(|c| !c.is_empty()) {
        contents
    } else {
        vec![DEFAULT_CONTENT.to_string()]
    };

    Ok(WriterConfig {
        contents,
        timing,
        cool,
        graphical,
        parallel,
        mode,
    })
}

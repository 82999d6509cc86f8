//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.gridwalk/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//! The key bindings are fixed and deliberately absent from the file.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use unicode_width::UnicodeWidthChar;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GridwalkConfig {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub glyphs: GlyphConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GridConfig {
    pub size: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GlyphConfig {
    pub background: Option<String>,
    pub marker: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct InputConfig {
    pub mode: Option<InputMode>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub file: Option<String>,
}

/// How keystrokes reach the program.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Terminal in raw mode, one byte per key, no echo.
    #[default]
    Raw,
    /// Cooked terminal, one command per line (press Enter after each key).
    Line,
}

impl InputMode {
    /// Line terminator for rendered frames. Raw mode disables the terminal's
    /// own `\n` → `\r\n` translation.
    pub fn line_ending(self) -> &'static str {
        match self {
            InputMode::Raw => "\r\n",
            InputMode::Line => "\n",
        }
    }
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_GRID_SIZE: usize = 10;
pub const DEFAULT_BACKGROUND_GLYPH: char = '#';
pub const DEFAULT_MARKER_GLYPH: char = '▩';
pub const DEFAULT_LOG_FILE: &str = "gridwalk.log";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;

pub const SIZE_ENV: &str = "GRIDWALK_SIZE";
pub const LOG_LEVEL_ENV: &str = "GRIDWALK_LOG";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyphs {
    pub background: char,
    pub marker: char,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            background: DEFAULT_BACKGROUND_GLYPH,
            marker: DEFAULT_MARKER_GLYPH,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub size: usize,
    pub glyphs: Glyphs,
    pub input_mode: InputMode,
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
}

/// Values supplied on the command line. `None` = flag not given.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub size: Option<usize>,
    pub input_mode: Option<InputMode>,
    pub log_file: Option<PathBuf>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.gridwalk/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".gridwalk").join("config.toml"))
}

/// Where the loaded config came from.
///
/// Loading usually happens before the logger exists, so the outcome is
/// returned and logged by the caller once logging is up.
#[derive(Debug)]
pub enum ConfigSource {
    File(PathBuf),
    Generated(PathBuf),
    GenerateFailed { path: PathBuf, error: std::io::Error },
    NoHomeDir,
}

impl ConfigSource {
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded config from {}", path.display()),
            ConfigSource::Generated(path) => {
                info!("No config file found, generated default at {}", path.display())
            }
            ConfigSource::GenerateFailed { path, error } => warn!(
                "No config file found, failed to write default at {}: {}",
                path.display(),
                error
            ),
            ConfigSource::NoHomeDir => {
                warn!("Could not determine home directory, using default config")
            }
        }
    }
}

/// Load config from `explicit` if given, otherwise from `~/.gridwalk/config.toml`.
///
/// A missing default file is generated and treated as empty. A missing
/// explicit file is an error.
pub fn load_config(
    explicit: Option<&Path>,
) -> Result<(GridwalkConfig, ConfigSource), ConfigError> {
    if let Some(path) = explicit {
        let config = read_config(path)?;
        return Ok((config, ConfigSource::File(path.to_path_buf())));
    }

    let Some(path) = config_path() else {
        return Ok((GridwalkConfig::default(), ConfigSource::NoHomeDir));
    };

    if !path.exists() {
        let source = match generate_default_config(&path) {
            Ok(()) => ConfigSource::Generated(path),
            Err(error) => ConfigSource::GenerateFailed { path, error },
        };
        return Ok((GridwalkConfig::default(), source));
    }

    let config = read_config(&path)?;
    Ok((config, ConfigSource::File(path)))
}

fn read_config(path: &Path) -> Result<GridwalkConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: GridwalkConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG_TEMPLATE: &str = r##"# Gridwalk Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [grid]
# size = 10                # Side length, at least 1. Or set GRIDWALK_SIZE.

# [glyphs]
# background = "#"
# marker = "▩"

# [input]
# mode = "raw"             # "raw" (single keys) or "line" (key + Enter)

# [logging]
# level = "info"           # Or set GRIDWALK_LOG.
# file = "gridwalk.log"
"##;

/// Writes the commented-out default config to `path`, creating its directory.
fn generate_default_config(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, DEFAULT_CONFIG_TEMPLATE)
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &GridwalkConfig, cli: &CliOverrides) -> Result<ResolvedConfig, ConfigError> {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

fn resolve_with_env(
    config: &GridwalkConfig,
    cli: &CliOverrides,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig, ConfigError> {
    // Size: CLI → env → config → default
    let env_size = match env(SIZE_ENV) {
        Some(raw) => Some(raw.trim().parse::<usize>().map_err(|e| {
            ConfigError::Invalid(format!("{SIZE_ENV}={raw:?} is not a grid size: {e}"))
        })?),
        None => None,
    };
    let size = cli
        .size
        .or(env_size)
        .or(config.grid.size)
        .unwrap_or(DEFAULT_GRID_SIZE);
    if size == 0 {
        return Err(ConfigError::Invalid("grid size must be at least 1".to_string()));
    }

    let glyphs = resolve_glyphs(&config.glyphs)?;

    // Input mode: CLI → config → default
    let input_mode = cli
        .input_mode
        .or(config.input.mode)
        .unwrap_or_default();

    // Log level: env → config → default
    let log_level = match env(LOG_LEVEL_ENV).or_else(|| config.logging.level.clone()) {
        Some(raw) => raw
            .trim()
            .parse::<LevelFilter>()
            .map_err(|_| ConfigError::Invalid(format!("unknown log level {raw:?}")))?,
        None => DEFAULT_LOG_LEVEL,
    };

    // Log file: CLI → config → default
    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.logging.file.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

    Ok(ResolvedConfig {
        size,
        glyphs,
        input_mode,
        log_level,
        log_file,
    })
}

fn resolve_glyphs(config: &GlyphConfig) -> Result<Glyphs, ConfigError> {
    let background = match &config.background {
        Some(raw) => parse_glyph("background", raw)?,
        None => DEFAULT_BACKGROUND_GLYPH,
    };
    let marker = match &config.marker {
        Some(raw) => parse_glyph("marker", raw)?,
        None => DEFAULT_MARKER_GLYPH,
    };
    if background == marker {
        return Err(ConfigError::Invalid(format!(
            "marker and background glyphs are both {marker:?}"
        )));
    }
    Ok(Glyphs { background, marker })
}

/// A glyph must be exactly one character occupying one terminal column,
/// otherwise the grid columns drift out of line.
fn parse_glyph(name: &str, raw: &str) -> Result<char, ConfigError> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.width() == Some(1) => Ok(c),
        _ => Err(ConfigError::Invalid(format!(
            "{name} glyph {raw:?} must be a single one-column character"
        ))),
    }
}

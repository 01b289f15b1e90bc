use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;

pub const CFG_FILE_NAME: &str = "blogsmith.toml";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Paths {
    pub content_dir: PathBuf,
    pub static_dir: PathBuf,
    pub layout_dir: PathBuf,
    pub publish_dir: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Paths {
            content_dir: PathBuf::from("content"),
            static_dir: PathBuf::from("static"),
            layout_dir: PathBuf::from("layouts"),
            publish_dir: PathBuf::from("dist"),
        }
    }
}

/// How the delimiter separates metadata from the body.
#[derive(Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum FrontMatterMode {
    /// `metadata <delim> body`. A file without the delimiter is all body.
    #[default]
    SingleDelimiter,
    /// `<delim> metadata <delim> body`. Both delimiters are mandatory.
    Wrapped,
}

#[derive(Deserialize, Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum MetadataFormat {
    #[default]
    Json,
    Yaml,
    Toml,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FrontMatterConfig {
    pub delimiter: String,
    pub mode: FrontMatterMode,
    pub format: MetadataFormat,
}

impl Default for FrontMatterConfig {
    fn default() -> Self {
        FrontMatterConfig {
            delimiter: "+++".to_string(),
            mode: FrontMatterMode::default(),
            format: MetadataFormat::default(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ContentConfig {
    pub highlight: bool,
    /// Name of one of the bundled syntect themes.
    pub highlight_theme: String,
    pub summary_marker: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        ContentConfig {
            highlight: true,
            highlight_theme: "InspiredGitHub".to_string(),
            summary_marker: "<!-- more -->".to_string(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Server {
    pub address: String,
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Server {
            address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Log {
    pub level: LogLevel,
    #[serde(default = "default_true")]
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Engine configuration. Built once per run and never changed afterwards.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub paths: Paths,
    pub front_matter: FrontMatterConfig,
    pub content: ContentConfig,
    pub server: Server,
    pub log: Option<Log>,
    /// Empty the publish directory before building. Only set from the command line.
    #[serde(skip)]
    pub clean: bool,
}

fn parse_path(path: PathBuf) -> io::Result<PathBuf> {
    if !path.starts_with("${exe_dir}") {
        return Ok(path);
    }
    let cur_exe = env::current_exe()?;
    let exe_dir = cur_exe.parent().unwrap_or_else(|| Path::new("."));
    let rest = path.strip_prefix("${exe_dir}").unwrap_or(&path);
    Ok(exe_dir.join(rest))
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    cfg.paths = Paths {
        content_dir: parse_path(cfg.paths.content_dir)?,
        static_dir: parse_path(cfg.paths.static_dir)?,
        layout_dir: parse_path(cfg.paths.layout_dir)?,
        publish_dir: parse_path(cfg.paths.publish_dir)?,
    };
    if let Some(ref mut log) = cfg.log {
        if let Some(location) = log.location.take() {
            log.location = Some(parse_path(location)?);
        }
    }

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };
    parse_config(&cfg_content)
}

fn find_config_path() -> Option<PathBuf> {
    let cur_dir = env::current_dir().ok();
    let exe_dir = env::current_exe().ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    let cfg_dir = dirs::config_dir().map(|dir| dir.join("blogsmith"));

    [cur_dir, exe_dir, cfg_dir].into_iter()
        .flatten()
        .map(|dir| dir.join(CFG_FILE_NAME))
        .find(|path| path.exists())
}

/// Loads the configuration from `cfg_path`, or from the first `blogsmith.toml`
/// found in the current directory, the executable directory or the user
/// config directory. Falls back to the defaults when there is none.
pub fn open_config(cfg_path: Option<PathBuf>) -> io::Result<(Config, Option<PathBuf>)> {
    let config_path = match cfg_path {
        Some(path) => Some(path),
        None => find_config_path(),
    };

    match config_path {
        Some(path) => read_config(&path).map(|cfg| (cfg, Some(path))),
        None => Ok((Config::default(), None)),
    }
}

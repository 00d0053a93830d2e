use serde::{Deserialize, Deserializer};
use std::io::Read;
use std::time::Duration;
use std::{
    fs::File,
    path::{Path, PathBuf},
};
use thiserror::*;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("io error {0} when reading config")]
    IoError(#[from] std::io::Error),
    #[error("cannot open config file '{0}' : {1}")]
    OpeningError(PathBuf, std::io::Error),
    #[error("UTF8 format error when reading config")]
    Utf8Error,
    #[error("format error {0} when reading config")]
    FormatError(#[from] serde_yaml::Error),
    #[error("invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[derive(Clone, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(default, deserialize_with = "deserialize_duration")]
    pub timeout: Option<Duration>,
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        self.timeout.unwrap_or(DEFAULT_TIMEOUT)
    }
}

#[derive(Clone, Deserialize)]
pub struct BoardConfig {
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub board: BoardConfig,
    pub log: Option<crate::log::Log>,
}

impl Config {
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let p = path.as_ref();
        let mut file = File::open(p).map_err(|e| ConfigError::OpeningError(p.to_owned(), e))?;
        let mut contents = vec![];
        file.read_to_end(&mut contents)?;
        let contents = String::from_utf8(contents).map_err(|_| ConfigError::Utf8Error)?;
        Config::from_str(&contents)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.api.base_url)
            .map_err(|e| ConfigError::InvalidValue("api.base_url", e.to_string()))?;
        if self.board.page_size == 0 {
            return Err(ConfigError::InvalidValue(
                "board.page_size",
                "must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| humantime::parse_duration(&s).map_err(serde::de::Error::custom))
        .transpose()
}

pub mod testdata {
    use super::Config;

    #[allow(dead_code)]
    pub fn test_config() -> Config {
        Config::from_str(
            r#"
        log:
            level: trace
            structured: false
        api:
            base_url: http://127.0.0.1:8000/api
            timeout: 5s
        board:
            page_size: 5
        "#,
        )
        .unwrap()
    }
}

use std::path::PathBuf;

pub const RAW_PATH_ENV: &str = "PRIZES_RAW";
pub const TABLE_PATH_ENV: &str = "PRIZES_TABLE";
pub const PAGE_SIZE_ENV: &str = "PRIZES_PAGE_SIZE";

pub const DEFAULT_RAW_PATH: &str = "data/raw/prizes.csv";
pub const DEFAULT_TABLE_PATH: &str = "data/processed/prizes_clean.csv";
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// Where the data lives and how the row listing pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Raw records consumed by the cleaner.
    pub raw_path: PathBuf,
    /// Normalized table written by the cleaner and read by the dashboard.
    pub table_path: PathBuf,
    /// Rows per page in the table view (always >= 1).
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            raw_path: PathBuf::from(DEFAULT_RAW_PATH),
            table_path: PathBuf::from(DEFAULT_TABLE_PATH),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Config {
    /// Resolve settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve settings through an arbitrary key lookup, falling back to the
    /// defaults for anything absent or unparsable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let raw_path = lookup(RAW_PATH_ENV)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.raw_path);
        let table_path = lookup(TABLE_PATH_ENV)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.table_path);

        let page_size = match lookup(PAGE_SIZE_ENV) {
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    log::warn!("ignoring invalid {PAGE_SIZE_ENV}={raw:?}");
                    defaults.page_size
                }
            },
            None => defaults.page_size,
        };

        Self {
            raw_path,
            table_path,
            page_size,
        }
    }
}

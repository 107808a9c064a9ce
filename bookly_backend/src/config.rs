use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

pub const DEFAULT_API_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone)]
pub struct BooklyConfig {
    pub api_host: IpAddr,
    pub api_port: u16,
    pub paths: BooklyPaths,
    pub pagination: PaginationConfig,
}

impl BooklyConfig {
    pub fn from_env() -> Result<Self> {
        let paths = match env::var("BOOKLY_HOME") {
            Ok(raw) if !raw.trim().is_empty() => BooklyPaths::from_base_dir(raw.trim())?,
            _ => BooklyPaths::discover()?,
        };
        let api_host = env::var("BOOKLY_API_HOST")
            .ok()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(DEFAULT_API_HOST);
        let api_port = env::var("BOOKLY_API_PORT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(8080);
        let pagination = PaginationConfig::from_env();
        Ok(Self {
            api_host,
            api_port,
            paths,
            pagination,
        })
    }

    pub fn new(api_port: u16, paths: BooklyPaths) -> Self {
        Self {
            api_host: DEFAULT_API_HOST,
            api_port,
            paths,
            pagination: PaginationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
    /// Per-direction cap on the friendship source queries. `None` fetches
    /// every edge before the in-memory merge.
    pub friend_fetch_limit: Option<usize>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            friend_fetch_limit: None,
        }
    }
}

impl PaginationConfig {
    pub fn from_env() -> Self {
        let max_page_size = env::var("BOOKLY_MAX_PAGE_SIZE")
            .ok()
            .and_then(|raw| raw.parse::<u32>().ok())
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_MAX_PAGE_SIZE);
        let default_page_size = env::var("BOOKLY_DEFAULT_PAGE_SIZE")
            .ok()
            .and_then(|raw| raw.parse::<u32>().ok())
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(max_page_size);
        let friend_fetch_limit = env::var("BOOKLY_FRIEND_FETCH_LIMIT")
            .ok()
            .and_then(|raw| raw.parse::<usize>().ok())
            .filter(|limit| *limit > 0);
        Self {
            default_page_size,
            max_page_size,
            friend_fetch_limit,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct BooklyPaths {
    pub base: PathBuf,
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub logs_dir: PathBuf,
}

impl BooklyPaths {
    pub fn discover() -> Result<Self> {
        let exe_path = std::env::current_exe()
            .map_err(|err| anyhow!("failed to resolve current executable: {err}"))?;
        let base = exe_path
            .parent()
            .ok_or_else(|| anyhow!("executable path missing parent"))?
            .to_path_buf();
        Self::from_base_dir(base)
    }

    pub fn from_base_dir<P: AsRef<Path>>(base: P) -> Result<Self> {
        let base = base.as_ref().to_path_buf();
        let data_dir = base.join("data");
        let db_path = data_dir.join("bookly.db");
        let logs_dir = base.join("logs");

        Ok(Self {
            base,
            data_dir,
            db_path,
            logs_dir,
        })
    }
}

use serde::{Deserialize, Serialize};
use std::env;
use crate::errors::ConfigError;

const DEFAULT_UPLOAD_FOLDER: &str = "course_thumbnails";
const DEFAULT_CATALOG_PAGE_SIZE: usize = 9;
const DEFAULT_ADMIN_PAGE_SIZE: usize = 6;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub image_upload_url: String,
    pub image_upload_preset: String,
    pub image_upload_folder: String,
    pub catalog_page_size: usize,
    pub admin_page_size: usize,
    pub session_cookie: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: Self::get_env("API_BASE_URL")?,
            image_upload_url: Self::get_env("IMAGE_UPLOAD_URL")?,
            image_upload_preset: Self::get_env("IMAGE_UPLOAD_PRESET")?,
            image_upload_folder: Self::get_env_or("IMAGE_UPLOAD_FOLDER", DEFAULT_UPLOAD_FOLDER),
            catalog_page_size: Self::get_env_usize("CATALOG_PAGE_SIZE", DEFAULT_CATALOG_PAGE_SIZE)?,
            admin_page_size: Self::get_env_usize("ADMIN_PAGE_SIZE", DEFAULT_ADMIN_PAGE_SIZE)?,
            session_cookie: env::var("SESSION_COOKIE").ok().filter(|v| !v.is_empty()),
        })
    }

    /// Config pointing every remote at `base`, used by tests and local tooling.
    pub fn for_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            api_base_url: format!("{}/api", base),
            image_upload_url: format!("{}/image/upload", base),
            image_upload_preset: "unsigned".to_string(),
            image_upload_folder: DEFAULT_UPLOAD_FOLDER.to_string(),
            catalog_page_size: DEFAULT_CATALOG_PAGE_SIZE,
            admin_page_size: DEFAULT_ADMIN_PAGE_SIZE,
            session_cookie: None,
        }
    }

    fn get_env(key: &str) -> Result<String, ConfigError> {
        env::var(key).map_err(|_| ConfigError::MissingVar(key.to_string()))
    }

    fn get_env_or(key: &str, default: &str) -> String {
        env::var(key).unwrap_or_else(|_| default.to_string())
    }

    fn get_env_usize(key: &str, default: usize) -> Result<usize, ConfigError> {
        match env::var(key) {
            Ok(val) => val
                .parse::<usize>()
                .map_err(|e| ConfigError::ParseError(key.to_string(), e)),
            Err(_) => Ok(default),
        }
    }
}

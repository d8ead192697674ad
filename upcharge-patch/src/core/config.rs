use crate::core::{AppError, AppResult};
use crate::pipeline::{CategoryPlan, PipelineSettings};
use catalog_client::ClientConfig;
use catalog_client::config::{DEFAULT_CATEGORY_LIMIT, DEFAULT_PRODUCT_LIMIT};
use std::path::PathBuf;

/// Category variants queried per establishment, in order
pub const DEFAULT_CATEGORY_NAMES: [&str; 2] = ["Catering", "• Catering"];

/// Umbrella listings that are never patched
pub const DEFAULT_EXCLUDED_LISTINGS: [&str; 2] = ["Catering", "Tray Sides"];

/// Run configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | CATALOG_BASE_URL | (required) | catalog API host |
/// | CATALOG_API_KEY | (required) | `API-AUTHENTICATION` credential |
/// | MAX_WORKERS | 8 | establishments collected concurrently |
/// | REQUEST_TIMEOUT_SECS | 30 | per-request timeout |
/// | CATEGORY_NAMES | Catering,• Catering | category variants queried |
/// | EXCLUDED_LISTINGS | Catering,Tray Sides | listing names skipped |
/// | CATEGORY_LIMIT | 40 | subcategories per lookup |
/// | PRODUCT_LIMIT | 1000 | products per category |
/// | OUTPUT_DIR | data_files | CSV artifact directory |
/// | LOG_LEVEL | info | default log level |
/// | LOG_DIR | (unset) | daily rolling log files |
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub api_key: String,
    pub max_workers: usize,
    pub request_timeout_secs: u64,
    pub category_names: Vec<String>,
    pub excluded_listings: Vec<String>,
    pub category_limit: u32,
    pub product_limit: u32,
    pub output_dir: PathBuf,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AppError::Config(format!("{key} must be set")))
        };

        Ok(Self {
            base_url: required("CATALOG_BASE_URL")?,
            api_key: required("CATALOG_API_KEY")?,
            max_workers: lookup("MAX_WORKERS")
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(8)
                .max(1),
            request_timeout_secs: lookup("REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(30),
            category_names: lookup("CATEGORY_NAMES")
                .map(|v| split_list(&v))
                .filter(|names| !names.is_empty())
                .unwrap_or_else(|| to_owned_list(&DEFAULT_CATEGORY_NAMES)),
            excluded_listings: lookup("EXCLUDED_LISTINGS")
                .map(|v| split_list(&v))
                .unwrap_or_else(|| to_owned_list(&DEFAULT_EXCLUDED_LISTINGS)),
            category_limit: lookup("CATEGORY_LIMIT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_CATEGORY_LIMIT),
            product_limit: lookup("PRODUCT_LIMIT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_PRODUCT_LIMIT),
            output_dir: lookup("OUTPUT_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data_files")),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: lookup("LOG_DIR").filter(|v| !v.trim().is_empty()),
        })
    }

    /// Catalog client settings
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.base_url, &self.api_key)
            .with_timeout(self.request_timeout_secs)
            .with_category_limit(self.category_limit)
            .with_product_limit(self.product_limit)
    }

    /// Pipeline settings
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            plan: CategoryPlan::new(self.category_names.clone(), self.excluded_listings.clone()),
            max_workers: self.max_workers,
            output_dir: self.output_dir.clone(),
        }
    }
}

/// Comma separated list, entries trimmed, blanks dropped
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn to_owned_list(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

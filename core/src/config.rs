//! Client configuration.

use serde::{Deserialize, Serialize};

use crate::info_page::DEFAULT_INFO_PATH;
use crate::list_view::PAGE_SIZE;

/// Settings the host supplies when creating an [`App`](crate::App).
///
/// Every field has a default, so hosts may send a partial JSON object.
/// An empty `base_url` yields relative request paths (`api/v1/students`),
/// which is what a page served by the backend itself wants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub info_path: String,
    pub page_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            info_path: DEFAULT_INFO_PATH.to_string(),
            page_size: PAGE_SIZE,
        }
    }
}

impl AppConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }
}

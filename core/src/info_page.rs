//! Static "about project" page.

use crate::error::ApiError;
use crate::notify::Notifier;
use crate::types::InfoResource;

pub const DEFAULT_INFO_PATH: &str = "about-project";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InfoState {
    #[default]
    Idle,
    Loading,
    Ready(InfoResource),
    Failed(String),
}

#[derive(Debug)]
pub struct InfoPage {
    path: String,
    state: InfoState,
}

impl InfoPage {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            state: InfoState::Idle,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn state(&self) -> &InfoState {
        &self.state
    }

    /// The resolved resource URL, once loaded.
    pub fn resource_url(&self) -> Option<&str> {
        match &self.state {
            InfoState::Ready(info) => Some(&info.url),
            _ => None,
        }
    }

    pub fn begin_fetch(&mut self) {
        self.state = InfoState::Loading;
    }

    pub fn apply_fetch(&mut self, result: Result<InfoResource, ApiError>, notifier: &mut impl Notifier) {
        self.state = match result {
            Ok(info) => InfoState::Ready(info),
            Err(err) => {
                tracing::warn!(path = %self.path, error = %err, "fetching info resource failed");
                let message = err.describe();
                notifier.error("Could not load project info", &message, None);
                InfoState::Failed(message)
            }
        };
    }
}

impl Default for InfoPage {
    fn default() -> Self {
        Self::new(DEFAULT_INFO_PATH)
    }
}

use serde::{Deserialize, Serialize};

pub use sc_core::models::{CompanyInfo, Notifications, Settings, UpdateSettings};

/// Body of a successful update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdated {
    pub message: String,
    pub settings: Settings,
}

impl SettingsUpdated {
    pub const MESSAGE: &'static str = "Settings updated successfully";

    #[inline]
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            message: Self::MESSAGE.to_owned(),
            settings,
        }
    }
}

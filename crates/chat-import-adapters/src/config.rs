use chat_import_core::{CoordinatorOptions, MAINNET_NAMESPACE};

#[derive(Debug, Clone)]
pub struct ImportAdapterConfig {
    pub required_namespace: String,
    pub random_account_namespace: String,
    pub session_channel_capacity: usize,
}

impl Default for ImportAdapterConfig {
    fn default() -> Self {
        Self {
            required_namespace: MAINNET_NAMESPACE.to_owned(),
            random_account_namespace: MAINNET_NAMESPACE.to_owned(),
            session_channel_capacity: 16,
        }
    }
}

impl ImportAdapterConfig {
    /// Defaults overridden by `CHAT_IMPORT_REQUIRED_NAMESPACE`,
    /// `CHAT_IMPORT_RANDOM_NAMESPACE` and `CHAT_IMPORT_SESSION_CAPACITY`.
    /// Blank or unparsable values are ignored.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            required_namespace: std::env::var("CHAT_IMPORT_REQUIRED_NAMESPACE")
                .ok()
                .filter(|ns| !ns.trim().is_empty())
                .unwrap_or(defaults.required_namespace),
            random_account_namespace: std::env::var("CHAT_IMPORT_RANDOM_NAMESPACE")
                .ok()
                .filter(|ns| !ns.trim().is_empty())
                .unwrap_or(defaults.random_account_namespace),
            session_channel_capacity: std::env::var("CHAT_IMPORT_SESSION_CAPACITY")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .filter(|capacity| *capacity > 0)
                .unwrap_or(defaults.session_channel_capacity),
        }
    }

    pub fn coordinator_options(&self) -> CoordinatorOptions {
        CoordinatorOptions {
            required_namespace: self.required_namespace.clone(),
            random_account_namespace: self.random_account_namespace.clone(),
        }
    }
}

use std::collections::HashSet;

/// Routes batch price updates through the workflow engine when enabled.
pub const WORKFLOW_PRICE_UPDATES_FLAG: &str = "workflow_price_updates";

/// Answers whether a feature flag is switched on.
pub trait FeatureFlagRouter {
    fn is_feature_enabled(&self, key: &str) -> bool;
}

/// Flag set fixed at startup from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticFeatureFlags {
    enabled: HashSet<String>,
}

impl StaticFeatureFlags {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let enabled = keys
            .into_iter()
            .map(|key| key.as_ref().trim().to_lowercase())
            .filter(|key| !key.is_empty())
            .collect();
        Self { enabled }
    }

    /// Parse a comma-separated list such as `"workflow_price_updates, other"`.
    pub fn from_list(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    pub fn enable(mut self, key: &str) -> Self {
        self.enabled.insert(key.trim().to_lowercase());
        self
    }
}

impl FeatureFlagRouter for StaticFeatureFlags {
    fn is_feature_enabled(&self, key: &str) -> bool {
        self.enabled.contains(&key.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_list_trims_and_ignores_empty_keys() {
        let flags = StaticFeatureFlags::from_list(" Workflow_Price_Updates ,, other");

        assert!(flags.is_feature_enabled(WORKFLOW_PRICE_UPDATES_FLAG));
        assert!(flags.is_feature_enabled("other"));
        assert!(!flags.is_feature_enabled(""));
    }

    #[test]
    fn flags_default_to_disabled() {
        let flags = StaticFeatureFlags::default();

        assert!(!flags.is_feature_enabled(WORKFLOW_PRICE_UPDATES_FLAG));
        assert!(flags.enable("workflow_price_updates").is_feature_enabled(WORKFLOW_PRICE_UPDATES_FLAG));
    }
}

//! Serializable registry configuration
//!
//! Lets an application describe its logger levels in JSON:
//!
//! ```json
//! {
//!   "hierarchical": true,
//!   "root_level": "WARNING",
//!   "stack_trace_level": "SEVERE",
//!   "levels": { "svc.db": "FINE", "svc.http": "INFO" }
//! }
//! ```

use super::{
    error::{LoggerError, Result},
    level::Level,
    registry::{validate_name, LoggerRegistry},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
    /// Enable per-logger levels and subscriptions
    pub hierarchical: bool,
    /// Root level; INFO when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_level: Option<Level>,
    /// Stack-trace capture threshold; OFF when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_trace_level: Option<Level>,
    /// Own levels keyed by full logger name; `""` addresses the root
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub levels: BTreeMap<String, Level>,
}

impl RegistryConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LoggerError::io_operation(
                "reading logger configuration",
                format!("cannot read '{}'", path.display()),
                e,
            )
        })?;
        Self::from_json(&contents)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check names and mode constraints without touching any registry
    pub fn validate(&self) -> Result<()> {
        for name in self.levels.keys() {
            validate_name(name).map_err(|e| LoggerError::config("RegistryConfig", e.to_string()))?;
        }

        let has_child_levels = self.levels.keys().any(|name| !name.is_empty());
        if has_child_levels && !self.hierarchical {
            return Err(LoggerError::config(
                "RegistryConfig",
                "per-logger levels require hierarchical = true",
            ));
        }
        Ok(())
    }

    /// Apply to an existing registry.
    ///
    /// Nothing changes if validation fails. Settings are then written root
    /// level first, then the mode flag and threshold, then per-logger levels;
    /// a level write rejected later (for instance a reentrant call from a
    /// listener) leaves the settings written before it in place.
    pub fn apply(&self, registry: &LoggerRegistry) -> Result<()> {
        self.validate()?;

        let root = registry.root();
        if let Some(level) = self.root_level {
            root.set_level(level)?;
        }
        if let Some(level) = self.levels.get("") {
            root.set_level(*level)?;
        }

        registry.set_hierarchical(self.hierarchical);
        if let Some(level) = self.stack_trace_level {
            registry.set_stack_trace_level(level);
        }
        for (name, level) in self.levels.iter().filter(|(name, _)| !name.is_empty()) {
            registry.get(name)?.set_level(*level)?;
        }
        Ok(())
    }

    /// Build a fresh registry from this configuration
    pub fn build(&self) -> Result<LoggerRegistry> {
        let registry = LoggerRegistry::new();
        self.apply(&registry)?;
        Ok(registry)
    }
}

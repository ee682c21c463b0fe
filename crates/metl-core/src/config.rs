//! Per-run task options
//!
//! Options are immutable for the duration of a run and parse from
//! TOML with serde defaults, so a task definition only spells out
//! what it changes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use metl_meta::ApiName;

use crate::Result;
use crate::namespace::inject_namespace;

fn default_api_names() -> Vec<String> {
    vec![ApiName::WILDCARD.to_string()]
}

/// Immutable per-run options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOptions {
    /// Managed mode: namespace tokens resolve to the prefix instead
    /// of being stripped.
    #[serde(default)]
    pub managed: bool,

    /// Namespace prefix injected into manifest text and api names.
    #[serde(default)]
    pub namespace_inject: Option<String>,

    /// Target API version for retrieve and deploy calls.
    pub api_version: String,

    /// Requested instance names for single-entity tasks. Defaults to
    /// the wildcard, meaning every instance actually present.
    #[serde(default = "default_api_names")]
    pub api_names: Vec<String>,
}

impl TaskOptions {
    /// Options with defaults for everything but the API version.
    pub fn new(api_version: impl Into<String>) -> Self {
        Self {
            managed: false,
            namespace_inject: None,
            api_version: api_version.into(),
            api_names: default_api_names(),
        }
    }

    /// Parse options from TOML content.
    ///
    /// # Example
    ///
    /// ```
    /// use metl_core::TaskOptions;
    ///
    /// let options = TaskOptions::parse(r#"
    /// api_version = "52.0"
    /// managed = true
    /// namespace_inject = "ns"
    /// api_names = ["Foo Layout"]
    /// "#).unwrap();
    ///
    /// assert!(options.managed);
    /// assert_eq!(options.api_version, "52.0");
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        let options: Self = toml::from_str(content)?;
        Ok(options)
    }

    /// Apply namespace-token substitution under these options.
    pub fn inject(&self, text: &str) -> String {
        inject_namespace(text, self.namespace_inject.as_deref(), self.managed)
    }

    /// The requested api names, namespace-injected and escaped into
    /// their path-safe form. The wildcard marker passes through.
    pub fn requested_names(&self) -> BTreeSet<ApiName> {
        self.api_names
            .iter()
            .map(|raw| ApiName::new(&self.inject(raw)))
            .collect()
    }
}

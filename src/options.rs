//! Compiler and host configuration.
//!
//! Both option structs deserialize from the camelCase JSON a build-tool host hands over,
//! with every field optional.

use serde::{Deserialize, Serialize};

/// Which runtime the generated code targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum Target {
    #[default]
    Client,
    Server,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompileOptions {
    pub target: Target,
    /// Import source for client helpers.
    pub module_name: String,
    /// Import source for server helpers.
    pub server_module_name: String,
    /// Tag name of the built-in conditional component.
    pub conditional_component: String,
    /// Attribute on the conditional component that carries the condition.
    pub condition_prop: String,
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions {
            target: Target::Client,
            module_name: "sprig/dom".to_string(),
            server_module_name: "sprig/server".to_string(),
            conditional_component: "Show".to_string(),
            condition_prop: "when".to_string(),
        }
    }
}

impl CompileOptions {
    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn is_server(&self) -> bool {
        self.target == Target::Server
    }

    /// The module the helper import is emitted against.
    pub fn runtime_module(&self) -> &str {
        match self.target {
            Target::Client => &self.module_name,
            Target::Server => &self.server_module_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostOptions {
    /// File extensions (without the dot) that may contain markup.
    pub extensions: Vec<String>,
    /// Directory names whose contents are never transformed.
    pub exclude_dirs: Vec<String>,
    pub compile: CompileOptions,
}

impl Default for HostOptions {
    fn default() -> Self {
        HostOptions {
            extensions: vec!["jsx".to_string(), "tsx".to_string()],
            exclude_dirs: vec!["node_modules".to_string()],
            compile: CompileOptions::default(),
        }
    }
}

impl HostOptions {
    /// Parses host options from JSON. Blank input yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(HostOptions::default());
        }
        serde_json::from_str(json)
    }
}

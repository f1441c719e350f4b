//! Rule settings.
//!
//! Settings are read from YAML. Every field is optional:
//!
//! ```yaml
//! disabled_rules: [remove_braces]
//! severity:
//!   use_string_length: warning
//! skip_generated_code: true
//! generated_file_globs: ["**/*.g.cs"]
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::RegexSet;
use serde::{Deserialize, Serialize};

use crate::rules::{Rule, RuleId, Severity};

/// Which rules run and how their findings are reported.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub disabled_rules: Vec<RuleId>,
    /// Per-rule severity, replacing the rule's default.
    #[serde(default)]
    pub severity: BTreeMap<RuleId, Severity>,
    /// Whether generated files are left alone (default: true)
    #[serde(default = "default_true")]
    pub skip_generated_code: bool,
    /// Regexes matched against the file header comments.
    #[serde(default = "default_generated_markers")]
    pub generated_markers: Vec<String>,
    /// Glob patterns for generated file paths (e.g. "**/*.designer.cs")
    #[serde(default = "default_generated_file_globs")]
    pub generated_file_globs: Vec<String>,
    /// Whether diagnostics carry the fade-out spans next to the primary span.
    #[serde(default = "default_true")]
    pub include_fade_spans: bool,
}

fn default_true() -> bool {
    true
}

fn default_generated_markers() -> Vec<String> {
    vec!["<auto-generated".to_string(), "<autogenerated".to_string()]
}

fn default_generated_file_globs() -> Vec<String> {
    ["**/*.designer.cs", "**/*.generated.cs", "**/*.g.cs", "**/*.g.i.cs"]
        .iter()
        .map(|g| g.to_string())
        .collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: String::new(),
            disabled_rules: Vec::new(),
            severity: BTreeMap::new(),
            skip_generated_code: true,
            generated_markers: default_generated_markers(),
            generated_file_globs: default_generated_file_globs(),
            include_fade_spans: true,
        }
    }
}

impl Settings {
    /// Parse settings from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse_str(&content)
    }

    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        validate(&settings)?;
        Ok(settings)
    }

    pub fn is_enabled(&self, rule: RuleId) -> bool {
        !self.disabled_rules.contains(&rule)
    }

    /// Severity findings of `rule` are reported with.
    pub fn severity_for(&self, rule: &dyn Rule) -> Severity {
        self.severity
            .get(&rule.id())
            .copied()
            .unwrap_or_else(|| rule.default_severity())
    }

    /// Compile the generated-code globs and markers.
    pub fn generated_code(&self) -> anyhow::Result<GeneratedCode> {
        GeneratedCode::compile(self)
    }
}

/// Generated-code patterns, compiled once per settings.
#[derive(Debug, Clone)]
pub struct GeneratedCode {
    globs: GlobSet,
    markers: RegexSet,
}

impl GeneratedCode {
    pub fn compile(settings: &Settings) -> anyhow::Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &settings.generated_file_globs {
            let glob = Glob::new(pattern)
                .with_context(|| format!("invalid generated file glob '{}'", pattern))?;
            builder.add(glob);
        }
        let globs = builder.build().context("failed to build generated file globs")?;
        let markers = RegexSet::new(&settings.generated_markers).context("invalid generated code marker")?;
        Ok(Self { globs, markers })
    }

    /// Check if a file is generated code, by path or by its header comments.
    /// Globs support `**` for recursive matching.
    pub fn is_match(&self, path: Option<&Path>, header: &str) -> bool {
        path.is_some_and(|p| self.globs.is_match(p)) || self.markers.is_match(header)
    }
}

/// Validate that every pattern in the settings compiles.
pub fn validate(settings: &Settings) -> anyhow::Result<()> {
    GeneratedCode::compile(settings).map(|_| ())
}

//! Parameter Resolution Module
//!
//! Resolves every parameter in the table against override sources. The
//! first source with a value wins; otherwise the table default is used.
//!
//! Precedence, highest first: explicit overrides, environment
//! (`KINFU_OUTPUT_` prefix), parameter file, built-in default.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ParamError, Result};
use crate::magic;
use crate::source::{EnvSource, FileSource, MapSource, ParamSource, DEFAULT_ENV_PREFIX};
use crate::table::Param;

/// Resolved parameter values, serialized under their lookup keys
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedParams {
    #[serde(rename = "kinfu_response_topic")]
    pub response_topic: String,

    pub request_action_name: String,

    #[serde(rename = "kinfu_output_request_action_magic")]
    pub request_action_magic: String,

    pub kinfu_request_topic: String,

    /// Name of the source that supplied each non-default value
    #[serde(skip)]
    origins: HashMap<Param, String>,
}

impl Default for ResolvedParams {
    fn default() -> Self {
        Self {
            response_topic: Param::ResponseTopic.default_value().to_string(),
            request_action_name: Param::RequestActionName.default_value().to_string(),
            request_action_magic: Param::RequestActionMagic.default_value().to_string(),
            kinfu_request_topic: Param::KinfuRequestTopic.default_value().to_string(),
            origins: HashMap::new(),
        }
    }
}

// Equality covers the values only, not where they came from
impl PartialEq for ResolvedParams {
    fn eq(&self, other: &Self) -> bool {
        Param::iter().all(|param| self.get(param) == other.get(param))
    }
}

impl Eq for ResolvedParams {}

impl ResolvedParams {
    pub fn get(&self, param: Param) -> &str {
        match param {
            Param::ResponseTopic => &self.response_topic,
            Param::RequestActionName => &self.request_action_name,
            Param::RequestActionMagic => &self.request_action_magic,
            Param::KinfuRequestTopic => &self.kinfu_request_topic,
        }
    }

    fn slot(&mut self, param: Param) -> &mut String {
        match param {
            Param::ResponseTopic => &mut self.response_topic,
            Param::RequestActionName => &mut self.request_action_name,
            Param::RequestActionMagic => &mut self.request_action_magic,
            Param::KinfuRequestTopic => &mut self.kinfu_request_topic,
        }
    }

    /// True when no source supplied a value for `param`
    pub fn is_default(&self, param: Param) -> bool {
        !self.origins.contains_key(&param)
    }

    /// Source that supplied `param`, or `"default"`
    pub fn origin(&self, param: Param) -> &str {
        self.origins
            .get(&param)
            .map(String::as_str)
            .unwrap_or("default")
    }

    /// Check a requester's magic against the resolved one
    pub fn verify_magic(&self, received: &str) -> Result<()> {
        magic::verify_magic(&self.request_action_magic, received)
    }
}

/// Builder for layered parameter resolution
#[derive(Debug, Clone)]
pub struct ParamLoader {
    file: Option<(PathBuf, bool)>,
    env_prefix: Option<String>,
    overrides: MapSource,
    expand_env: bool,
}

impl Default for ParamLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamLoader {
    pub fn new() -> Self {
        Self {
            file: None,
            env_prefix: Some(DEFAULT_ENV_PREFIX.to_string()),
            overrides: MapSource::new(),
            expand_env: true,
        }
    }

    /// Parameter file that must exist
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some((path.into(), true));
        self
    }

    /// Parameter file used only if present
    pub fn with_optional_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some((path.into(), false));
        self
    }

    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    pub fn without_env(mut self) -> Self {
        self.env_prefix = None;
        self
    }

    pub fn with_override(mut self, param: Param, value: impl Into<String>) -> Self {
        self.overrides.set(param, value);
        self
    }

    /// Add `key=value` overrides
    pub fn with_assignments<I, S>(mut self, assignments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for assignment in assignments {
            let (key, value) = crate::source::parse_assignment(assignment.as_ref())?;
            self.overrides.insert(&key, value)?;
        }
        Ok(self)
    }

    /// Expand `$VAR` / `${VAR}` in resolved values (on by default)
    pub fn expand_env(mut self, enabled: bool) -> Self {
        self.expand_env = enabled;
        self
    }

    pub fn resolve(&self) -> Result<ResolvedParams> {
        let mut owned: Vec<Box<dyn ParamSource>> = Vec::new();

        if !self.overrides.is_empty() {
            owned.push(Box::new(self.overrides.clone()));
        }
        if let Some(prefix) = &self.env_prefix {
            owned.push(Box::new(EnvSource::new(prefix.clone())));
        }
        if let Some((path, required)) = &self.file {
            info!("Loading parameter file: {:?}", path);
            owned.push(Box::new(FileSource::load(path, *required)?));
        }

        let sources: Vec<&dyn ParamSource> = owned.iter().map(|s| s.as_ref()).collect();
        resolve_with(&sources, self.expand_env)
    }
}

/// Resolve every parameter through `sources`, highest priority first
pub fn resolve_with(sources: &[&dyn ParamSource], expand_env: bool) -> Result<ResolvedParams> {
    let mut params = ResolvedParams::default();

    for param in Param::iter() {
        let key = param.key();

        for source in sources {
            if let Some(value) = source.lookup(key)? {
                debug!(key, source = source.name(), "Parameter overridden");
                *params.slot(param) = value;
                params.origins.insert(param, source.name().to_string());
                break;
            }
        }

        // The magic is compared byte for byte, so it is never expanded
        if expand_env && param.is_graph_name() {
            let expanded = shellexpand::env(params.get(param))
                .map_err(|e| ParamError::Expansion {
                    key: key.to_string(),
                    reason: e.to_string(),
                })?
                .into_owned();
            *params.slot(param) = expanded;
        }

        validate(param, params.get(param))?;
    }

    info!(
        response_topic = %params.response_topic,
        request_action_name = %params.request_action_name,
        kinfu_request_topic = %params.kinfu_request_topic,
        "Resolved kinfu_output parameters"
    );

    Ok(params)
}

/// Non-empty, no whitespace, and a valid graph name for topics and actions
pub fn validate(param: Param, value: &str) -> Result<()> {
    let key = param.key();

    if value.is_empty() {
        return Err(ParamError::EmptyValue {
            key: key.to_string(),
        });
    }

    let invalid = |reason| ParamError::InvalidName {
        key: key.to_string(),
        value: value.to_string(),
        reason,
    };

    if value.chars().any(char::is_whitespace) {
        return Err(invalid("contains whitespace"));
    }

    if param.is_graph_name() {
        validate_graph_name(value).map_err(invalid)?;
    }

    Ok(())
}

/// Graph names start with a letter, `/` or `~`; the rest is letters,
/// digits, `_` and `/`, with no empty segment and no trailing slash
pub fn validate_graph_name(name: &str) -> std::result::Result<(), &'static str> {
    let mut chars = name.chars();
    match chars.next() {
        None => return Err("name has no segments"),
        Some(c) if c.is_ascii_alphabetic() || c == '/' || c == '~' => {}
        Some(_) => return Err("invalid first character"),
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '/') {
        return Err("invalid character");
    }
    if name.contains("//") {
        return Err("empty segment");
    }

    let relative = name
        .strip_prefix("~/")
        .or_else(|| name.strip_prefix('/'))
        .or_else(|| name.strip_prefix('~'))
        .unwrap_or(name);

    if relative.is_empty() {
        return Err("name has no segments");
    }
    if relative.ends_with('/') {
        return Err("trailing slash");
    }

    Ok(())
}

/// Convenience function to resolve parameters with the default sources
pub fn load_params(config: Option<&Path>) -> anyhow::Result<ResolvedParams> {
    let mut loader = ParamLoader::new();
    if let Some(path) = config {
        loader = loader.with_file(path);
    }
    loader
        .resolve()
        .context("Failed to resolve kinfu_output parameters")
}

//! Override sources
//!
//! A source answers "is there a value for this key?". Resolution walks the
//! sources in priority order and falls back to the table default when none
//! of them has one.

use std::collections::HashMap;
use std::env::{self, VarError};
use std::path::{Path, PathBuf};

use config_crate::{Config, ConfigError, File, Value, ValueKind};
use tracing::{debug, warn};

use crate::error::{ParamError, Result};
use crate::table::{self, Param};

/// Prefix for environment overrides, e.g. `KINFU_OUTPUT_KINFU_RESPONSE_TOPIC`
pub const DEFAULT_ENV_PREFIX: &str = "KINFU_OUTPUT";

/// Something that may supply an override for a parameter key
pub trait ParamSource {
    /// Short label used in logs
    fn name(&self) -> &str;

    /// Returns `Ok(None)` when this source has nothing for `key`
    fn lookup(&self, key: &str) -> Result<Option<String>>;
}

/// In-memory overrides, e.g. from `--set key=value`
#[derive(Debug, Clone, Default)]
pub struct MapSource {
    values: HashMap<String, String>,
}

impl MapSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `key=value` strings
    pub fn from_assignments<I, S>(assignments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut source = Self::new();
        for assignment in assignments {
            let (key, value) = parse_assignment(assignment.as_ref())?;
            source.insert(&key, value)?;
        }
        Ok(source)
    }

    /// Set an override by lookup key; unknown keys are rejected
    pub fn insert(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        if table::entry_for_key(key).is_none() {
            return Err(ParamError::UnknownKey(key.to_string()));
        }
        self.values.insert(key.to_string(), value.into());
        Ok(())
    }

    pub fn set(&mut self, param: Param, value: impl Into<String>) {
        self.values.insert(param.key().to_string(), value.into());
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ParamSource for MapSource {
    fn name(&self) -> &str {
        "override"
    }

    fn lookup(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }
}

/// Split `key=value`; the value may itself contain `=`
pub fn parse_assignment(assignment: &str) -> Result<(String, String)> {
    let (key, value) = assignment
        .split_once('=')
        .ok_or_else(|| ParamError::InvalidAssignment(assignment.to_string()))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(ParamError::InvalidAssignment(assignment.to_string()));
    }

    Ok((key.to_string(), value.to_string()))
}

/// Reads `<PREFIX>_<KEY>` from the process environment
#[derive(Debug, Clone)]
pub struct EnvSource {
    prefix: String,
}

impl EnvSource {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn var_name(&self, key: &str) -> String {
        format!("{}_{}", self.prefix, key.to_uppercase())
    }
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::new(DEFAULT_ENV_PREFIX)
    }
}

impl ParamSource for EnvSource {
    fn name(&self) -> &str {
        "environment"
    }

    fn lookup(&self, key: &str) -> Result<Option<String>> {
        let var = self.var_name(key);
        match env::var(&var) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(VarError::NotUnicode(_)) => Err(ParamError::NonUnicodeEnv { var }),
        }
    }
}

/// Parameter file (TOML, YAML or JSON by extension) with top-level keys
pub struct FileSource {
    name: String,
    config: Config,
}

impl FileSource {
    /// Load `path`; a missing file is an error only when `required`
    pub fn load(path: impl AsRef<Path>, required: bool) -> Result<Self> {
        let path = path.as_ref();

        if !required && !path.exists() {
            warn!("Parameter file not found, using defaults: {:?}", path);
        }

        let config = Config::builder()
            .add_source(File::from(path).required(required))
            .build()
            .map_err(|e| ParamError::File {
                path: PathBuf::from(path),
                reason: e.to_string(),
            })?;

        for key in config_keys(&config) {
            if table::entry_for_key(&key).is_none() {
                warn!("Ignoring unknown parameter {} in {:?}", key, path);
            }
        }

        debug!("Loaded parameter file {:?}", path);
        Ok(Self {
            name: format!("file {}", path.display()),
            config,
        })
    }
}

fn config_keys(config: &Config) -> Vec<String> {
    config
        .clone()
        .try_deserialize::<HashMap<String, Value>>()
        .map(|table| table.into_keys().collect())
        .unwrap_or_default()
}

impl ParamSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    /// Only string values are accepted; numbers, booleans and tables are
    /// rejected instead of being coerced
    fn lookup(&self, key: &str) -> Result<Option<String>> {
        let value = match self.config.get::<Value>(key) {
            Ok(value) => value,
            Err(ConfigError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match value.kind {
            ValueKind::String(s) => Ok(Some(s)),
            other => Err(ParamError::NotAString {
                key: key.to_string(),
                location: self.name.clone(),
                found: format!("{:?}", other),
            }),
        }
    }
}

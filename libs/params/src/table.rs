//! Parameter names and defaults
//!
//! Every parameter the node reads is a pair of a lookup key, used to query
//! an override source, and the default value used when no source has one.
//! The table is static and never changes at runtime.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::ParamError;

// Input topics
pub const PARAM_NAME_RESPONSE_TOPIC: &str = "kinfu_response_topic";
pub const PARAM_DEFAULT_RESPONSE_TOPIC: &str = "/kinfu_response_topic";

pub const PARAM_NAME_REQUEST_ACTION_NAME: &str = "request_action_name";
pub const PARAM_DEFAULT_REQUEST_ACTION_NAME: &str = "/kinfu_output/actions/request";

pub const PARAM_NAME_REQUEST_ACTION_MAGIC: &str = "kinfu_output_request_action_magic";
pub const PARAM_DEFAULT_REQUEST_ACTION_MAGIC: &str = "KINFU_OUTPUT_ACTION_MAGIC_SOURCE_NAME";

pub const PARAM_NAME_KINFU_REQUEST_TOPIC: &str = "kinfu_request_topic";
pub const PARAM_DEFAULT_KINFU_REQUEST_TOPIC: &str = "/kinfu_request_topic";

/// A single parameter: its lookup key and fallback value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfigurationEntry {
    pub param: Param,
    pub key: &'static str,
    pub default_value: &'static str,
    pub description: &'static str,
}

/// Logical parameter names, serialized as `response_topic` etc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Param {
    ResponseTopic,
    RequestActionName,
    RequestActionMagic,
    KinfuRequestTopic,
}

/// All entries, in declaration order
pub static ALL: [ConfigurationEntry; 4] = [
    ConfigurationEntry {
        param: Param::ResponseTopic,
        key: PARAM_NAME_RESPONSE_TOPIC,
        default_value: PARAM_DEFAULT_RESPONSE_TOPIC,
        description: "Topic the node receives kinfu responses on",
    },
    ConfigurationEntry {
        param: Param::RequestActionName,
        key: PARAM_NAME_REQUEST_ACTION_NAME,
        default_value: PARAM_DEFAULT_REQUEST_ACTION_NAME,
        description: "Name of the output request action",
    },
    ConfigurationEntry {
        param: Param::RequestActionMagic,
        key: PARAM_NAME_REQUEST_ACTION_MAGIC,
        default_value: PARAM_DEFAULT_REQUEST_ACTION_MAGIC,
        description: "Magic string shared by the action server and its clients",
    },
    ConfigurationEntry {
        param: Param::KinfuRequestTopic,
        key: PARAM_NAME_KINFU_REQUEST_TOPIC,
        default_value: PARAM_DEFAULT_KINFU_REQUEST_TOPIC,
        description: "Topic the node sends kinfu requests on",
    },
];

static BY_LOGICAL_NAME: Lazy<HashMap<&'static str, &'static ConfigurationEntry>> =
    Lazy::new(|| ALL.iter().map(|e| (e.param.logical_name(), e)).collect());

static BY_KEY: Lazy<HashMap<&'static str, &'static ConfigurationEntry>> =
    Lazy::new(|| ALL.iter().map(|e| (e.key, e)).collect());

impl Param {
    pub const fn logical_name(self) -> &'static str {
        match self {
            Param::ResponseTopic => "response_topic",
            Param::RequestActionName => "request_action_name",
            Param::RequestActionMagic => "request_action_magic",
            Param::KinfuRequestTopic => "kinfu_request_topic",
        }
    }

    pub fn entry(self) -> &'static ConfigurationEntry {
        match self {
            Param::ResponseTopic => &ALL[0],
            Param::RequestActionName => &ALL[1],
            Param::RequestActionMagic => &ALL[2],
            Param::KinfuRequestTopic => &ALL[3],
        }
    }

    /// Lookup key used to query override sources
    pub fn key(self) -> &'static str {
        self.entry().key
    }

    /// Value used when no source supplies one
    pub fn default_value(self) -> &'static str {
        self.entry().default_value
    }

    /// Whether the resolved value names a ROS topic or action
    pub fn is_graph_name(self) -> bool {
        !matches!(self, Param::RequestActionMagic)
    }

    pub fn iter() -> impl Iterator<Item = Param> {
        ALL.iter().map(|e| e.param)
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.logical_name())
    }
}

impl FromStr for Param {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BY_LOGICAL_NAME
            .get(s)
            .map(|e| e.param)
            .ok_or_else(|| ParamError::UnknownParam(s.to_string()))
    }
}

/// Lookup key for a logical parameter name
pub fn get_key(logical_name: &str) -> Option<&'static str> {
    BY_LOGICAL_NAME.get(logical_name).map(|e| e.key)
}

/// Default value for a logical parameter name
pub fn get_default(logical_name: &str) -> Option<&'static str> {
    BY_LOGICAL_NAME.get(logical_name).map(|e| e.default_value)
}

/// Reverse lookup from a lookup key to its entry
pub fn entry_for_key(key: &str) -> Option<&'static ConfigurationEntry> {
    BY_KEY.get(key).copied()
}

//! # kinfu_output Parameters
//!
//! Parameter names and default values for the `kinfu_output` node, plus the
//! layer that resolves each parameter against external override sources.
//!
//! ## Parameters
//!
//! - **Topics**: `kinfu_response_topic`, `kinfu_request_topic`
//! - **Action**: `request_action_name`
//! - **Handshake**: `kinfu_output_request_action_magic`
//!
//! ## Usage
//!
//! ```rust
//! use kinfu_params::{table, Param, ParamLoader};
//!
//! // Fixed keys and defaults
//! assert_eq!(table::get_key("response_topic"), Some("kinfu_response_topic"));
//! assert_eq!(Param::ResponseTopic.default_value(), "/kinfu_response_topic");
//!
//! // Resolve with no overrides
//! let params = ParamLoader::new().without_env().resolve().unwrap();
//! assert_eq!(params.kinfu_request_topic, "/kinfu_request_topic");
//! ```

pub mod error;
pub mod magic;
pub mod resolve;
pub mod source;
pub mod table;

// Re-export commonly used types
pub use error::{ParamError, Result};
pub use magic::verify_magic;
pub use resolve::{load_params, ParamLoader, ResolvedParams};
pub use source::{EnvSource, FileSource, MapSource, ParamSource};
pub use table::{ConfigurationEntry, Param};

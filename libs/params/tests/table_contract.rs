//! Fixed keys and defaults of the kinfu_output parameter table
//!
//! These strings are shared with the nodes that read the parameters, so any
//! change here breaks existing launch files and environments.

use std::collections::HashSet;

use kinfu_params::table::{self, get_default, get_key, ALL};
use kinfu_params::Param;

#[test]
fn test_response_topic() {
    assert_eq!(get_key("response_topic"), Some("kinfu_response_topic"));
    assert_eq!(get_default("response_topic"), Some("/kinfu_response_topic"));
}

#[test]
fn test_request_action_name() {
    assert_eq!(get_key("request_action_name"), Some("request_action_name"));
    assert_eq!(
        get_default("request_action_name"),
        Some("/kinfu_output/actions/request")
    );
}

#[test]
fn test_request_action_magic() {
    assert_eq!(
        get_key("request_action_magic"),
        Some("kinfu_output_request_action_magic")
    );
    assert_eq!(
        get_default("request_action_magic"),
        Some("KINFU_OUTPUT_ACTION_MAGIC_SOURCE_NAME")
    );
}

#[test]
fn test_kinfu_request_topic() {
    assert_eq!(get_key("kinfu_request_topic"), Some("kinfu_request_topic"));
    assert_eq!(get_default("kinfu_request_topic"), Some("/kinfu_request_topic"));
}

#[test]
fn test_named_constants_match_table() {
    assert_eq!(Param::ResponseTopic.key(), table::PARAM_NAME_RESPONSE_TOPIC);
    assert_eq!(
        Param::ResponseTopic.default_value(),
        table::PARAM_DEFAULT_RESPONSE_TOPIC
    );
    assert_eq!(
        Param::RequestActionMagic.key(),
        table::PARAM_NAME_REQUEST_ACTION_MAGIC
    );
    assert_eq!(
        Param::KinfuRequestTopic.default_value(),
        table::PARAM_DEFAULT_KINFU_REQUEST_TOPIC
    );
}

#[test]
fn test_keys_distinct_from_defaults() {
    for entry in ALL.iter() {
        assert!(!entry.key.is_empty(), "{} has an empty key", entry.param);
        assert!(!entry.default_value.is_empty(), "{} has an empty default", entry.param);
        assert_ne!(entry.key, entry.default_value);
    }
}

#[test]
fn test_keys_pairwise_distinct() {
    let keys: HashSet<&str> = Param::iter().map(Param::key).collect();
    assert_eq!(keys.len(), 4);
}

#[test]
fn test_table_readable_from_threads() {
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| Param::iter().map(Param::key).collect::<Vec<_>>()))
        .collect();

    for handle in handles {
        let keys = handle.join().unwrap();
        assert_eq!(keys, ALL.iter().map(|e| e.key).collect::<Vec<_>>());
    }
}

//! Image feed: where the list of images comes from and how it is parsed.
//!
//! A feed body is a JSON object whose list of image locations sits under a
//! known field (`"message"` for the dog.ceo API).  A missing or non-array
//! field is an empty feed, not an error.

use std::path::PathBuf;

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://dog.ceo/api/breed/whippet/images";
pub const DEFAULT_LIST_FIELD: &str = "message";

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP {0}")]
    Status(u16),
    #[error("feed reported an error: {0}")]
    Api(String),
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("image decode failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Location of a feed or of a single image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Http(String),
    File(PathBuf),
}

impl Source {
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Http(trimmed.to_string())
        } else if let Some(path) = trimmed.strip_prefix("file://") {
            Self::File(PathBuf::from(path))
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    status: Option<String>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

/// Pull the image list out of a feed body.  Non-string entries are skipped.
pub fn parse_image_list(body: &str, field: &str) -> Result<Vec<String>, FeedError> {
    let envelope: Envelope = serde_json::from_str(body)?;

    if envelope.status.as_deref() == Some("error") {
        let message = envelope
            .fields
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        return Err(FeedError::Api(message));
    }

    let images = envelope
        .fields
        .get(field)
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_list_under_field() {
        let body = r#"{"message":["https://a/1.jpg","https://a/2.jpg"],"status":"success"}"#;
        let images = parse_image_list(body, "message").unwrap();
        assert_eq!(images, vec!["https://a/1.jpg", "https://a/2.jpg"]);
    }

    #[test]
    fn custom_field_and_skipped_entries() {
        let body = r#"{"items":["one.png", 4, null, "two.png"]}"#;
        let images = parse_image_list(body, "items").unwrap();
        assert_eq!(images, vec!["one.png", "two.png"]);
    }

    #[test]
    fn non_array_or_missing_field_is_empty() {
        assert!(parse_image_list(r#"{"message":"nope"}"#, "message").unwrap().is_empty());
        assert!(parse_image_list(r#"{}"#, "message").unwrap().is_empty());
    }

    #[test]
    fn error_status_and_bad_json_fail() {
        let body = r#"{"status":"error","message":"Breed not found"}"#;
        match parse_image_list(body, "message") {
            Err(FeedError::Api(msg)) => assert_eq!(msg, "Breed not found"),
            other => panic!("unexpected: {other:?}"),
        }
        assert!(matches!(
            parse_image_list("not json", "message"),
            Err(FeedError::Json(_))
        ));
    }

    #[test]
    fn source_detection() {
        assert_eq!(
            Source::parse("https://dog.ceo/x"),
            Source::Http("https://dog.ceo/x".into())
        );
        assert_eq!(
            Source::parse("file:///tmp/feed.json"),
            Source::File(PathBuf::from("/tmp/feed.json"))
        );
        assert_eq!(
            Source::parse("feed.json"),
            Source::File(PathBuf::from("feed.json"))
        );
    }
}

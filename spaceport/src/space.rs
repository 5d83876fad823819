//! Space records as returned by the spaces API.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::LazyLock;

static SPACE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9_-]+$").expect("space id pattern is valid"));

/// An isolated namespace on an instance.
///
/// Only the fields the migration looks at are typed; everything else the
/// instance returns (`initials`, `imageUrl`, `disabledFeatures`, ...) lands in
/// `extra` and is written back untouched when the space is recreated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Space {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Space {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            color: None,
            extra: Map::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Ids end up in URL paths and file names, so only the characters the
    /// instance itself accepts are allowed.
    pub fn is_valid_id(id: &str) -> bool {
        SPACE_ID.is_match(id)
    }

    /// Body for `POST /api/spaces/space`.
    ///
    /// `_reserved` is set by the instance on built-in spaces and is rejected on create.
    pub fn creation_body(&self) -> serde_json::Result<Value> {
        let mut body = serde_json::to_value(self)?;
        if let Value::Object(ref mut map) = body {
            map.remove("_reserved");
        }
        Ok(body)
    }
}

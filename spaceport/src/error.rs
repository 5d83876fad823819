use thiserror::Error;

/// Remediation hint attached to every import conflict.
pub const CONFLICT_GUIDANCE: &str =
    "re-run with --overwrite to replace existing objects, or --create-new-copies to import them under new ids";

#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{}", validation_message(.unknown_spaces, .unknown_types, .invalid_ids))]
    Validation {
        unknown_spaces: Vec<String>,
        unknown_types: Vec<String>,
        invalid_ids: Vec<String>,
    },

    #[error("{context} failed with status {status}: {body}")]
    Transport {
        context: String,
        status: u16,
        body: String,
    },

    #[error("Connection failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Import into space '{space}' hit conflicting objects ({}): {body}", CONFLICT_GUIDANCE)]
    Conflict { space: String, body: String },

    #[error("Import into space '{space}' reported errors: {body}")]
    ImportRejected { space: String, body: String },

    #[error("Export manifest not found at {0}")]
    ManifestMissing(String),

    #[error("Manifest references missing bundle files: {}", .0.join(", "))]
    BundleMissing(Vec<String>),

    #[error("Import aborted at space '{space}' (completed: [{}]): {source}", .completed.join(", "))]
    ImportAborted {
        space: String,
        completed: Vec<String>,
        source: Box<MigrateError>,
    },

    #[error("Import cancelled by operator")]
    Declined,

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, MigrateError>;

fn validation_message(spaces: &[String], types: &[String], invalid_ids: &[String]) -> String {
    let mut parts = Vec::new();
    if !spaces.is_empty() {
        parts.push(format!("unknown spaces: {}", spaces.join(", ")));
    }
    if !types.is_empty() {
        parts.push(format!("unknown object types: {}", types.join(", ")));
    }
    if !invalid_ids.is_empty() {
        parts.push(format!("invalid space ids: {}", invalid_ids.join(", ")));
    }
    format!("Validation failed: {}", parts.join("; "))
}

impl MigrateError {
    /// Build a transport error from a response status and body.
    pub fn transport(context: impl Into<String>, status: reqwest::StatusCode, body: String) -> Self {
        Self::Transport {
            context: context.into(),
            status: status.as_u16(),
            body,
        }
    }

    /// Whether this error (or the error that aborted an import) is a conflict.
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Conflict { .. } => true,
            Self::ImportAborted { source, .. } => source.is_conflict(),
            _ => false,
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Spaces that finished importing before the run was aborted.
    pub fn completed_spaces(&self) -> &[String] {
        match self {
            Self::ImportAborted { completed, .. } => completed,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_lists_everything() {
        let err = MigrateError::Validation {
            unknown_spaces: vec!["ops".into(), "sales".into()],
            unknown_types: vec!["widget".into()],
            invalid_ids: vec![],
        };
        assert_eq!(
            err.to_string(),
            "Validation failed: unknown spaces: ops, sales; unknown object types: widget"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn test_conflict_carries_guidance() {
        let err = MigrateError::Conflict {
            space: "marketing".into(),
            body: "{\"statusCode\":409}".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("marketing"));
        assert!(msg.contains("--overwrite"));
        assert!(msg.contains("--create-new-copies"));
    }

    #[test]
    fn test_aborted_reports_completed_and_conflict() {
        let err = MigrateError::ImportAborted {
            space: "marketing".into(),
            completed: vec!["default".into()],
            source: Box::new(MigrateError::Conflict {
                space: "marketing".into(),
                body: String::new(),
            }),
        };
        assert!(err.is_conflict());
        assert_eq!(err.completed_spaces(), ["default".to_string()]);
        assert!(err.to_string().contains("completed: [default]"));
    }
}

//! Conflict-resolution modes for imports.
//!
//! The instance resolves id collisions in one of three ways, picked per
//! request through query parameters. `createNewCopies` regenerates every id,
//! which makes it incompatible with both `overwrite` and `compatibilityMode`;
//! the combination is rejected here before anything touches the network.

use crate::error::{MigrateError, Result};
use std::fmt;

/// Raw conflict flags as given on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModeFlags {
    pub create_new_copies: bool,
    pub overwrite: bool,
    pub compatibility_mode: bool,
}

/// A validated conflict mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictMode {
    /// Import every object under a freshly generated id.
    CreateNewCopies,
    /// Replace objects that already exist.
    Overwrite { compatibility: bool },
    /// Keep ids, applying compatibility adjustments, without overwriting.
    Compatibility,
    /// No flags; the destination's own conflict behaviour applies.
    Default,
}

impl ConflictMode {
    /// Query parameters for the import endpoint.
    pub fn query_params(&self) -> Vec<(&'static str, &'static str)> {
        match self {
            Self::CreateNewCopies => vec![("createNewCopies", "true")],
            Self::Overwrite { compatibility } => {
                let mut params = vec![("overwrite", "true")];
                if *compatibility {
                    params.push(("compatibilityMode", "true"));
                }
                params
            }
            Self::Compatibility => vec![("compatibilityMode", "true")],
            Self::Default => Vec::new(),
        }
    }

    /// Whether existing objects on the destination may be replaced.
    pub fn is_destructive(&self) -> bool {
        matches!(self, Self::Overwrite { .. })
    }
}

impl fmt::Display for ConflictMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateNewCopies => write!(f, "create new copies"),
            Self::Overwrite { compatibility: false } => write!(f, "overwrite"),
            Self::Overwrite { compatibility: true } => write!(f, "overwrite (compatibility mode)"),
            Self::Compatibility => write!(f, "compatibility mode"),
            Self::Default => write!(f, "destination default"),
        }
    }
}

/// Turn raw flags into a conflict mode, rejecting illegal combinations.
pub fn validate(flags: ModeFlags) -> Result<ConflictMode> {
    if flags.create_new_copies && (flags.overwrite || flags.compatibility_mode) {
        let mut offending = vec!["--create-new-copies"];
        if flags.overwrite {
            offending.push("--overwrite");
        }
        if flags.compatibility_mode {
            offending.push("--compatibility-mode");
        }
        return Err(MigrateError::Config(format!(
            "{} cannot be combined; --create-new-copies excludes --overwrite and --compatibility-mode",
            offending.join(" with ")
        )));
    }

    Ok(match (flags.create_new_copies, flags.overwrite, flags.compatibility_mode) {
        (true, _, _) => ConflictMode::CreateNewCopies,
        (false, true, compatibility) => ConflictMode::Overwrite { compatibility },
        (false, false, true) => ConflictMode::Compatibility,
        (false, false, false) => ConflictMode::Default,
    })
}

//! Selection of the (space, object type) pairs a run operates on.

use crate::error::{MigrateError, Result};
use crate::space::Space;
use serde::Serialize;
use std::fmt;

/// Saved-object types `--types` accepts out of the box.
pub const KNOWN_TYPES: &[&str] = &[
    "dashboard",
    "visualization",
    "search",
    "index-pattern",
    "lens",
    "map",
    "config",
    "query",
    "tag",
];

/// Marker the export endpoint reads as "every type".
pub const WILDCARD_TYPE: &str = "*";

/// Object types requested from the export endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeFilter {
    All,
    Only(Vec<String>),
}

impl TypeFilter {
    /// Value of the `type` field in an export request.
    pub fn wire(&self) -> Vec<&str> {
        match self {
            Self::All => vec![WILDCARD_TYPE],
            Self::Only(types) => types.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all types"),
            Self::Only(types) => write!(f, "{}", types.join(", ")),
        }
    }
}

impl Serialize for TypeFilter {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.wire().serialize(serializer)
    }
}

/// Spaces and types a run will touch.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub spaces: Vec<Space>,
    pub types: TypeFilter,
}

/// Apply the space and type filters to the spaces found on an instance.
///
/// An empty `space_filter` selects every space; an empty `type_filter` selects
/// every type. Every unknown space id and every unknown type is reported in a
/// single validation error, so the operator can fix the whole command at once.
pub fn resolve(
    all_spaces: &[Space],
    space_filter: &[String],
    type_filter: &[String],
    known_types: &[String],
) -> Result<Selection> {
    let unknown_spaces = unmatched(space_filter, |id| all_spaces.iter().any(|s| &s.id == id));
    let unknown_types = unmatched(type_filter, |t| known_types.contains(t));

    let spaces: Vec<Space> = if space_filter.is_empty() {
        all_spaces.to_vec()
    } else {
        all_spaces
            .iter()
            .filter(|s| space_filter.contains(&s.id))
            .cloned()
            .collect()
    };

    let invalid_ids: Vec<String> = spaces
        .iter()
        .filter(|s| !Space::is_valid_id(&s.id))
        .map(|s| s.id.clone())
        .collect();

    if !unknown_spaces.is_empty() || !unknown_types.is_empty() || !invalid_ids.is_empty() {
        return Err(MigrateError::Validation {
            unknown_spaces,
            unknown_types,
            invalid_ids,
        });
    }

    let types = if type_filter.is_empty() {
        TypeFilter::All
    } else {
        TypeFilter::Only(type_filter.to_vec())
    };

    Ok(Selection { spaces, types })
}

/// Values not accepted by `known`, in input order, without duplicates.
fn unmatched(values: &[String], known: impl Fn(&String) -> bool) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for value in values {
        if !known(value) && !out.contains(value) {
            out.push(value.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spaces(ids: &[&str]) -> Vec<Space> {
        ids.iter().map(|id| Space::new(*id, id.to_uppercase())).collect()
    }

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn known() -> Vec<String> {
        KNOWN_TYPES.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_no_filters_selects_everything() {
        let all = spaces(&["default", "marketing"]);
        let selection = resolve(&all, &[], &[], &known()).unwrap();
        assert_eq!(selection.spaces, all);
        assert_eq!(selection.types, TypeFilter::All);
        assert_eq!(selection.types.wire(), vec!["*"]);
    }

    #[test]
    fn test_space_filter_scenario() {
        let all = spaces(&["default", "marketing"]);
        let selection = resolve(&all, &strings(&["marketing"]), &[], &known()).unwrap();
        assert_eq!(selection.spaces.len(), 1);
        assert_eq!(selection.spaces[0].id, "marketing");
        assert_eq!(selection.types, TypeFilter::All);
    }

    #[test]
    fn test_order_follows_instance_not_filter() {
        let all = spaces(&["a", "b", "c"]);
        let selection = resolve(&all, &strings(&["c", "a", "c"]), &[], &known()).unwrap();
        let ids: Vec<&str> = selection.spaces.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_type_filter_kept_verbatim() {
        let all = spaces(&["default"]);
        let types = strings(&["visualization", "dashboard"]);
        let selection = resolve(&all, &[], &types, &known()).unwrap();
        assert_eq!(selection.types, TypeFilter::Only(types));
        assert_eq!(selection.types.wire(), vec!["visualization", "dashboard"]);
    }

    #[test]
    fn test_all_mismatches_reported() {
        let all = spaces(&["default", "marketing"]);
        let err = resolve(
            &all,
            &strings(&["sales", "marketing", "ops"]),
            &strings(&["dashboard", "widget", "Dashboard"]),
            &known(),
        )
        .unwrap_err();

        match err {
            MigrateError::Validation {
                unknown_spaces,
                unknown_types,
                invalid_ids,
            } => {
                assert_eq!(unknown_spaces, strings(&["sales", "ops"]));
                assert_eq!(unknown_types, strings(&["widget", "Dashboard"]));
                assert!(invalid_ids.is_empty());
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_unsafe_space_id_rejected() {
        let all = vec![Space::new("Bad Id", "Bad")];
        let err = resolve(&all, &[], &[], &known()).unwrap_err();
        assert!(err.to_string().contains("invalid space ids: Bad Id"));
    }

    #[test]
    fn test_wire_serialization() {
        let body = serde_json::json!({ "type": TypeFilter::All });
        assert_eq!(body, serde_json::json!({ "type": ["*"] }));
    }
}

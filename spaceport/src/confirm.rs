//! Operator confirmation before an import touches the destination.

use crate::error::Result;
use crate::importer::ImportPlan;
use crate::mode::ConflictMode;
use std::fmt::Write;

/// Asks whether an import plan may go ahead.
pub trait Confirm: Send + Sync {
    fn confirm(&self, plan: &ImportPlan, mode: ConflictMode) -> Result<bool>;
}

/// Fixed answer, for `--yes` and tests.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Confirm for AutoConfirm {
    fn confirm(&self, _plan: &ImportPlan, _mode: ConflictMode) -> Result<bool> {
        Ok(self.0)
    }
}

/// Human-readable summary of what an import will do.
pub fn describe_plan(plan: &ImportPlan, mode: ConflictMode) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Import from {} into {} spaces, conflict mode: {}",
        plan.location,
        plan.entries.len(),
        mode
    );
    for entry in &plan.entries {
        let what = match &entry.bundle {
            Some(file) => file.as_str(),
            None => "(space only, no bundle)",
        };
        let _ = writeln!(out, "  {:<24} {}", entry.space.id, what);
    }
    if mode.is_destructive() {
        let _ = writeln!(out, "Existing objects with matching ids will be replaced.");
    }
    out
}

/// `y` / `yes` in any case; anything else, including an empty line, is no.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

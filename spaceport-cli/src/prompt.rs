//! Terminal interaction: password entry and import confirmation.

use anyhow::{Context, Result};
use secrecy::SecretString;
use spaceport::confirm::{describe_plan, is_affirmative};
use spaceport::{Confirm, ConflictMode, ImportPlan};
use std::io::{self, BufRead, Write};

const PASSWORD_ENV: &str = "SPACEPORT_PASSWORD";

/// Password from `SPACEPORT_PASSWORD`, or a masked prompt.
pub fn read_password(username: &str) -> Result<SecretString> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(SecretString::from(password));
    }
    let password = rpassword::prompt_password(format!("Enter password for {}: ", username))
        .context("Failed to read password")?;
    Ok(SecretString::from(password))
}

/// Prints the plan and asks for `y/N` on stdin.
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, plan: &ImportPlan, mode: ConflictMode) -> spaceport::Result<bool> {
        // Runs inside the import task; the stdin read blocks until the operator answers.
        tokio::task::block_in_place(|| {
            ask(plan, mode, &mut io::stdin().lock(), &mut io::stdout())
        })
    }
}

fn ask(
    plan: &ImportPlan,
    mode: ConflictMode,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> spaceport::Result<bool> {
    write!(output, "{}", describe_plan(plan, mode))?;
    write!(output, "Proceed? [y/N] ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}

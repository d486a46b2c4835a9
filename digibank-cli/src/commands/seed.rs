//! Seed command - default bank account plus an optional operator user

use anyhow::{bail, Result};
use dialoguer::Password;

use digibank_core::services::SeedOutcome;

use super::get_context;
use crate::output;

const ENV_PASSWORD: &str = "DIGIBANK_PASSWORD";

pub fn run(email: Option<String>, name: &str, password: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;

    let account = ctx.seed_service.seed_default_account()?;
    let operator = match email {
        Some(email) => {
            let password = get_password_with_confirm(password)?;
            Some(ctx.seed_service.seed_operator(name, &email, &password)?)
        }
        None => None,
    };

    if json {
        let result = serde_json::json!({
            "account": account,
            "operator": operator,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    report("Default bank account", &account);
    if let Some(operator) = &operator {
        report("Operator user", operator);
    } else {
        output::info("No --email given; skipped operator user");
    }
    Ok(())
}

fn report(what: &str, outcome: &SeedOutcome) {
    match outcome {
        SeedOutcome::Created { id } => output::success(&format!("{what} created ({id})")),
        SeedOutcome::AlreadyExists { id } => {
            output::warning(&format!("{what} already exists ({id}); skipped"))
        }
    }
}

/// Password from the flag, then DIGIBANK_PASSWORD, then an interactive prompt
fn get_password_with_confirm(password: Option<String>) -> Result<String> {
    if let Some(p) = password {
        return Ok(p);
    }
    if let Ok(p) = std::env::var(ENV_PASSWORD) {
        if !p.is_empty() {
            return Ok(p);
        }
    }

    let p = Password::new()
        .with_prompt("Operator password")
        .interact()?;
    let confirm = Password::new()
        .with_prompt("Confirm password")
        .interact()?;
    if p != confirm {
        bail!("Password confirmation mismatched");
    }
    Ok(p)
}

//! Request field validation
//!
//! Each check returns the normalized value or a `Validation` error whose
//! message names the offending field.

use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;

use super::account::balance_limit;
use super::result::{Error, Result};

pub const NAME_MAX_LEN: usize = 100;
pub const BANK_MAX_LEN: usize = 20;
pub const TITLE_MAX_LEN: usize = 200;
pub const ACCOUNT_NUMBER_LEN: usize = 9;
pub const PASSWORD_MIN_LEN: usize = 6;
pub const PASSWORD_MAX_LEN: usize = 32;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
        .expect("email pattern compiles")
});

/// Non-empty after trimming
pub fn required(value: &str, label: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(format!("{label} is required")));
    }
    Ok(trimmed.to_string())
}

fn bounded(value: &str, label: &str, max: usize) -> Result<String> {
    let value = required(value, label)?;
    if value.chars().count() > max {
        return Err(Error::validation(format!(
            "{label} length must be less than or equal to {max} characters long"
        )));
    }
    Ok(value)
}

/// Account owner name, uppercased
pub fn owner_name(value: &str) -> Result<String> {
    bounded(value, "Name", NAME_MAX_LEN).map(|v| v.to_uppercase())
}

/// User display name, kept as given
pub fn user_name(value: &str) -> Result<String> {
    bounded(value, "Name", NAME_MAX_LEN)
}

pub fn account_number(value: &str) -> Result<String> {
    let value = required(value, "Account Number")?;
    if value.len() != ACCOUNT_NUMBER_LEN || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::validation(format!(
            "Account Number must be exactly {ACCOUNT_NUMBER_LEN} digits"
        )));
    }
    Ok(value)
}

/// Bank code, uppercased
pub fn bank(value: &str) -> Result<String> {
    bounded(value, "Bank", BANK_MAX_LEN).map(|v| v.to_uppercase())
}

pub fn title(value: &str) -> Result<String> {
    bounded(value, "Title", TITLE_MAX_LEN)
}

/// Money amounts must be at least 1 and fit a stored balance
pub fn amount(value: Decimal, label: &str) -> Result<Decimal> {
    if value < Decimal::ONE {
        return Err(Error::validation(format!(
            "{label} must be greater than or equal to 1"
        )));
    }
    if value >= balance_limit() {
        return Err(Error::validation(format!(
            "{label} must be less than {}",
            balance_limit()
        )));
    }
    Ok(value)
}

pub fn email(value: &str) -> Result<String> {
    let value = required(value, "Email")?;
    if !EMAIL_RE.is_match(&value) {
        return Err(Error::validation("Email must be a valid email"));
    }
    Ok(value.to_lowercase())
}

/// Present, untrimmed; passwords are compared byte for byte
pub fn password_present<'a>(value: &'a str, label: &str) -> Result<&'a str> {
    if value.is_empty() {
        return Err(Error::validation(format!("{label} is required")));
    }
    Ok(value)
}

/// Strength policy for new passwords
pub fn password_policy(value: &str, label: &str) -> Result<()> {
    let len = value.chars().count();
    if len < PASSWORD_MIN_LEN || len > PASSWORD_MAX_LEN {
        return Err(Error::validation(format!(
            "{label} must be between {PASSWORD_MIN_LEN} and {PASSWORD_MAX_LEN} characters long"
        )));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(Error::validation(format!("{label} should not contain white spaces")));
    }
    if !value.is_ascii() {
        return Err(Error::validation(format!(
            "{label} should contain only latin characters"
        )));
    }

    let checks: [(fn(&u8) -> bool, &str); 4] = [
        (u8::is_ascii_lowercase, "lowercase character"),
        (u8::is_ascii_uppercase, "uppercase character"),
        (u8::is_ascii_digit, "numeric character"),
        (u8::is_ascii_punctuation, "special character"),
    ];
    for (check, what) in checks {
        if !value.as_bytes().iter().any(check) {
            return Err(Error::validation(format!(
                "{label} should contain at least 1 {what}"
            )));
        }
    }
    Ok(())
}

/// Policy check on `password` plus equality with `confirm`
pub fn new_password(password: &str, confirm: &str, label: &str) -> Result<()> {
    password_policy(password, label)?;
    if password != confirm {
        return Err(Error::validation("Password confirmation mismatched"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_number() {
        assert_eq!(account_number("123456789").unwrap(), "123456789");
        assert!(account_number("12345678").is_err());
        assert!(account_number("1234567890").is_err());
        assert!(account_number("12345678a").is_err());
        assert!(account_number("").is_err());
    }

    #[test]
    fn test_text_lengths() {
        assert_eq!(owner_name("john doe").unwrap(), "JOHN DOE");
        assert!(owner_name("   ").is_err());
        assert!(owner_name(&"x".repeat(101)).is_err());
        assert_eq!(bank("bca").unwrap(), "BCA");
        assert!(bank(&"b".repeat(21)).is_err());
        assert!(title(&"t".repeat(200)).is_ok());
        assert!(title(&"t".repeat(201)).is_err());
    }

    #[test]
    fn test_amount() {
        assert!(amount(Decimal::ONE, "Deposit").is_ok());
        assert!(amount(Decimal::new(99, 2), "Deposit").is_err());
        assert!(amount(Decimal::ZERO, "Deposit").is_err());
        assert!(amount(Decimal::MAX, "Deposit").is_err());
        assert!(amount(balance_limit(), "Deposit").is_err());
        assert!(amount(balance_limit() - Decimal::ONE, "Deposit").is_ok());
    }

    #[test]
    fn test_email() {
        assert_eq!(email("Ops@Bank.Example").unwrap(), "ops@bank.example");
        assert!(email("not-an-email").is_err());
        assert!(email("a@b").is_err());
    }

    #[test]
    fn test_password_policy() {
        assert!(password_policy("Secr3t!", "Password").is_ok());
        assert!(password_policy("S3t!", "Password").is_err());
        assert!(password_policy("secret1!", "Password").is_err());
        assert!(password_policy("SECRET1!", "Password").is_err());
        assert!(password_policy("Secret!!", "Password").is_err());
        assert!(password_policy("Secret12", "Password").is_err());
        assert!(password_policy("Sec ret1!", "Password").is_err());
        assert!(password_policy("Sécret1!", "Password").is_err());
        assert!(password_policy(&format!("Aa1!{}", "x".repeat(29)), "Password").is_err());
    }

    #[test]
    fn test_confirmation_mismatch() {
        let err = new_password("Secr3t!", "Secr3t?", "Password").unwrap_err();
        assert_eq!(err.to_string(), "Password confirmation mismatched");
        assert!(new_password("Secr3t!", "Secr3t!", "Password").is_ok());
    }
}

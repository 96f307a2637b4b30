//! Input validators for account fields.
//!
//! Pure functions; each returns the first rule the input breaks.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{
    MAX_NAME_LENGTH, MAX_USERNAME_LENGTH, MIN_NAME_LENGTH, MIN_PASSWORD_LENGTH,
    MIN_USERNAME_LENGTH,
};
use crate::error::ValidationError;

static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+(\.[A-Za-z0-9]+)*$").expect("valid username regex"));

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// Validate a username: 3-32 characters, alphanumeric segments joined by single dots.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.chars().count();
    if len < MIN_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooShort);
    }
    if len > MAX_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooLong);
    }
    if username.starts_with('.') || username.ends_with('.') {
        return Err(ValidationError::UsernameEdgeDot);
    }
    if !USERNAME_REGEX.is_match(username) {
        return Err(ValidationError::UsernameInvalidFormat);
    }
    Ok(())
}

/// Validate an email address has the `local@domain.tld` shape.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmailFormat);
    }
    Ok(())
}

/// Validate a display name: 2-32 characters once surrounding whitespace is trimmed.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let len = name.trim().chars().count();
    if len < MIN_NAME_LENGTH {
        return Err(ValidationError::NameTooShort);
    }
    if len > MAX_NAME_LENGTH {
        return Err(ValidationError::NameTooLong);
    }
    Ok(())
}

/// Validate a new password against the full strength rules.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    validate_password_length(password)?;

    let mut has_upper = false;
    let mut has_lower = false;
    let mut has_digit = false;
    let mut has_special = false;

    for c in password.chars() {
        if c.is_uppercase() {
            has_upper = true;
        } else if c.is_lowercase() {
            has_lower = true;
        } else if c.is_ascii_digit() {
            has_digit = true;
        } else if is_symbol(c) {
            has_special = true;
        }
    }

    if !(has_upper && has_lower && has_digit && has_special) {
        return Err(ValidationError::PasswordMissingComplexity);
    }
    Ok(())
}

/// ASCII punctuation, or a visible non-ASCII char outside the letter,
/// number, separator, control and format classes.
fn is_symbol(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_punctuation();
    }
    !c.is_alphanumeric() && !c.is_whitespace() && !c.is_control() && !is_format(c)
}

/// Invisible format characters (Unicode `Cf`).
fn is_format(c: char) -> bool {
    matches!(
        c,
        '\u{00AD}'
            | '\u{0600}'..='\u{0605}'
            | '\u{061C}'
            | '\u{06DD}'
            | '\u{070F}'
            | '\u{0890}'..='\u{0891}'
            | '\u{08E2}'
            | '\u{180E}'
            | '\u{200B}'..='\u{200F}'
            | '\u{202A}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{206F}'
            | '\u{FEFF}'
            | '\u{FFF9}'..='\u{FFFB}'
            | '\u{110BD}'
            | '\u{110CD}'
            | '\u{13430}'..='\u{1343F}'
            | '\u{1BCA0}'..='\u{1BCA3}'
            | '\u{1D173}'..='\u{1D17A}'
            | '\u{E0001}'
            | '\u{E0020}'..='\u{E007F}'
    )
}

/// Minimum-length check only.
///
/// Used at login, where passwords set under older, looser rules must still
/// be accepted.
pub fn validate_password_length(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert_eq!(validate_username("ab"), Err(ValidationError::UsernameTooShort));
        assert_eq!(
            validate_username(&"a".repeat(33)),
            Err(ValidationError::UsernameTooLong)
        );
        assert_eq!(validate_username(".alice"), Err(ValidationError::UsernameEdgeDot));
        assert_eq!(validate_username("alice."), Err(ValidationError::UsernameEdgeDot));
        assert_eq!(
            validate_username("al..ice"),
            Err(ValidationError::UsernameInvalidFormat)
        );
        assert_eq!(
            validate_username("al_ice"),
            Err(ValidationError::UsernameInvalidFormat)
        );
        assert_eq!(
            validate_username("äbc"),
            Err(ValidationError::UsernameInvalidFormat)
        );

        assert!(validate_username("abc").is_ok());
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("alice.smith.2").is_ok());
        assert!(validate_username(&"a".repeat(32)).is_ok());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("alice@x.com").is_ok());
        assert!(validate_email("first.last+tag@mail.example.org").is_ok());

        for bad in ["", "alice", "alice@", "@x.com", "alice@x", "alice@x.c", "a b@x.com"] {
            assert_eq!(
                validate_email(bad),
                Err(ValidationError::InvalidEmailFormat),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_name_rules_trim_whitespace() {
        assert_eq!(validate_name("A"), Err(ValidationError::NameTooShort));
        assert_eq!(validate_name("   A   "), Err(ValidationError::NameTooShort));
        assert_eq!(validate_name(&"n".repeat(33)), Err(ValidationError::NameTooLong));

        assert!(validate_name("Al").is_ok());
        assert!(validate_name("  Alice A  ").is_ok());
        assert!(validate_name(&format!("  {}  ", "n".repeat(32))).is_ok());
    }

    #[test]
    fn test_password_strength() {
        assert_eq!(validate_password("Sh0rt!"), Err(ValidationError::PasswordTooShort));
        assert_eq!(
            validate_password("alllowercase1!"),
            Err(ValidationError::PasswordMissingComplexity)
        );
        assert_eq!(
            validate_password("ALLUPPERCASE1!"),
            Err(ValidationError::PasswordMissingComplexity)
        );
        assert_eq!(
            validate_password("NoDigitsHere!"),
            Err(ValidationError::PasswordMissingComplexity)
        );
        assert_eq!(
            validate_password("NoSymbols123"),
            Err(ValidationError::PasswordMissingComplexity)
        );

        assert!(validate_password("Str0ng!Pass").is_ok());
        assert!(validate_password("An0ther$Pass").is_ok());
        assert!(validate_password("Pr1ce\u{20AC}Tag").is_ok());
    }

    #[test]
    fn test_password_invisible_or_superscript_chars_do_not_count() {
        for password in [
            "Passw0rd\u{200D}",
            "Passw0rd\u{00AD}",
            "Passw0rd\u{FEFF}",
            "Passw\u{00B2}rd!",
        ] {
            assert_eq!(
                validate_password(password),
                Err(ValidationError::PasswordMissingComplexity),
                "{password:?} should be rejected"
            );
        }
        assert!(validate_password("Passw0rd!").is_ok());
    }

    #[test]
    fn test_login_password_length_only() {
        assert!(validate_password_length("lowercaseonly").is_ok());
        assert_eq!(
            validate_password_length("short"),
            Err(ValidationError::PasswordTooShort)
        );
    }
}

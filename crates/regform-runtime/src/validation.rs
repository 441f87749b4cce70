#![forbid(unsafe_code)]

//! Pure field classifiers used by submit and the live validators.

/// Live email classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmailValidity {
    Empty,
    /// Non-empty but missing `@` or `.`.
    Invalid,
    /// Contains both `@` and `.`, in any order.
    Valid,
}

/// Classify the trimmed email text.
///
/// This is a syntactic substring check, not an address parser: `"a@."`
/// is valid.
#[must_use]
pub fn classify_email(raw: &str) -> EmailValidity {
    let email = raw.trim();
    if email.contains('@') && email.contains('.') {
        EmailValidity::Valid
    } else if email.is_empty() {
        EmailValidity::Empty
    } else {
        EmailValidity::Invalid
    }
}

/// Live password-strength classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PasswordStrength {
    Empty,
    Weak,
    Strong,
}

/// Classify the untrimmed password by length in UTF-16 code units, the unit
/// the browser reports for `value.length`.
#[must_use]
pub fn classify_password(raw: &str, strong_len: usize) -> PasswordStrength {
    match raw.encode_utf16().count() {
        0 => PasswordStrength::Empty,
        n if n >= strong_len => PasswordStrength::Strong,
        _ => PasswordStrength::Weak,
    }
}

/// A required field is missing when its trimmed value is empty.
#[must_use]
pub fn is_blank(raw: &str) -> bool {
    raw.trim().is_empty()
}

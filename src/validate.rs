//! Name validation for schools and students.
//!
//! Both accept Arabic-block and ASCII letters plus whitespace; school names
//! additionally accept ASCII digits. Lengths are counted in characters of
//! the trimmed input.

const ARABIC_BLOCK: std::ops::RangeInclusive<char> = '\u{0600}'..='\u{06FF}';

const MIN_NAME_CHARS: usize = 2;
pub const MAX_SCHOOL_NAME_CHARS: usize = 100;
pub const MAX_STUDENT_NAME_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("{0} name must be at least 2 characters")]
    TooShort(&'static str),
    #[error("{0} name is too long")]
    TooLong(&'static str),
    #[error("{0} name contains characters that are not allowed")]
    InvalidCharacters(&'static str),
}

impl crate::event::ErrorCode for NameError {
    fn error_code(&self) -> &'static str {
        "E_INVALID_NAME"
    }
}

/// # Errors
///
/// Returns an error if the name is too short, too long, or contains
/// anything other than letters, digits and whitespace.
pub fn validate_school_name(name: &str) -> Result<(), NameError> {
    validate(name, "school", MAX_SCHOOL_NAME_CHARS, |c| is_letter(c) || c.is_ascii_digit())
}

/// # Errors
///
/// Returns an error if the name is too short, too long, or contains
/// anything other than letters and whitespace.
pub fn validate_student_name(name: &str) -> Result<(), NameError> {
    validate(name, "student", MAX_STUDENT_NAME_CHARS, is_letter)
}

/// URL-safe room name for a school: every character that is not a letter or
/// digit becomes `_`.
#[must_use]
pub fn school_slug(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| if is_letter(c) || c.is_ascii_digit() { c } else { '_' })
        .collect()
}

fn validate(name: &str, subject: &'static str, max: usize, allowed: impl Fn(char) -> bool) -> Result<(), NameError> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if len < MIN_NAME_CHARS {
        return Err(NameError::TooShort(subject));
    }
    if len > max {
        return Err(NameError::TooLong(subject));
    }
    if !trimmed.chars().all(|c| c.is_whitespace() || allowed(c)) {
        return Err(NameError::InvalidCharacters(subject));
    }
    Ok(())
}

fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || ARABIC_BLOCK.contains(&c)
}

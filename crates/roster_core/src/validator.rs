//! Ordered client-side checks for a submission draft.
//!
//! Rules run in a fixed order and the first failure wins. The photo pixel
//! dimensions are measured outside this module (they require decoding) and
//! handed in as a [`DimensionCheck`].

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::{Dimensions, Position, SubmissionDraft};

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 60;
pub const EMAIL_MAX_CHARS: usize = 100;
pub const PHOTO_MAX_BYTES: usize = 5 * 1024 * 1024;
pub const PHOTO_CONTENT_TYPES: [&str; 2] = ["image/jpeg", "image/jpg"];

/// Why a draft was refused. Variants are declared in rule order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReasonCode {
    NameLength,
    EmailFormat,
    PhoneFormat,
    PhotoMissing,
    PhotoTooLarge,
    PhotoType,
    PhotoDimensions,
    PositionMissing,
}

impl ReasonCode {
    pub fn default_message(self) -> &'static str {
        match self {
            ReasonCode::NameLength => "Name must be between 2 and 60 characters.",
            ReasonCode::EmailFormat => "Email is invalid or too long (maximum 100 characters).",
            ReasonCode::PhoneFormat => "Phone must be in the format +380XXXXXXXXX.",
            ReasonCode::PhotoMissing => "Photo is required.",
            ReasonCode::PhotoTooLarge => "Photo must be at most 5MB.",
            ReasonCode::PhotoType => "Photo must be a JPG/JPEG image.",
            ReasonCode::PhotoDimensions => "Photo must be at least 70x70 pixels.",
            ReasonCode::PositionMissing => "Select a position.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Invalid {
    pub reason: ReasonCode,
    pub message: &'static str,
}

impl From<ReasonCode> for Invalid {
    fn from(reason: ReasonCode) -> Self {
        Self {
            reason,
            message: reason.default_message(),
        }
    }
}

impl fmt::Display for Invalid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(Invalid),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn reason(&self) -> Option<ReasonCode> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(invalid) => Some(invalid.reason),
        }
    }
}

/// Tunable parts of the photo rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationRules {
    /// `None` skips the pixel-dimension check entirely.
    pub min_photo_dimensions: Option<Dimensions>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            min_photo_dimensions: Some(Dimensions::new(70, 70)),
        }
    }
}

/// Outcome of decoding the photo header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionCheck {
    /// Not measured (disabled, or not needed for the verdict).
    Skipped,
    Measured(Dimensions),
    Undecodable,
}

/// Runs every rule in order against `draft`.
pub fn validate_draft(
    draft: &SubmissionDraft,
    positions: &[Position],
    rules: &ValidationRules,
    dimensions: DimensionCheck,
) -> ValidationResult {
    match first_failure(draft, positions, rules, dimensions) {
        Some(reason) => ValidationResult::Invalid(Invalid::from(reason)),
        None => ValidationResult::Valid,
    }
}

/// Whether the verdict can still change once the photo has been measured.
///
/// A failure ordered before [`ReasonCode::PhotoDimensions`] already wins, so
/// decoding is only worth doing when the unmeasured verdict is `Valid` or a
/// later rule failed.
pub fn needs_dimension_check(unmeasured: &ValidationResult, rules: &ValidationRules) -> bool {
    if rules.min_photo_dimensions.is_none() {
        return false;
    }
    match unmeasured.reason() {
        None => true,
        Some(reason) => reason > ReasonCode::PhotoDimensions,
    }
}

fn first_failure(
    draft: &SubmissionDraft,
    positions: &[Position],
    rules: &ValidationRules,
    dimensions: DimensionCheck,
) -> Option<ReasonCode> {
    let name_len = draft.name.trim().chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&name_len) {
        return Some(ReasonCode::NameLength);
    }

    let email = draft.email.trim();
    if !is_valid_email(email) || email.chars().count() > EMAIL_MAX_CHARS {
        return Some(ReasonCode::EmailFormat);
    }

    if !is_valid_phone(draft.phone.trim()) {
        return Some(ReasonCode::PhoneFormat);
    }

    let Some(photo) = draft.photo.as_ref() else {
        return Some(ReasonCode::PhotoMissing);
    };
    if photo.size() > PHOTO_MAX_BYTES {
        return Some(ReasonCode::PhotoTooLarge);
    }
    if !is_allowed_content_type(&photo.content_type) {
        return Some(ReasonCode::PhotoType);
    }
    if let Some(minimum) = rules.min_photo_dimensions {
        match dimensions {
            DimensionCheck::Skipped => {}
            DimensionCheck::Measured(measured) if measured.covers(minimum) => {}
            DimensionCheck::Measured(_) | DimensionCheck::Undecodable => {
                return Some(ReasonCode::PhotoDimensions);
            }
        }
    }

    let selected = draft
        .position_id
        .is_some_and(|id| positions.iter().any(|position| position.id == id));
    if !selected {
        return Some(ReasonCode::PositionMissing);
    }

    None
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static PHONE_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Length is checked separately; this only constrains the shape.
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

fn phone_regex() -> &'static Regex {
    PHONE_RE.get_or_init(|| {
        Regex::new(r"^\+380[0-9]{9}$")
            .unwrap_or_else(|error| panic!("phone regex failed to compile: {error}"))
    })
}

/// `local@domain.tld` shape: no whitespace, exactly one `@`, and a `.` in the
/// domain with text on both sides.
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// `+380` followed by exactly nine ASCII digits.
pub fn is_valid_phone(phone: &str) -> bool {
    phone_regex().is_match(phone)
}

fn is_allowed_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or(content_type)
        .trim();
    PHOTO_CONTENT_TYPES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(essence))
}

mod common;

use common::{init_logging, photo, positions, valid_draft};
use roster_core::{
    needs_dimension_check, validate_draft, Dimensions, DimensionCheck, PhotoFile, ReasonCode,
    SubmissionDraft, ValidationResult, ValidationRules, PHOTO_MAX_BYTES,
};

fn check(draft: &SubmissionDraft, dimensions: DimensionCheck) -> ValidationResult {
    validate_draft(draft, &positions(), &ValidationRules::default(), dimensions)
}

fn measured(width: u32, height: u32) -> DimensionCheck {
    DimensionCheck::Measured(Dimensions::new(width, height))
}

#[test]
fn valid_draft_passes_every_rule() {
    init_logging();
    assert_eq!(check(&valid_draft(), measured(200, 200)), ValidationResult::Valid);
}

#[test]
fn first_failing_rule_wins_over_later_failures() {
    init_logging();
    // Each draft breaks rule k and every rule after it.
    let cases: Vec<(ReasonCode, SubmissionDraft)> = vec![
        (
            ReasonCode::NameLength,
            SubmissionDraft {
                name: "A".to_string(),
                email: "nope".to_string(),
                phone: "123".to_string(),
                position_id: None,
                photo: None,
            },
        ),
        (
            ReasonCode::EmailFormat,
            SubmissionDraft {
                email: "ana@example".to_string(),
                phone: "+38099".to_string(),
                position_id: Some(99),
                photo: None,
                ..valid_draft()
            },
        ),
        (
            ReasonCode::PhoneFormat,
            SubmissionDraft {
                phone: "+38099123456".to_string(),
                position_id: None,
                photo: Some(PhotoFile::new("x.png", "image/png", vec![0u8; 4])),
                ..valid_draft()
            },
        ),
        (
            ReasonCode::PhotoMissing,
            SubmissionDraft {
                photo: None,
                position_id: None,
                ..valid_draft()
            },
        ),
        (
            ReasonCode::PhotoTooLarge,
            SubmissionDraft {
                photo: Some(PhotoFile::new(
                    "big.png",
                    "image/png",
                    vec![0u8; PHOTO_MAX_BYTES + 1],
                )),
                position_id: None,
                ..valid_draft()
            },
        ),
        (
            ReasonCode::PhotoType,
            SubmissionDraft {
                photo: Some(PhotoFile::new("me.png", "image/png", vec![0u8; 16])),
                position_id: None,
                ..valid_draft()
            },
        ),
        (
            ReasonCode::PositionMissing,
            SubmissionDraft {
                position_id: Some(42),
                ..valid_draft()
            },
        ),
    ];

    for (expected, draft) in cases {
        match check(&draft, measured(10, 10)) {
            ValidationResult::Invalid(invalid) if expected != ReasonCode::PositionMissing => {
                assert_eq!(invalid.reason, expected, "draft {draft:?}");
                assert_eq!(invalid.message, expected.default_message());
            }
            ValidationResult::Invalid(invalid) => {
                // Small photo outranks the missing position.
                assert_eq!(invalid.reason, ReasonCode::PhotoDimensions);
            }
            ValidationResult::Valid => panic!("expected {expected:?} for {draft:?}"),
        }
    }
}

#[test]
fn position_failure_reported_once_photo_is_large_enough() {
    init_logging();
    let draft = SubmissionDraft {
        position_id: None,
        ..valid_draft()
    };
    assert_eq!(
        check(&draft, measured(70, 70)).reason(),
        Some(ReasonCode::PositionMissing)
    );
}

#[test]
fn phone_needs_exactly_nine_digits_after_prefix() {
    init_logging();
    let short = SubmissionDraft {
        phone: "+38099123456".to_string(),
        ..valid_draft()
    };
    assert_eq!(
        check(&short, DimensionCheck::Skipped).reason(),
        Some(ReasonCode::PhoneFormat)
    );

    let exact = SubmissionDraft {
        phone: "+380991234567".to_string(),
        ..valid_draft()
    };
    assert_eq!(check(&exact, DimensionCheck::Skipped), ValidationResult::Valid);
}

#[test]
fn name_and_email_are_trimmed_and_bounded() {
    init_logging();
    let padded = SubmissionDraft {
        name: "  Jo  ".to_string(),
        email: " jo@example.com ".to_string(),
        ..valid_draft()
    };
    assert!(check(&padded, DimensionCheck::Skipped).is_valid());

    let long_name = SubmissionDraft {
        name: "x".repeat(61),
        ..valid_draft()
    };
    assert_eq!(
        check(&long_name, DimensionCheck::Skipped).reason(),
        Some(ReasonCode::NameLength)
    );

    let long_email = SubmissionDraft {
        email: format!("{}@example.com", "a".repeat(95)),
        ..valid_draft()
    };
    assert_eq!(
        check(&long_email, DimensionCheck::Skipped).reason(),
        Some(ReasonCode::EmailFormat)
    );
}

#[test]
fn undecodable_or_small_photo_fails_dimension_rule() {
    init_logging();
    assert_eq!(
        check(&valid_draft(), DimensionCheck::Undecodable).reason(),
        Some(ReasonCode::PhotoDimensions)
    );
    assert_eq!(
        check(&valid_draft(), measured(69, 300)).reason(),
        Some(ReasonCode::PhotoDimensions)
    );
}

#[test]
fn dimension_rule_can_be_disabled() {
    init_logging();
    let rules = ValidationRules {
        min_photo_dimensions: None,
    };
    let result = validate_draft(&valid_draft(), &positions(), &rules, measured(1, 1));
    assert!(result.is_valid());
    assert!(!needs_dimension_check(&result, &rules));
}

#[test]
fn dimension_check_only_needed_when_it_can_change_the_verdict() {
    init_logging();
    let rules = ValidationRules::default();
    assert!(needs_dimension_check(&ValidationResult::Valid, &rules));

    let position_missing = check(
        &SubmissionDraft {
            position_id: None,
            ..valid_draft()
        },
        DimensionCheck::Skipped,
    );
    assert!(needs_dimension_check(&position_missing, &rules));

    let bad_phone = check(
        &SubmissionDraft {
            phone: "0991234567".to_string(),
            photo: Some(photo()),
            ..valid_draft()
        },
        DimensionCheck::Skipped,
    );
    assert!(!needs_dimension_check(&bad_phone, &rules));
}

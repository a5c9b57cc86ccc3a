mod common;

use std::collections::BTreeMap;

use common::{fill_draft, init_logging, page, page_requests, started, valid_draft};
use pretty_assertions::assert_eq;
use roster_core::{
    update, AppState, DraftEdit, Effect, FetchError, FieldFailures, Invalid, Msg, NoticeKind,
    NoticeMessage, ReasonCode, Registration, RegistrationFailure, SubmissionError,
    SubmissionPhase, TokenError, ValidationResult, DEFAULT_NOTICE_TTL,
};

/// App started, positions and page 1 loaded, form filled with a valid draft.
fn ready() -> AppState {
    let (state, effects) = started(AppState::new());
    let request = page_requests(&effects)[0];
    let (state, _) = update(
        state,
        Msg::UsersPageLoaded {
            request,
            result: Ok(page(1..=6, 1, 3)),
        },
    );
    fill_draft(state, &valid_draft())
}

fn submit(state: AppState) -> (AppState, u64) {
    let (state, effects) = update(state, Msg::SubmitClicked);
    let attempt = match effects.as_slice() {
        [Effect::ValidateDraft { attempt, .. }] => *attempt,
        other => panic!("expected ValidateDraft, got {other:?}"),
    };
    (state, attempt)
}

fn validated(state: AppState, attempt: u64) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::ValidationFinished {
            attempt,
            result: ValidationResult::Valid,
        },
    )
}

#[test]
fn submit_snapshots_draft_and_positions() {
    init_logging();
    let state = ready();
    let (state, effects) = update(state, Msg::SubmitClicked);

    assert_eq!(state.pipeline().phase(), SubmissionPhase::Validating);
    match &effects[..] {
        [Effect::ValidateDraft {
            draft, positions, ..
        }] => {
            assert_eq!(draft, &valid_draft());
            assert_eq!(positions.len(), 4);
        }
        other => panic!("unexpected effects {other:?}"),
    }
}

#[test]
fn invalid_draft_fails_without_network_effects() {
    init_logging();
    let (state, attempt) = submit(ready());
    let invalid = Invalid::from(ReasonCode::PhoneFormat);
    let (state, effects) = update(
        state,
        Msg::ValidationFinished {
            attempt,
            result: ValidationResult::Invalid(invalid),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.pipeline().phase(), SubmissionPhase::Failed);
    assert_eq!(
        state.view().form_failure,
        Some(RegistrationFailure::Invalid(invalid))
    );
    // The draft is left intact for correction.
    assert_eq!(state.draft(), &valid_draft());
}

#[test]
fn valid_draft_registers_from_snapshot() {
    init_logging();
    let (state, attempt) = submit(ready());
    // Edits made while validating do not leak into this attempt.
    let (state, _) = update(
        state,
        Msg::DraftEdited(DraftEdit::Name("Someone Else".to_string())),
    );
    let (state, effects) = validated(state, attempt);

    assert_eq!(state.pipeline().phase(), SubmissionPhase::AcquiringToken);
    assert_eq!(
        effects,
        vec![Effect::Register {
            attempt,
            registration: Registration::from_draft(&valid_draft()).unwrap(),
        }]
    );
}

#[test]
fn token_failure_ends_attempt_without_upload() {
    init_logging();
    let (state, attempt) = submit(ready());
    let (state, _) = validated(state, attempt);
    let failure = RegistrationFailure::Token(TokenError(FetchError::HttpStatus {
        status: 500,
        message: None,
    }));
    let (state, effects) = update(
        state,
        Msg::RegistrationFinished {
            attempt,
            result: Err(failure.clone()),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.pipeline().phase(), SubmissionPhase::Failed);
    assert_eq!(state.pipeline().failure(), Some(&failure));
}

#[test]
fn service_rejection_is_kept_for_display() {
    init_logging();
    let (state, attempt) = submit(ready());
    let (state, _) = validated(state, attempt);
    let (state, _) = update(state, Msg::TokenAcquired { attempt });
    assert_eq!(state.pipeline().phase(), SubmissionPhase::Uploading);

    let mut fails = BTreeMap::new();
    fails.insert(
        "email".to_string(),
        vec!["The email must be a valid email address.".to_string()],
    );
    let failure = RegistrationFailure::Submission(SubmissionError::Rejected(FieldFailures(fails)));
    let (state, effects) = update(
        state,
        Msg::RegistrationFinished {
            attempt,
            result: Err(failure.clone()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().form_failure, Some(failure));
    assert_eq!(state.draft(), &valid_draft());
}

#[test]
fn success_discards_draft_notifies_and_reloads_from_page_one() {
    init_logging();
    let (state, attempt) = submit(ready());
    let (state, _) = validated(state, attempt);
    let (state, _) = update(state, Msg::TokenAcquired { attempt });
    let (state, effects) = update(
        state,
        Msg::RegistrationFinished {
            attempt,
            result: Ok(()),
        },
    );

    assert_eq!(state.pipeline().phase(), SubmissionPhase::Succeeded);
    assert_eq!(state.draft().name, "");
    assert_eq!(state.draft().photo, None);
    assert_eq!(state.draft().position_id, Some(1));

    let notice = state.view().notices[0].clone();
    assert_eq!(notice.kind, NoticeKind::Success);
    assert_eq!(notice.message, NoticeMessage::Registered);
    assert!(effects.contains(&Effect::DismissNoticeAfter {
        notice_id: notice.id,
        delay: DEFAULT_NOTICE_TTL,
    }));

    let requests = page_requests(&effects);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].page, 1);

    let (state, _) = update(
        state,
        Msg::UsersPageLoaded {
            request: requests[0],
            result: Ok(page(100..=105, 1, 4)),
        },
    );
    let view = state.view();
    assert_eq!(view.users[0].id, 100);
    assert_eq!(view.users.len(), 6);
    assert_eq!(view.page.map(|w| w.current_page()), Some(1));

    let (state, _) = update(
        state,
        Msg::NoticeExpired {
            notice_id: notice.id,
        },
    );
    assert!(state.view().notices.is_empty());
}

#[test]
fn submit_while_in_progress_is_ignored() {
    init_logging();
    let (state, attempt) = submit(ready());
    let (state, effects) = update(state, Msg::SubmitClicked);
    assert!(effects.is_empty());
    assert_eq!(state.pipeline().attempt(), attempt);

    let (state, _) = validated(state, attempt);
    let (_, effects) = update(state, Msg::SubmitClicked);
    assert!(effects.is_empty());
}

#[test]
fn retry_after_failure_starts_a_new_attempt_and_drops_stale_events() {
    init_logging();
    let (state, first) = submit(ready());
    let (state, _) = update(
        state,
        Msg::ValidationFinished {
            attempt: first,
            result: ValidationResult::Invalid(ReasonCode::NameLength.into()),
        },
    );
    let (state, second) = submit(state);
    assert!(second > first);

    // A late event for the first attempt changes nothing.
    let (state, effects) = validated(state, first);
    assert!(effects.is_empty());
    assert_eq!(state.pipeline().phase(), SubmissionPhase::Validating);

    let (state, effects) = validated(state, second);
    assert_eq!(effects.len(), 1);
    assert_eq!(state.pipeline().phase(), SubmissionPhase::AcquiringToken);
}

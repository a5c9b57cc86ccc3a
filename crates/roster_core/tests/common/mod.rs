#![allow(dead_code)]

use std::sync::Once;

use roster_core::{
    update, AppState, DraftEdit, Effect, Msg, PhotoFile, Position, SubmissionDraft, User,
    UsersPage,
};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(roster_logging::initialize_for_tests);
}

pub fn photo() -> PhotoFile {
    PhotoFile::new("me.jpg", "image/jpeg", b"\xFF\xD8fake-jpeg".to_vec())
}

pub fn positions() -> Vec<Position> {
    vec![
        Position::new(1, "Lawyer"),
        Position::new(2, "Content manager"),
        Position::new(3, "Security"),
        Position::new(4, "Designer"),
    ]
}

pub fn valid_draft() -> SubmissionDraft {
    SubmissionDraft {
        name: "Ana Souza".to_string(),
        email: "ana@example.com".to_string(),
        phone: "+380991234567".to_string(),
        position_id: Some(1),
        photo: Some(photo()),
    }
}

pub fn user(id: u64) -> User {
    User {
        id,
        name: format!("User {id}"),
        email: format!("user{id}@example.com"),
        phone: None,
        position: "Designer".to_string(),
        position_id: Some(4),
        registration_timestamp: Some(1_700_000_000 + id as i64),
        photo_url: None,
    }
}

pub fn page(ids: std::ops::RangeInclusive<u64>, page: u32, total_pages: u32) -> UsersPage {
    UsersPage {
        users: ids.map(user).collect(),
        page,
        total_pages,
    }
}

/// Feeds every field of `draft` into the form.
pub fn fill_draft(mut state: AppState, draft: &SubmissionDraft) -> AppState {
    let mut edits = vec![
        DraftEdit::Name(draft.name.clone()),
        DraftEdit::Email(draft.email.clone()),
        DraftEdit::Phone(draft.phone.clone()),
        DraftEdit::Photo(draft.photo.clone()),
    ];
    if let Some(id) = draft.position_id {
        edits.push(DraftEdit::Position(id));
    }
    for edit in edits {
        state = update(state, Msg::DraftEdited(edit)).0;
    }
    state
}

/// Starts the app and resolves positions; returns the first page request effect.
pub fn started(state: AppState) -> (AppState, Vec<Effect>) {
    let (state, effects) = update(state, Msg::Started);
    let (state, _) = update(state, Msg::PositionsLoaded(Ok(positions())));
    (state, effects)
}

pub fn page_requests(effects: &[Effect]) -> Vec<roster_core::PageRequest> {
    effects
        .iter()
        .filter_map(|effect| match effect {
            Effect::FetchUsersPage(request) => Some(*request),
            _ => None,
        })
        .collect()
}

use roster_logging::roster_warn;

use crate::{AppState, DraftEdit, Effect, Msg, NoticeKind, NoticeMessage};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => {
            let mut effects = vec![Effect::LoadPositions];
            effects.extend(state.list_mut().load_first_page().map(Effect::FetchUsersPage));
            state.mark_dirty();
            effects
        }
        Msg::PositionsLoaded(result) => {
            let warning = state.apply_positions(result);
            state.mark_dirty();
            match warning {
                Some(cause) => {
                    roster_warn!("Using built-in positions: {}", cause);
                    vec![notice(
                        &mut state,
                        NoticeKind::Warning,
                        NoticeMessage::PositionsFallback(cause),
                    )]
                }
                None => Vec::new(),
            }
        }
        Msg::DraftEdited(edit) => {
            apply_edit(&mut state, edit);
            Vec::new()
        }
        Msg::SubmitClicked => {
            let draft = state.draft().clone();
            match state.pipeline_mut().begin(draft.clone()) {
                Some(attempt) => {
                    state.mark_dirty();
                    vec![Effect::ValidateDraft {
                        attempt,
                        draft,
                        positions: state.positions().to_vec(),
                        rules: state.settings().validation,
                    }]
                }
                None => Vec::new(),
            }
        }
        Msg::ValidationFinished { attempt, result } => {
            match state.pipeline_mut().validated(attempt, result) {
                Some(registration) => {
                    state.mark_dirty();
                    vec![Effect::Register {
                        attempt,
                        registration,
                    }]
                }
                None => {
                    if state.pipeline().attempt() == attempt {
                        state.mark_dirty();
                    }
                    Vec::new()
                }
            }
        }
        Msg::TokenAcquired { attempt } => {
            if state.pipeline_mut().token_acquired(attempt) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::RegistrationFinished { attempt, result } => {
            match state.pipeline_mut().finish(attempt, result) {
                Some(true) => {
                    state.reset_draft();
                    state.mark_dirty();
                    let mut effects = vec![notice(
                        &mut state,
                        NoticeKind::Success,
                        NoticeMessage::Registered,
                    )];
                    effects.extend(state.list_mut().load_first_page().map(Effect::FetchUsersPage));
                    effects
                }
                Some(false) => {
                    state.mark_dirty();
                    Vec::new()
                }
                None => Vec::new(),
            }
        }
        Msg::ShowMoreClicked => match state.list_mut().load_next_page() {
            Some(request) => {
                state.mark_dirty();
                vec![Effect::FetchUsersPage(request)]
            }
            None => Vec::new(),
        },
        Msg::ReloadClicked => {
            state.mark_dirty();
            state
                .list_mut()
                .load_first_page()
                .map(Effect::FetchUsersPage)
                .into_iter()
                .collect()
        }
        Msg::UsersPageLoaded { request, result } => {
            let follow_up = state.list_mut().apply(request, result);
            state.mark_dirty();
            follow_up.map(Effect::FetchUsersPage).into_iter().collect()
        }
        Msg::NoticeExpired { notice_id } => {
            if state.dismiss_notice(notice_id) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}

fn apply_edit(state: &mut AppState, edit: DraftEdit) {
    match edit {
        DraftEdit::Name(name) => state.draft_mut().name = name,
        DraftEdit::Email(email) => state.draft_mut().email = email,
        DraftEdit::Phone(phone) => state.draft_mut().phone = phone,
        DraftEdit::Position(id) => {
            if !state.is_known_position(id) {
                roster_warn!("Ignoring selection of unknown position {}", id);
                return;
            }
            state.draft_mut().position_id = Some(id);
        }
        DraftEdit::Photo(photo) => state.draft_mut().photo = photo,
    }
    state.mark_dirty();
}

fn notice(state: &mut AppState, kind: NoticeKind, message: NoticeMessage) -> Effect {
    let notice_id = state.push_notice(kind, message);
    Effect::DismissNoticeAfter {
        notice_id,
        delay: state.settings().notice_ttl,
    }
}

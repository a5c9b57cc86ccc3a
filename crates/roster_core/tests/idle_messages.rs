use roster_core::{update, AppState, Msg};

#[test]
fn tick_leaves_state_untouched() {
    let state = AppState::new();
    let (mut next, effects) = update(state.clone(), Msg::Tick);

    assert_eq!(state, next);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}

#[test]
fn expiring_unknown_notice_changes_nothing() {
    let state = AppState::new();
    let (mut next, effects) = update(state.clone(), Msg::NoticeExpired { notice_id: 42 });

    assert_eq!(state, next);
    assert!(effects.is_empty());
    assert!(!next.consume_dirty());
}

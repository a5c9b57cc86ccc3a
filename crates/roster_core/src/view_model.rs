use crate::{
    ListError, Notice, PageWindow, Position, PositionId, PositionsSource, RegistrationFailure,
    SubmissionPhase, User, UserId,
};

/// Snapshot handed to the renderer after every state change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub positions: Vec<Position>,
    pub positions_source: PositionsSource,
    pub draft: DraftView,
    pub submission: SubmissionPhase,
    pub form_failure: Option<RegistrationFailure>,
    pub notices: Vec<Notice>,
    pub users: Vec<UserRowView>,
    pub page: Option<PageWindow>,
    pub show_more: bool,
    pub list_loading: bool,
    pub list_error: Option<ListError>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DraftView {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub position_id: Option<PositionId>,
    pub photo_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRowView {
    pub id: UserId,
    pub name: Option<String>,
    pub email: Option<String>,
    pub position: Option<String>,
    pub registered_at: Option<i64>,
    pub photo_url: Option<String>,
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

impl From<&User> for UserRowView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: non_empty(&user.name),
            email: non_empty(&user.email),
            position: non_empty(&user.position),
            registered_at: user.registration_timestamp.filter(|ts| *ts > 0),
            photo_url: user.photo_url.clone(),
        }
    }
}

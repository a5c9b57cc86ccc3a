use crate::{
    AttemptId, FetchError, NoticeId, PageRequest, PhotoFile, Position, PositionId,
    RegistrationFailure, UsersPage, ValidationResult,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Front end is up: load positions and the first page of users.
    Started,
    /// Engine finished reading positions.
    PositionsLoaded(Result<Vec<Position>, FetchError>),
    /// User edited one field of the registration form.
    DraftEdited(DraftEdit),
    /// User submitted the registration form.
    SubmitClicked,
    /// Validator verdict for a submission attempt.
    ValidationFinished {
        attempt: AttemptId,
        result: ValidationResult,
    },
    /// Engine obtained the registration token; the upload is under way.
    TokenAcquired { attempt: AttemptId },
    /// Engine completion for a submission attempt.
    RegistrationFinished {
        attempt: AttemptId,
        result: Result<(), RegistrationFailure>,
    },
    /// User clicked "show more".
    ShowMoreClicked,
    /// User asked for the list to be reloaded from page 1.
    ReloadClicked,
    /// Engine completion for a page request.
    UsersPageLoaded {
        request: PageRequest,
        result: Result<UsersPage, FetchError>,
    },
    /// A transient notice reached its display deadline.
    NoticeExpired { notice_id: NoticeId },
    /// Idle tick from the front end's poll loop; never changes state.
    Tick,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftEdit {
    Name(String),
    Email(String),
    Phone(String),
    Position(PositionId),
    Photo(Option<PhotoFile>),
}

//! Roster core: pure registration and listing state machines.
mod effect;
mod error;
mod fallback;
mod list;
mod msg;
mod pipeline;
mod state;
mod types;
mod update;
mod validator;
mod view_model;

pub use effect::Effect;
pub use error::{
    FetchError, FieldFailures, RegistrationFailure, SubmissionError, TokenError, TransportError,
    TransportKind,
};
pub use fallback::{builtin_positions, FallbackPolicy, PositionsOutcome, PositionsSource, UsersFallback};
pub use list::{ListAccumulator, ListError, PageRequest, DEFAULT_PAGE_SIZE};
pub use msg::{DraftEdit, Msg};
pub use pipeline::{SubmissionPhase, SubmissionPipeline};
pub use state::{
    AppState, CoreSettings, Notice, NoticeId, NoticeKind, NoticeMessage, DEFAULT_NOTICE_TTL,
};
pub use types::{
    AttemptId, Dimensions, Generation, PageWindow, PhotoFile, Position, PositionId, Registration,
    SubmissionDraft, User, UserId, UsersPage,
};
pub use update::update;
pub use validator::{
    is_valid_email, is_valid_phone, needs_dimension_check, validate_draft, DimensionCheck,
    Invalid, ReasonCode, ValidationResult, ValidationRules, PHOTO_MAX_BYTES,
};
pub use view_model::{AppViewModel, DraftView, UserRowView};

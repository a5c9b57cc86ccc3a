use std::time::Duration;

use crate::{
    AttemptId, NoticeId, PageRequest, Position, Registration, SubmissionDraft, ValidationRules,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    LoadPositions,
    FetchUsersPage(PageRequest),
    /// Run the validator (including the photo decode) against a snapshot.
    ValidateDraft {
        attempt: AttemptId,
        draft: SubmissionDraft,
        positions: Vec<Position>,
        rules: ValidationRules,
    },
    /// Acquire a token, then upload. The two steps always run in that order.
    Register {
        attempt: AttemptId,
        registration: Registration,
    },
    DismissNoticeAfter {
        notice_id: NoticeId,
        delay: Duration,
    },
}

use std::time::Duration;

use crate::fallback::{FallbackPolicy, PositionsOutcome, PositionsSource};
use crate::list::{ListAccumulator, DEFAULT_PAGE_SIZE};
use crate::pipeline::SubmissionPipeline;
use crate::view_model::{AppViewModel, DraftView, UserRowView};
use crate::{FetchError, Position, PositionId, SubmissionDraft, ValidationRules};

pub type NoticeId = u64;

pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreSettings {
    pub page_size: u32,
    pub validation: ValidationRules,
    /// How long success and warning notices stay visible.
    pub notice_ttl: Duration,
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            validation: ValidationRules::default(),
            notice_ttl: DEFAULT_NOTICE_TTL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoticeMessage {
    Registered,
    /// Positions were replaced by the built-in list; carries the cause.
    PositionsFallback(FetchError),
}

/// Transient, non-blocking message with an auto-dismiss deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: NoticeId,
    pub kind: NoticeKind,
    pub message: NoticeMessage,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    settings: CoreSettings,
    positions: Vec<Position>,
    positions_source: PositionsSource,
    draft: SubmissionDraft,
    pipeline: SubmissionPipeline,
    list: ListAccumulator,
    notices: Vec<Notice>,
    next_notice_id: NoticeId,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: CoreSettings) -> Self {
        Self {
            list: ListAccumulator::new(settings.page_size),
            settings,
            ..Self::default()
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            positions: self.positions.clone(),
            positions_source: self.positions_source,
            draft: DraftView {
                name: self.draft.name.clone(),
                email: self.draft.email.clone(),
                phone: self.draft.phone.clone(),
                position_id: self.draft.position_id,
                photo_name: self
                    .draft
                    .photo
                    .as_ref()
                    .map(|photo| photo.file_name.clone()),
            },
            submission: self.pipeline.phase(),
            form_failure: self.pipeline.failure().cloned(),
            notices: self.notices.clone(),
            users: self.list.users().iter().map(UserRowView::from).collect(),
            page: self.list.window(),
            show_more: self.list.has_more(),
            list_loading: self.list.is_loading(),
            list_error: self.list.error().cloned(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn settings(&self) -> &CoreSettings {
        &self.settings
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn draft(&self) -> &SubmissionDraft {
        &self.draft
    }

    pub fn pipeline(&self) -> &SubmissionPipeline {
        &self.pipeline
    }

    pub fn list(&self) -> &ListAccumulator {
        &self.list
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn draft_mut(&mut self) -> &mut SubmissionDraft {
        &mut self.draft
    }

    pub(crate) fn pipeline_mut(&mut self) -> &mut SubmissionPipeline {
        &mut self.pipeline
    }

    pub(crate) fn list_mut(&mut self) -> &mut ListAccumulator {
        &mut self.list
    }

    /// Stores resolved positions and returns the fallback cause, if any.
    pub(crate) fn apply_positions(
        &mut self,
        result: Result<Vec<Position>, FetchError>,
    ) -> Option<FetchError> {
        let PositionsOutcome {
            positions,
            source,
            warning,
        } = FallbackPolicy.positions(result);
        self.positions = positions;
        self.positions_source = source;
        let still_known = self
            .draft
            .position_id
            .is_some_and(|id| self.is_known_position(id));
        if !still_known {
            self.draft.position_id = self.default_position();
        }
        warning
    }

    pub(crate) fn is_known_position(&self, id: PositionId) -> bool {
        self.positions.iter().any(|position| position.id == id)
    }

    pub(crate) fn default_position(&self) -> Option<PositionId> {
        self.positions.first().map(|position| position.id)
    }

    /// Drops the draft after a successful registration.
    pub(crate) fn reset_draft(&mut self) {
        self.draft = SubmissionDraft {
            position_id: self.default_position(),
            ..SubmissionDraft::default()
        };
    }

    pub(crate) fn push_notice(&mut self, kind: NoticeKind, message: NoticeMessage) -> NoticeId {
        self.next_notice_id += 1;
        let id = self.next_notice_id;
        self.notices.push(Notice { id, kind, message });
        id
    }

    pub(crate) fn dismiss_notice(&mut self, id: NoticeId) -> bool {
        let before = self.notices.len();
        self.notices.retain(|notice| notice.id != id);
        self.notices.len() != before
    }
}

use roster_logging::{roster_debug, roster_info, roster_warn};

use crate::{
    AttemptId, ReasonCode, Registration, RegistrationFailure, SubmissionDraft, ValidationResult,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Validating,
    AcquiringToken,
    Uploading,
    Succeeded,
    Failed,
}

impl SubmissionPhase {
    pub fn is_busy(self) -> bool {
        matches!(
            self,
            SubmissionPhase::Validating | SubmissionPhase::AcquiringToken | SubmissionPhase::Uploading
        )
    }
}

/// Submission state machine. Every transition names the attempt it belongs
/// to; events for any other attempt, or arriving in the wrong phase, are
/// dropped.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmissionPipeline {
    phase: SubmissionPhase,
    attempt: AttemptId,
    /// Draft as it was when the run began; the upload is built from this.
    snapshot: Option<SubmissionDraft>,
    failure: Option<RegistrationFailure>,
}

impl SubmissionPipeline {
    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn attempt(&self) -> AttemptId {
        self.attempt
    }

    pub fn failure(&self) -> Option<&RegistrationFailure> {
        self.failure.as_ref()
    }

    /// `Idle | Succeeded | Failed -> Validating`. Returns the new attempt, or
    /// `None` while a run is in progress.
    pub fn begin(&mut self, draft: SubmissionDraft) -> Option<AttemptId> {
        if self.phase.is_busy() {
            roster_debug!(
                "Submit ignored: attempt {} is {:?}",
                self.attempt,
                self.phase
            );
            return None;
        }
        self.attempt += 1;
        self.phase = SubmissionPhase::Validating;
        self.snapshot = Some(draft);
        self.failure = None;
        Some(self.attempt)
    }

    /// `Validating -> AcquiringToken | Failed`. Returns the upload payload
    /// when the run should go on to the network.
    pub fn validated(
        &mut self,
        attempt: AttemptId,
        result: ValidationResult,
    ) -> Option<Registration> {
        if !self.expects(attempt, SubmissionPhase::Validating) {
            return None;
        }
        let snapshot = self.snapshot.take();
        let invalid = match result {
            ValidationResult::Valid => {
                match snapshot.as_ref().and_then(Registration::from_draft) {
                    Some(registration) => {
                        self.phase = SubmissionPhase::AcquiringToken;
                        return Some(registration);
                    }
                    None => ReasonCode::PositionMissing.into(),
                }
            }
            ValidationResult::Invalid(invalid) => invalid,
        };
        roster_info!("Attempt {} refused locally: {:?}", attempt, invalid.reason);
        self.fail(RegistrationFailure::Invalid(invalid));
        None
    }

    /// `AcquiringToken -> Uploading`.
    pub fn token_acquired(&mut self, attempt: AttemptId) -> bool {
        if !self.expects(attempt, SubmissionPhase::AcquiringToken) {
            return false;
        }
        self.phase = SubmissionPhase::Uploading;
        true
    }

    /// `AcquiringToken | Uploading -> Succeeded | Failed`. Returns
    /// `Some(true)` on success, `Some(false)` on failure and `None` when the
    /// event was dropped.
    pub fn finish(
        &mut self,
        attempt: AttemptId,
        result: Result<(), RegistrationFailure>,
    ) -> Option<bool> {
        if attempt != self.attempt
            || !matches!(
                self.phase,
                SubmissionPhase::AcquiringToken | SubmissionPhase::Uploading
            )
        {
            roster_debug!(
                "Dropping completion of attempt {} in phase {:?}",
                attempt,
                self.phase
            );
            return None;
        }
        match result {
            Ok(()) => {
                roster_info!("Attempt {} registered", attempt);
                self.phase = SubmissionPhase::Succeeded;
                self.failure = None;
                Some(true)
            }
            Err(failure) => {
                roster_warn!("Attempt {} failed: {}", attempt, failure);
                self.fail(failure);
                Some(false)
            }
        }
    }

    fn fail(&mut self, failure: RegistrationFailure) {
        self.phase = SubmissionPhase::Failed;
        self.failure = Some(failure);
    }

    fn expects(&self, attempt: AttemptId, phase: SubmissionPhase) -> bool {
        let matches = attempt == self.attempt && self.phase == phase;
        if !matches {
            roster_debug!(
                "Dropping event for attempt {} (current {} in {:?}, expected {:?})",
                attempt,
                self.attempt,
                self.phase,
                phase
            );
        }
        matches
    }
}

use std::sync::mpsc;

use roster_core::{
    AttemptId, FetchError, PageRequest, Position, RegistrationFailure, UsersPage,
    ValidationResult,
};

pub type TimerId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    PositionsLoaded(Result<Vec<Position>, FetchError>),
    UsersPageLoaded {
        request: PageRequest,
        result: Result<UsersPage, FetchError>,
    },
    ValidationFinished {
        attempt: AttemptId,
        result: ValidationResult,
    },
    TokenAcquired {
        attempt: AttemptId,
    },
    RegistrationFinished {
        attempt: AttemptId,
        result: Result<(), RegistrationFailure>,
    },
    TimerElapsed {
        timer_id: TimerId,
    },
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use roster_core::{AttemptId, PageRequest, Position, Registration, SubmissionDraft, ValidationRules};
use roster_logging::{roster_debug, roster_warn};
use tokio::sync::mpsc::{unbounded_channel, UnboundedSender};

use crate::register::register_user;
use crate::source::DataSource;
use crate::types::{ChannelProgressSink, EngineEvent, TimerId};
use crate::validate::validate;

enum EngineCommand {
    LoadPositions,
    FetchUsersPage(PageRequest),
    Validate {
        attempt: AttemptId,
        draft: SubmissionDraft,
        positions: Vec<Position>,
        rules: ValidationRules,
    },
    Register {
        attempt: AttemptId,
        registration: Registration,
    },
    StartTimer {
        timer_id: TimerId,
        delay: Duration,
    },
}

/// Runs data-source work on a dedicated thread with a single-threaded tokio
/// runtime. Commands go in through `cmd_tx`; every command answers with one
/// or more [`EngineEvent`]s on the event channel.
pub struct EngineHandle {
    cmd_tx: UnboundedSender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(source: Arc<dyn DataSource>) -> io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let (cmd_tx, mut cmd_rx) = unbounded_channel::<EngineCommand>();
        let (event_tx, event_rx) = mpsc::channel();

        thread::Builder::new()
            .name("roster-engine".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    while let Some(command) = cmd_rx.recv().await {
                        let source = source.clone();
                        let event_tx = event_tx.clone();
                        tokio::spawn(async move {
                            handle_command(source.as_ref(), command, event_tx).await;
                        });
                    }
                    roster_debug!("Engine command channel closed");
                });
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn load_positions(&self) {
        self.send(EngineCommand::LoadPositions);
    }

    pub fn fetch_users_page(&self, request: PageRequest) {
        self.send(EngineCommand::FetchUsersPage(request));
    }

    pub fn validate(
        &self,
        attempt: AttemptId,
        draft: SubmissionDraft,
        positions: Vec<Position>,
        rules: ValidationRules,
    ) {
        self.send(EngineCommand::Validate {
            attempt,
            draft,
            positions,
            rules,
        });
    }

    pub fn register(&self, attempt: AttemptId, registration: Registration) {
        self.send(EngineCommand::Register {
            attempt,
            registration,
        });
    }

    pub fn start_timer(&self, timer_id: TimerId, delay: Duration) {
        self.send(EngineCommand::StartTimer { timer_id, delay });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            roster_warn!("Engine thread is gone; command dropped");
        }
    }
}

async fn handle_command(
    source: &dyn DataSource,
    command: EngineCommand,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let event = match command {
        EngineCommand::LoadPositions => EngineEvent::PositionsLoaded(source.fetch_positions().await),
        EngineCommand::FetchUsersPage(request) => EngineEvent::UsersPageLoaded {
            request,
            result: source.fetch_users_page(request.page, request.count).await,
        },
        EngineCommand::Validate {
            attempt,
            draft,
            positions,
            rules,
        } => EngineEvent::ValidationFinished {
            attempt,
            result: validate(&draft, &positions, &rules).await,
        },
        EngineCommand::Register {
            attempt,
            registration,
        } => {
            let sink = ChannelProgressSink::new(event_tx.clone());
            EngineEvent::RegistrationFinished {
                attempt,
                result: register_user(source, attempt, &registration, &sink).await,
            }
        }
        EngineCommand::StartTimer { timer_id, delay } => {
            tokio::time::sleep(delay).await;
            EngineEvent::TimerElapsed { timer_id }
        }
    };
    let _ = event_tx.send(event);
}

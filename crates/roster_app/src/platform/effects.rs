use std::sync::Arc;

use roster_core::{Effect, Msg};
use roster_engine::{DataSource, EngineEvent, EngineHandle};
use roster_logging::{roster_debug, roster_info};

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(source: Arc<dyn DataSource>) -> std::io::Result<Self> {
        Ok(Self {
            engine: EngineHandle::new(source)?,
        })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::LoadPositions => self.engine.load_positions(),
                Effect::FetchUsersPage(request) => {
                    roster_debug!(
                        "FetchUsersPage generation={} page={} count={}",
                        request.generation,
                        request.page,
                        request.count
                    );
                    self.engine.fetch_users_page(request);
                }
                Effect::ValidateDraft {
                    attempt,
                    draft,
                    positions,
                    rules,
                } => self.engine.validate(attempt, draft, positions, rules),
                Effect::Register {
                    attempt,
                    registration,
                } => {
                    roster_info!("Register attempt={} position={}", attempt, registration.position_id);
                    self.engine.register(attempt, registration);
                }
                Effect::DismissNoticeAfter { notice_id, delay } => {
                    self.engine.start_timer(notice_id, delay);
                }
            }
        }
    }

    pub fn try_next_msg(&self) -> Option<Msg> {
        self.engine.try_recv().map(map_event)
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::PositionsLoaded(result) => Msg::PositionsLoaded(result),
        EngineEvent::UsersPageLoaded { request, result } => Msg::UsersPageLoaded { request, result },
        EngineEvent::ValidationFinished { attempt, result } => {
            Msg::ValidationFinished { attempt, result }
        }
        EngineEvent::TokenAcquired { attempt } => Msg::TokenAcquired { attempt },
        EngineEvent::RegistrationFinished { attempt, result } => {
            Msg::RegistrationFinished { attempt, result }
        }
        // Only notices arm timers, so timer ids are notice ids.
        EngineEvent::TimerElapsed { timer_id } => Msg::NoticeExpired { notice_id: timer_id },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::{FetchError, PageRequest};

    #[test]
    fn timers_expire_notices() {
        assert_eq!(
            map_event(EngineEvent::TimerElapsed { timer_id: 12 }),
            Msg::NoticeExpired { notice_id: 12 }
        );
    }

    #[test]
    fn page_results_keep_their_request() {
        let request = PageRequest {
            generation: 2,
            page: 3,
            count: 6,
        };
        let result = Err(FetchError::Malformed("missing users".to_owned()));
        assert_eq!(
            map_event(EngineEvent::UsersPageLoaded {
                request,
                result: result.clone()
            }),
            Msg::UsersPageLoaded { request, result }
        );
    }
}

use roster_core::{AttemptId, Registration, RegistrationFailure, TokenError};
use roster_logging::{roster_info, roster_warn};

use crate::source::{DataSource, RegistrationToken};
use crate::types::{EngineEvent, ProgressSink};

/// Obtains the single-use credential for one registration. No retries.
pub struct TokenBroker<'a> {
    source: &'a dyn DataSource,
}

impl<'a> TokenBroker<'a> {
    pub fn new(source: &'a dyn DataSource) -> Self {
        Self { source }
    }

    pub async fn acquire(&self) -> Result<RegistrationToken, TokenError> {
        self.source.fetch_token().await.map_err(|err| {
            roster_warn!("Registration token unavailable: {}", err);
            TokenError(err)
        })
    }
}

/// Acquires a token and uploads `registration` with it.
///
/// The token is requested only once the payload is ready and is handed
/// straight to the upload. `TokenAcquired` is emitted between the two steps.
pub async fn register_user(
    source: &dyn DataSource,
    attempt: AttemptId,
    registration: &Registration,
    sink: &dyn ProgressSink,
) -> Result<(), RegistrationFailure> {
    let token = TokenBroker::new(source).acquire().await?;
    sink.emit(EngineEvent::TokenAcquired { attempt });
    source.submit_user(token, registration).await?;
    roster_info!("Attempt {} accepted by the service", attempt);
    Ok(())
}

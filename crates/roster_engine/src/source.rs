use std::fmt;

use roster_core::{FetchError, Position, Registration, SubmissionError, UsersPage};

/// Single-use credential authorizing one user creation.
///
/// Not `Clone`: [`DataSource::submit_user`] consumes it, so a token cannot be
/// replayed across attempts.
pub struct RegistrationToken(String);

impl RegistrationToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for RegistrationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RegistrationToken(<redacted>)")
    }
}

/// Everything the engine needs from the backing service.
#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch_positions(&self) -> Result<Vec<Position>, FetchError>;

    async fn fetch_users_page(&self, page: u32, count: u32) -> Result<UsersPage, FetchError>;

    async fn fetch_token(&self) -> Result<RegistrationToken, FetchError>;

    async fn submit_user(
        &self,
        token: RegistrationToken,
        registration: &Registration,
    ) -> Result<(), SubmissionError>;
}

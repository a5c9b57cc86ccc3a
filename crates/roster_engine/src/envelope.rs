//! Response bodies of the registration service and their mapping onto
//! domain results.

use std::collections::BTreeMap;

use roster_core::{FetchError, FieldFailures, Position, SubmissionError, User, UsersPage};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct PositionsEnvelope {
    success: Option<bool>,
    positions: Option<Vec<Position>>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UsersEnvelope {
    success: Option<bool>,
    users: Option<Vec<User>>,
    page: Option<u32>,
    total_pages: Option<u32>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenEnvelope {
    success: Option<bool>,
    token: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SubmitEnvelope {
    success: Option<bool>,
    message: Option<String>,
    fails: Option<BTreeMap<String, OneOrMany>>,
}

/// Service messages for a field arrive as an array, occasionally as a string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(message) => vec![message],
            OneOrMany::Many(messages) => messages,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessageOnly {
    message: Option<String>,
}

fn parse<'a, T: Deserialize<'a>>(body: &'a [u8]) -> Result<T, FetchError> {
    serde_json::from_slice(body).map_err(|err| FetchError::Malformed(err.to_string()))
}

/// Best-effort `message` of an error body.
fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<MessageOnly>(body)
        .ok()
        .and_then(|parsed| parsed.message)
}

fn check_status(status: u16, body: &[u8]) -> Result<(), FetchError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(FetchError::HttpStatus {
            status,
            message: error_message(body),
        })
    }
}

fn check_success(success: Option<bool>, message: Option<String>) -> Result<(), FetchError> {
    match success {
        Some(true) => Ok(()),
        Some(false) => Err(FetchError::Unsuccessful { message }),
        None => Err(FetchError::Malformed("missing success flag".to_owned())),
    }
}

pub(crate) fn positions(status: u16, body: &[u8]) -> Result<Vec<Position>, FetchError> {
    check_status(status, body)?;
    let envelope: PositionsEnvelope = parse(body)?;
    check_success(envelope.success, envelope.message)?;
    envelope
        .positions
        .ok_or_else(|| FetchError::Malformed("missing positions".to_owned()))
}

pub(crate) fn users_page(
    status: u16,
    body: &[u8],
    requested_page: u32,
) -> Result<UsersPage, FetchError> {
    check_status(status, body)?;
    let envelope: UsersEnvelope = parse(body)?;
    check_success(envelope.success, envelope.message)?;
    let users = envelope
        .users
        .ok_or_else(|| FetchError::Malformed("missing users".to_owned()))?;
    let total_pages = envelope
        .total_pages
        .ok_or_else(|| FetchError::Malformed("missing total_pages".to_owned()))?;
    Ok(UsersPage {
        users,
        page: envelope.page.unwrap_or(requested_page),
        total_pages,
    })
}

pub(crate) fn token(status: u16, body: &[u8]) -> Result<String, FetchError> {
    check_status(status, body)?;
    let envelope: TokenEnvelope = parse(body)?;
    check_success(envelope.success, envelope.message)?;
    envelope
        .token
        .filter(|token| !token.trim().is_empty())
        .ok_or_else(|| FetchError::Malformed("missing token".to_owned()))
}

pub(crate) fn submission(status: u16, body: &[u8]) -> Result<(), SubmissionError> {
    let envelope = serde_json::from_slice::<SubmitEnvelope>(body).ok();
    let success_status = (200..300).contains(&status);
    let Some(envelope) = envelope else {
        return Err(SubmissionError::Service {
            status: Some(status),
            message: None,
        });
    };

    if !success_status {
        let failures = FieldFailures(
            envelope
                .fails
                .unwrap_or_default()
                .into_iter()
                .map(|(field, messages)| (field, messages.into_vec()))
                .collect(),
        );
        if !failures.is_empty() {
            return Err(SubmissionError::Rejected(failures));
        }
        return Err(SubmissionError::Service {
            status: Some(status),
            message: envelope.message,
        });
    }

    if envelope.success == Some(true) {
        Ok(())
    } else {
        Err(SubmissionError::Service {
            status: Some(status),
            message: envelope.message,
        })
    }
}

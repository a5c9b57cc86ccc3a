use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

pub type UserId = u64;
pub type PositionId = u32;
/// Tag of a list load; bumped on every full reload.
pub type Generation = u64;
/// Sequence number of a submission run.
pub type AttemptId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub id: PositionId,
    pub name: String,
}

impl Position {
    pub fn new(id: PositionId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Read projection of a registered user as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "lenient::id")]
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub position: String,
    #[serde(default, deserialize_with = "lenient::optional_id")]
    pub position_id: Option<PositionId>,
    #[serde(default)]
    pub registration_timestamp: Option<i64>,
    #[serde(default, rename = "photo")]
    pub photo_url: Option<String>,
}

/// One page of users as delivered by a data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsersPage {
    pub users: Vec<User>,
    pub page: u32,
    pub total_pages: u32,
}

/// Pagination cursor. `1 <= current_page <= total_pages` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    current_page: u32,
    total_pages: u32,
}

impl PageWindow {
    /// Builds a window for a loaded page, clamping a short or zero
    /// `total_pages` up to the page that was actually served.
    pub fn new(current_page: u32, total_pages: u32) -> Self {
        let current_page = current_page.max(1);
        Self {
            current_page,
            total_pages: total_pages.max(current_page),
        }
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn covers(&self, minimum: Dimensions) -> bool {
        self.width >= minimum.width && self.height >= minimum.height
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A file picked for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct PhotoFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl PhotoFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

impl fmt::Debug for PhotoFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhotoFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.bytes.len())
            .finish()
    }
}

/// Form contents for one submission attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SubmissionDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub position_id: Option<PositionId>,
    pub photo: Option<PhotoFile>,
}

/// Payload of a validated draft, ready for the multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub position_id: PositionId,
    pub photo: PhotoFile,
}

impl Registration {
    /// Builds the payload from a draft, trimming text fields. Returns `None`
    /// when the draft lacks a position or a photo.
    pub fn from_draft(draft: &SubmissionDraft) -> Option<Self> {
        Some(Self {
            name: draft.name.trim().to_owned(),
            email: draft.email.trim().to_owned(),
            phone: draft.phone.trim().to_owned(),
            position_id: draft.position_id?,
            photo: draft.photo.clone()?,
        })
    }
}

/// Older service builds report ids as numeric strings.
mod lenient {
    use serde::{de, Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(u64),
        Text(String),
    }

    fn parse<E: de::Error>(raw: NumberOrText) -> Result<u64, E> {
        match raw {
            NumberOrText::Number(value) => Ok(value),
            NumberOrText::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("expected numeric id, got {text:?}"))),
        }
    }

    pub(super) fn id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        parse(NumberOrText::deserialize(deserializer)?)
    }

    pub(super) fn optional_id<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u32>, D::Error> {
        match Option::<NumberOrText>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) => {
                let value = parse::<D::Error>(raw)?;
                u32::try_from(value)
                    .map(Some)
                    .map_err(|_| de::Error::custom(format!("position id {value} out of range")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_accepts_string_ids_and_missing_fields() {
        let user: User = serde_json::from_str(
            r#"{"id":"30","position_id":"4","position":"Designer","registration_timestamp":1537777441}"#,
        )
        .unwrap();
        assert_eq!(user.id, 30);
        assert_eq!(user.position_id, Some(4));
        assert_eq!(user.name, "");
        assert_eq!(user.photo_url, None);
    }

    #[test]
    fn page_window_clamps_total_to_current() {
        let window = PageWindow::new(2, 1);
        assert_eq!(window.current_page(), 2);
        assert_eq!(window.total_pages(), 2);
        assert!(!window.has_more());

        let empty = PageWindow::new(1, 0);
        assert_eq!(empty.total_pages(), 1);
    }
}

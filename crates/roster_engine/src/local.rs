//! File-backed [`DataSource`] for running without the remote service.
//!
//! The store mimics the service contract closely enough for the engine not
//! to notice: tokens are single-use, duplicates are refused, pages are served
//! newest first and out-of-range pages answer 404.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use roster_core::{
    builtin_positions, FetchError, FieldFailures, Position, Registration, SubmissionError, User,
    UsersPage,
};
use roster_logging::{roster_error, roster_info, roster_warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;

use crate::persist::{ensure_store_dir, AtomicFileWriter, PersistError};
use crate::source::{DataSource, RegistrationToken};

pub const STORE_FILENAME: &str = "roster_store.ron";
const PHOTO_DIR: &str = "photos";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreFile {
    positions: Vec<Position>,
    users: Vec<User>,
    next_user_id: u64,
    token_sequence: u64,
    issued_tokens: Vec<String>,
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            positions: builtin_positions(),
            users: Vec::new(),
            next_user_id: 1,
            token_sequence: 0,
            issued_tokens: Vec::new(),
        }
    }
}

pub struct LocalSource {
    writer: AtomicFileWriter,
    photos: AtomicFileWriter,
    store: Mutex<StoreFile>,
}

impl LocalSource {
    /// Opens the store in `dir`, creating an empty one when none exists.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let dir = dir.into();
        ensure_store_dir(&dir)?;
        let store = load_store(&dir)?;
        roster_info!(
            "Opened local store {:?} ({} users)",
            dir,
            store.users.len()
        );
        Ok(Self {
            photos: AtomicFileWriter::new(dir.join(PHOTO_DIR)),
            writer: AtomicFileWriter::new(dir),
            store: Mutex::new(store),
        })
    }

    pub fn dir(&self) -> &Path {
        self.writer.dir()
    }

    fn save(&self, store: &StoreFile) -> Result<(), PersistError> {
        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(store, pretty)
            .map_err(|err| PersistError::Encode(err.to_string()))?;
        self.writer.write(STORE_FILENAME, content)?;
        Ok(())
    }

    /// Persists `next` and only then makes it the live store.
    fn commit(&self, store: &mut StoreFile, next: StoreFile) -> Result<(), PersistError> {
        self.save(&next)?;
        *store = next;
        Ok(())
    }

    /// Records a spent token on a rejected submission.
    fn commit_rejection(&self, store: &mut StoreFile, next: StoreFile) {
        if let Err(err) = self.commit(store, next) {
            roster_error!("Failed to record spent token in local store: {}", err);
        }
    }
}

fn load_store(dir: &Path) -> Result<StoreFile, PersistError> {
    let path = dir.join(STORE_FILENAME);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(StoreFile::default());
        }
        Err(err) => return Err(PersistError::Io(err)),
    };
    ron::from_str(&content).map_err(|err| PersistError::Corrupt {
        path,
        message: err.to_string(),
    })
}

fn storage_error(err: PersistError) -> FetchError {
    FetchError::Storage(err.to_string())
}

fn mint_token(sequence: u64, salt: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(sequence.to_be_bytes());
    hasher.update(Utc::now().timestamp_nanos_opt().unwrap_or_default().to_be_bytes());
    hasher.update(salt.to_string_lossy().as_bytes());
    hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect()
}

fn service_error(status: u16, message: &str) -> SubmissionError {
    SubmissionError::Service {
        status: Some(status),
        message: Some(message.to_owned()),
    }
}

#[async_trait::async_trait]
impl DataSource for LocalSource {
    async fn fetch_positions(&self) -> Result<Vec<Position>, FetchError> {
        Ok(self.store.lock().await.positions.clone())
    }

    async fn fetch_users_page(&self, page: u32, count: u32) -> Result<UsersPage, FetchError> {
        if page == 0 || count == 0 {
            return Err(FetchError::HttpStatus {
                status: 422,
                message: Some("Validation failed".to_owned()),
            });
        }
        let store = self.store.lock().await;
        let total = store.users.len();
        let per_page = count as usize;
        let total_pages = u32::try_from(total.div_ceil(per_page)).unwrap_or(u32::MAX);
        if page > total_pages.max(1) {
            return Err(FetchError::HttpStatus {
                status: 404,
                message: Some("Page not found".to_owned()),
            });
        }
        let skip = (page as usize - 1) * per_page;
        let users = store
            .users
            .iter()
            .rev()
            .skip(skip)
            .take(per_page)
            .cloned()
            .collect();
        Ok(UsersPage {
            users,
            page,
            total_pages,
        })
    }

    async fn fetch_token(&self) -> Result<RegistrationToken, FetchError> {
        let mut store = self.store.lock().await;
        let mut next = store.clone();
        next.token_sequence += 1;
        let token = mint_token(next.token_sequence, self.dir());
        next.issued_tokens.push(token.clone());
        self.commit(&mut store, next).map_err(storage_error)?;
        Ok(RegistrationToken::new(token))
    }

    async fn submit_user(
        &self,
        token: RegistrationToken,
        registration: &Registration,
    ) -> Result<(), SubmissionError> {
        let mut store = self.store.lock().await;
        let Some(index) = store
            .issued_tokens
            .iter()
            .position(|issued| issued == token.as_str())
        else {
            roster_warn!("Local store refused an unknown or spent token");
            return Err(service_error(401, "The token expired."));
        };
        let mut next = store.clone();
        next.issued_tokens.swap_remove(index);

        let Some(position) = next
            .positions
            .iter()
            .find(|position| position.id == registration.position_id)
            .cloned()
        else {
            self.commit_rejection(&mut store, next);
            let mut fails = BTreeMap::new();
            fails.insert(
                "position_id".to_owned(),
                vec!["The selected position id is invalid.".to_owned()],
            );
            return Err(SubmissionError::Rejected(FieldFailures(fails)));
        };

        let duplicate = next.users.iter().any(|user| {
            user.email.eq_ignore_ascii_case(&registration.email)
                || user.phone.as_deref() == Some(registration.phone.as_str())
        });
        if duplicate {
            self.commit_rejection(&mut store, next);
            return Err(service_error(
                409,
                "User with this phone or email already exist",
            ));
        }

        let id = next.next_user_id;
        let photo_name = format!("{id}.jpg");
        let photo_path = self
            .photos
            .write(&photo_name, &registration.photo.bytes)
            .map_err(|err| service_error(500, &err.to_string()))?;
        next.next_user_id += 1;
        next.users.push(User {
            id,
            name: registration.name.clone(),
            email: registration.email.clone(),
            phone: Some(registration.phone.clone()),
            position: position.name,
            position_id: Some(position.id),
            registration_timestamp: Some(Utc::now().timestamp()),
            photo_url: Some(photo_path.to_string_lossy().into_owned()),
        });
        if let Err(err) = self.commit(&mut store, next) {
            roster_error!("Local store not saved, user {} discarded: {}", id, err);
            if let Err(cleanup) = self.photos.remove(&photo_name) {
                roster_warn!("Orphaned photo {:?} left behind: {}", photo_path, cleanup);
            }
            return Err(service_error(500, &err.to_string()));
        }
        roster_info!("Local store registered user {}", id);
        Ok(())
    }
}

//! Roster engine: data sources and effect execution.
mod engine;
mod envelope;
mod http;
mod local;
mod persist;
mod photo;
mod register;
mod source;
mod types;
mod validate;

pub use engine::EngineHandle;
pub use http::{HttpSettings, HttpSource, SetupError, DEFAULT_BASE_URL};
pub use local::{LocalSource, STORE_FILENAME};
pub use persist::{ensure_store_dir, AtomicFileWriter, PersistError};
pub use photo::{jpeg_dimensions, read_photo_dimensions, PhotoError};
pub use register::{register_user, TokenBroker};
pub use source::{DataSource, RegistrationToken};
pub use types::{ChannelProgressSink, EngineEvent, ProgressSink, TimerId};
pub use validate::validate;

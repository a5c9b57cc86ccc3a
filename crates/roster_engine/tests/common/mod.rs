#![allow(dead_code)]

use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

use roster_core::{PhotoFile, Position, Registration, SubmissionDraft};
use roster_engine::{EngineEvent, HttpSettings, HttpSource, ProgressSink};

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(roster_logging::initialize_for_tests);
}

#[derive(Default)]
pub struct TestSink {
    events: Arc<Mutex<Vec<EngineEvent>>>,
}

impl TestSink {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn take(&self) -> Vec<EngineEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: EngineEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub fn http_source(base_url: &str) -> HttpSource {
    HttpSource::new(HttpSettings {
        base_url: base_url.to_string(),
        request_timeout: Duration::from_secs(5),
        ..HttpSettings::default()
    })
    .expect("http source")
}

/// SOI, a JFIF APP0 segment, a baseline frame header and EOI.
pub fn jpeg_header(width: u16, height: u16) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8];
    bytes.extend_from_slice(&[
        0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00, 0x01, 0x01, 0x00, 0x00, 0x01, 0x00,
        0x01, 0x00, 0x00,
    ]);
    bytes.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08]);
    bytes.extend_from_slice(&height.to_be_bytes());
    bytes.extend_from_slice(&width.to_be_bytes());
    bytes.extend_from_slice(&[0x03, 0x01, 0x22, 0x00, 0x02, 0x11, 0x01, 0x03, 0x11, 0x01]);
    bytes.extend_from_slice(&[0xFF, 0xD9]);
    bytes
}

pub fn positions() -> Vec<Position> {
    vec![Position::new(1, "Lawyer"), Position::new(4, "Designer")]
}

pub fn draft_with_photo(bytes: Vec<u8>) -> SubmissionDraft {
    SubmissionDraft {
        name: "Ana Souza".to_string(),
        email: "ana@example.com".to_string(),
        phone: "+380991234567".to_string(),
        position_id: Some(4),
        photo: Some(PhotoFile::new("me.jpg", "image/jpeg", bytes)),
    }
}

pub fn registration() -> Registration {
    Registration {
        name: "Ana Souza".to_string(),
        email: "ana@example.com".to_string(),
        phone: "+380991234567".to_string(),
        position_id: 4,
        photo: PhotoFile::new("me.jpg", "image/jpeg", b"jpeg-bytes".to_vec()),
    }
}

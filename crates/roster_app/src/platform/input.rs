//! Line commands typed on stdin.

use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use roster_core::{DraftEdit, Msg, PhotoFile};
use roster_logging::{roster_debug, roster_warn};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Msg(Msg),
    LoadPhoto(PathBuf),
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("comando desconhecido: {0}")]
    Unknown(String),
    #[error("uso: {0}")]
    Usage(&'static str),
}

/// What the input thread hands to the app loop.
#[derive(Debug)]
pub enum Input {
    Msg(Msg),
    Help,
    Problem(String),
    Quit,
}

pub fn parse_line(line: &str) -> Result<Option<Command>, InputError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let edit = |edit: DraftEdit| Ok(Some(Command::Msg(Msg::DraftEdited(edit))));

    match word.to_ascii_lowercase().as_str() {
        "name" => edit(DraftEdit::Name(rest.to_owned())),
        "email" => edit(DraftEdit::Email(rest.to_owned())),
        "phone" => edit(DraftEdit::Phone(rest.to_owned())),
        "position" => rest
            .parse()
            .map(|id| Some(Command::Msg(Msg::DraftEdited(DraftEdit::Position(id)))))
            .map_err(|_| InputError::Usage("position <id>")),
        "photo" if rest.is_empty() => edit(DraftEdit::Photo(None)),
        "photo" => Ok(Some(Command::LoadPhoto(PathBuf::from(rest)))),
        "submit" => Ok(Some(Command::Msg(Msg::SubmitClicked))),
        "more" => Ok(Some(Command::Msg(Msg::ShowMoreClicked))),
        "reload" => Ok(Some(Command::Msg(Msg::ReloadClicked))),
        "help" | "?" => Ok(Some(Command::Help)),
        "quit" | "exit" => Ok(Some(Command::Quit)),
        other => Err(InputError::Unknown(other.to_owned())),
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

pub fn load_photo(path: &Path) -> io::Result<PhotoFile> {
    let bytes = fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_owned());
    roster_debug!("Loaded photo {:?} ({} bytes)", path, bytes.len());
    Ok(PhotoFile::new(file_name, content_type_for(path), bytes))
}

fn resolve(command: Command) -> Input {
    match command {
        Command::Msg(msg) => Input::Msg(msg),
        Command::LoadPhoto(path) => match load_photo(&path) {
            Ok(photo) => Input::Msg(Msg::DraftEdited(DraftEdit::Photo(Some(photo)))),
            Err(err) => {
                roster_warn!("Could not read photo {:?}: {}", path, err);
                Input::Problem(format!("não foi possível ler {}: {err}", path.display()))
            }
        },
        Command::Help => Input::Help,
        Command::Quit => Input::Quit,
    }
}

/// Reads stdin on its own thread until EOF or `quit`.
pub fn spawn_reader(tx: mpsc::Sender<Input>) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("roster-input".to_string())
        .spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let input = match line {
                    Ok(line) => match parse_line(&line) {
                        Ok(Some(command)) => resolve(command),
                        Ok(None) => continue,
                        Err(err) => Input::Problem(err.to_string()),
                    },
                    Err(err) => {
                        roster_warn!("stdin read failed: {}", err);
                        Input::Quit
                    }
                };
                let quit = matches!(input, Input::Quit);
                if tx.send(input).is_err() || quit {
                    return;
                }
            }
            let _ = tx.send(Input::Quit);
        })
}

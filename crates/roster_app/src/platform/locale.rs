//! Brazilian Portuguese texts shown to the user.

use chrono::{DateTime, Local, TimeZone};
use roster_core::{
    FetchError, ListError, NoticeMessage, ReasonCode, RegistrationFailure, SubmissionError,
    SubmissionPhase, TransportKind,
};

pub const NAME_MISSING: &str = "Nome não informado";
pub const EMAIL_MISSING: &str = "Email não informado";

const CONNECTION_FAILED: &str = "Erro de conexão. Verifique sua internet e tente novamente.";
const TIMED_OUT: &str = "Tempo limite excedido. Tente novamente em alguns instantes.";
const TOKEN_FAILED: &str = "Erro ao obter token de registro";
const REGISTRATION_FAILED: &str = "Erro ao registrar usuário. Verifique os dados e tente novamente.";
const USERS_FAILED: &str = "Erro ao carregar lista de usuários. Tente recarregar a página.";
const MORE_USERS_FAILED: &str = "Erro ao carregar mais usuários. Tente novamente.";

pub fn reason_message(reason: ReasonCode) -> &'static str {
    match reason {
        ReasonCode::NameLength => "Nome deve ter entre 2 e 60 caracteres.",
        ReasonCode::EmailFormat => "Email inválido ou muito longo (máximo 100 caracteres).",
        ReasonCode::PhoneFormat => "Telefone deve estar no formato +380XXXXXXXXX.",
        ReasonCode::PhotoMissing => "Foto é obrigatória.",
        ReasonCode::PhotoTooLarge => "Foto deve ter no máximo 5MB.",
        ReasonCode::PhotoType => "Foto deve ser no formato JPG/JPEG.",
        ReasonCode::PhotoDimensions => "Foto deve ter no mínimo 70x70 pixels.",
        ReasonCode::PositionMissing => "Selecione uma posição.",
    }
}

pub fn transport_message(kind: TransportKind) -> &'static str {
    match kind {
        TransportKind::Connectivity => CONNECTION_FAILED,
        TransportKind::Timeout => TIMED_OUT,
    }
}

pub fn failure_message(failure: &RegistrationFailure) -> String {
    if let Some(kind) = failure.transport_kind() {
        return transport_message(kind).to_string();
    }
    match failure {
        RegistrationFailure::Invalid(invalid) => reason_message(invalid.reason).to_string(),
        RegistrationFailure::Token(_) => TOKEN_FAILED.to_string(),
        RegistrationFailure::Submission(SubmissionError::Rejected(failures))
            if !failures.is_empty() =>
        {
            failures.joined()
        }
        RegistrationFailure::Submission(_) => REGISTRATION_FAILED.to_string(),
    }
}

fn fetch_message(error: &FetchError, fallback: &'static str) -> &'static str {
    error.transport_kind().map_or(fallback, transport_message)
}

pub fn list_error_message(error: &ListError) -> &'static str {
    match error {
        ListError::Blocking(cause) => fetch_message(cause, USERS_FAILED),
        ListError::LoadMore(cause) => fetch_message(cause, MORE_USERS_FAILED),
    }
}

pub fn notice_message(message: &NoticeMessage) -> &'static str {
    match message {
        NoticeMessage::Registered => "Usuário registrado com sucesso!",
        NoticeMessage::PositionsFallback(_) => {
            "Aviso: Usando posições padrão devido a falha na conexão com a API."
        }
    }
}

pub fn phase_label(phase: SubmissionPhase) -> Option<&'static str> {
    match phase {
        SubmissionPhase::Idle | SubmissionPhase::Succeeded | SubmissionPhase::Failed => None,
        SubmissionPhase::Validating => Some("Validando..."),
        SubmissionPhase::AcquiringToken => Some("Obtendo token..."),
        SubmissionPhase::Uploading => Some("Enviando..."),
    }
}

/// `dd/mm/aaaa` in the local time zone.
pub fn registration_date(timestamp: i64) -> Option<String> {
    date_in(&Local, timestamp)
}

fn date_in<Tz: TimeZone>(zone: &Tz, timestamp: i64) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    let utc = DateTime::from_timestamp(timestamp, 0)?;
    Some(utc.with_timezone(zone).format("%d/%m/%Y").to_string())
}

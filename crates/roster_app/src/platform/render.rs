use std::fmt::Write;

use roster_core::{AppViewModel, NoticeKind, PositionsSource, UserRowView};

use super::locale;

pub const HELP: &str = "\
Comandos:
  name <texto>      email <texto>      phone <+380XXXXXXXXX>
  position <id>     photo <arquivo>    photo (remove a foto)
  submit            more               reload
  help              quit";

/// Full text frame for the current view.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();
    out.push_str("==== Cadastro ====\n");
    render_notices(&mut out, view);
    render_form(&mut out, view);
    out.push_str("\n==== Usuários ====\n");
    render_users(&mut out, view);
    out
}

fn render_notices(out: &mut String, view: &AppViewModel) {
    for notice in &view.notices {
        let marker = match notice.kind {
            NoticeKind::Success => "[ok]",
            NoticeKind::Warning => "[!]",
        };
        let _ = writeln!(out, "{marker} {}", locale::notice_message(&notice.message));
    }
}

fn render_form(out: &mut String, view: &AppViewModel) {
    let draft = &view.draft;
    let _ = writeln!(out, "Nome:     {}", draft.name);
    let _ = writeln!(out, "Email:    {}", draft.email);
    let _ = writeln!(out, "Telefone: {}", draft.phone);
    let _ = writeln!(
        out,
        "Foto:     {}",
        draft.photo_name.as_deref().unwrap_or("-")
    );

    let source = match view.positions_source {
        PositionsSource::NotLoaded => " (carregando)",
        PositionsSource::Remote => "",
        PositionsSource::BuiltIn => " (padrão)",
    };
    let _ = writeln!(out, "Posições{source}:");
    for position in &view.positions {
        let selected = if draft.position_id == Some(position.id) {
            "(x)"
        } else {
            "( )"
        };
        let _ = writeln!(out, "  {selected} {} {}", position.id, position.name);
    }

    if let Some(label) = locale::phase_label(view.submission) {
        let _ = writeln!(out, "{label}");
    }
    if let Some(failure) = &view.form_failure {
        let _ = writeln!(out, "Erro: {}", locale::failure_message(failure));
    }
}

fn render_users(out: &mut String, view: &AppViewModel) {
    if let Some(error) = &view.list_error {
        let _ = writeln!(out, "Erro: {}", locale::list_error_message(error));
    }
    for user in &view.users {
        let _ = writeln!(out, "{}", user_line(user));
    }
    if view.list_loading {
        out.push_str("Carregando...\n");
    } else if view.show_more {
        out.push_str("[more] Mostrar mais\n");
    }
    if let Some(page) = view.page {
        let _ = writeln!(
            out,
            "Página {} de {}",
            page.current_page(),
            page.total_pages()
        );
    }
}

fn user_line(user: &UserRowView) -> String {
    let mut line = format!(
        "#{} {} <{}>",
        user.id,
        user.name.as_deref().unwrap_or(locale::NAME_MISSING),
        user.email.as_deref().unwrap_or(locale::EMAIL_MISSING)
    );
    if let Some(position) = &user.position {
        let _ = write!(line, " | {position}");
    }
    if let Some(date) = user.registered_at.and_then(locale::registration_date) {
        let _ = write!(line, " | {date}");
    }
    line
}

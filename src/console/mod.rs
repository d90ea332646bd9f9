//! Line-oriented console front end for the `roster` binary.
//!
//! Each input line is parsed into a [`Command`], applied to the session, and
//! the resulting [`RosterView`] is rendered as plain text.

use std::fmt::Write;

use crate::errors::ClientError;
use crate::models::{JobFunction, MemberId, Role};
use crate::session::{ModalView, RosterSession, RosterView};

pub const HELP: &str = "\
commands:
  search <text>          set the search text (empty clears it)
  function <value|all>   filter by function
  role <value|all>       filter by role
  add                    open the add member form
  menu <row>             toggle the action menu of a row
  outside                click outside the open menu
  edit | delete          row menu actions
  name <text>            set the form's full name
  email <text>           set the form's email
  set-function <value>   set the form's function
  set-role <value>       set the form's role
  submit                 submit the open form
  confirm                confirm the delete
  cancel                 close the open modal
  ack | retry            acknowledge the error (retry also refetches)
  close-toast            hide the notification
  show | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Search(String),
    FunctionFilter(Option<JobFunction>),
    RoleFilter(Option<Role>),
    Add,
    Menu(usize),
    Outside,
    Edit,
    Delete,
    Name(String),
    Email(String),
    SetFunction(JobFunction),
    SetRole(Role),
    Submit,
    Confirm,
    Cancel,
    Ack,
    Retry,
    CloseToast,
    Show,
    Help,
    Quit,
}

/// What the input loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

fn usage(message: impl Into<String>) -> ClientError {
    ClientError::Rejected(message.into())
}

fn parse_function(value: &str) -> Result<JobFunction, ClientError> {
    JobFunction::parse(value).ok_or_else(|| usage(format!("unknown function '{}'", value)))
}

fn parse_role(value: &str) -> Result<Role, ClientError> {
    Role::parse(value).ok_or_else(|| usage(format!("unknown role '{}'", value)))
}

fn is_all(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case("all")
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, ClientError> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "search" => Command::Search(rest.to_string()),
            "function" if is_all(rest) => Command::FunctionFilter(None),
            "function" => Command::FunctionFilter(Some(parse_function(rest)?)),
            "role" if is_all(rest) => Command::RoleFilter(None),
            "role" => Command::RoleFilter(Some(parse_role(rest)?)),
            "add" => Command::Add,
            "menu" => {
                let row = rest
                    .parse::<usize>()
                    .ok()
                    .filter(|row| *row > 0)
                    .ok_or_else(|| usage("menu expects a row number starting at 1"))?;
                Command::Menu(row)
            }
            "outside" => Command::Outside,
            "edit" => Command::Edit,
            "delete" => Command::Delete,
            "name" => Command::Name(rest.to_string()),
            "email" => Command::Email(rest.to_string()),
            "set-function" => Command::SetFunction(parse_function(rest)?),
            "set-role" => Command::SetRole(parse_role(rest)?),
            "submit" => Command::Submit,
            "confirm" => Command::Confirm,
            "cancel" => Command::Cancel,
            "ack" => Command::Ack,
            "retry" => Command::Retry,
            "close-toast" => Command::CloseToast,
            "" | "show" => Command::Show,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(usage(format!("unknown command '{}', try help", other))),
        };
        Ok(command)
    }
}

/// Apply a command to the session.
pub fn apply(session: &mut RosterSession, command: Command) -> Result<Flow, ClientError> {
    match command {
        Command::Search(text) => {
            session.set_search_text(&text);
        }
        Command::FunctionFilter(function) => {
            session.set_function_filter(function);
        }
        Command::RoleFilter(role) => {
            session.set_role_filter(role);
        }
        Command::Add => session.open_add_member()?,
        Command::Menu(row) => {
            let id = row_id(&session.view(), row)?;
            session.toggle_row_menu(&id)?;
        }
        Command::Outside => session.click_outside(),
        Command::Edit => session.edit_selected()?,
        Command::Delete => session.delete_selected()?,
        Command::Name(value) => session.set_full_name(&value)?,
        Command::Email(value) => session.set_email(&value)?,
        Command::SetFunction(function) => session.set_draft_function(Some(function))?,
        Command::SetRole(role) => session.set_draft_role(Some(role))?,
        Command::Submit => {
            session.submit_form()?;
        }
        Command::Confirm => {
            session.confirm_delete()?;
        }
        Command::Cancel => session.dismiss_modal(),
        Command::Ack => session.acknowledge_error(),
        Command::Retry => {
            session.acknowledge_and_retry();
        }
        Command::CloseToast => session.dismiss_toast(),
        Command::Show | Command::Help => {}
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn row_id(view: &RosterView, row: usize) -> Result<MemberId, ClientError> {
    view.rows
        .get(row - 1)
        .map(|r| r.id.clone())
        .ok_or_else(|| ClientError::NotFound(format!("no row {}", row)))
}

/// Plain-text rendering of the screen.
pub fn render(view: &RosterView) -> String {
    let mut out = String::new();

    if let Some(toast) = &view.toast {
        let _ = writeln!(out, "[{}]", toast);
    }
    if view.loading {
        let _ = writeln!(out, "loading...");
    }

    match view.empty_state {
        Some(message) => {
            let _ = writeln!(out, "{}", message);
        }
        None => {
            for (index, row) in view.rows.iter().enumerate() {
                let _ = writeln!(
                    out,
                    "{:>3}. {:<24} {:<32} {:<18} {}{}",
                    index + 1,
                    row.full_name,
                    row.email,
                    row.function,
                    row.role_badge,
                    if row.menu_open { "  [edit | delete]" } else { "" }
                );
            }
        }
    }

    match &view.modal {
        ModalView::None => {}
        ModalView::Form(form) => {
            let _ = writeln!(out, "== {} ==", form.title);
            let _ = writeln!(out, "  full name: {}", form.full_name);
            let _ = writeln!(out, "  email:     {}", form.email);
            let _ = writeln!(
                out,
                "  function:  {}  ({})",
                form.function.unwrap_or("-"),
                form.function_choices.join(" | ")
            );
            let _ = writeln!(
                out,
                "  role:      {}  ({})",
                form.role.unwrap_or("-"),
                form.role_choices.join(" | ")
            );
            for (field, message) in &form.errors {
                let _ = writeln!(out, "  ! {}: {}", field, message);
            }
            let _ = writeln!(
                out,
                "  [{}]{}",
                form.submit_label,
                if form.submit_enabled { "" } else { " (disabled)" }
            );
        }
        ModalView::DeleteConfirm {
            title,
            body,
            confirm_enabled,
            ..
        } => {
            let _ = writeln!(out, "== {} ==", title);
            let _ = writeln!(out, "  {}", body);
            let _ = writeln!(
                out,
                "  [confirm]{} [cancel]",
                if *confirm_enabled { "" } else { " (disabled)" }
            );
        }
        ModalView::Error { title, message } => {
            let _ = writeln!(out, "== {} ==", title);
            let _ = writeln!(out, "  {}", message);
            let _ = writeln!(out, "  [ack] [retry]");
        }
    }

    if view.busy {
        let _ = writeln!(out, "saving...");
    }
    out
}

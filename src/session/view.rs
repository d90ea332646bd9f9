//! Render model of the roster screen.

use crate::interaction::{FormMode, InteractionState, Modal};
use crate::models::{MemberId, QueryDescriptor};
use crate::notify::NotificationQueue;
use crate::store::RosterStore;
use crate::validation::{Field, FieldValidator};

pub const EMPTY_ROSTER: &str = "Add your first team member to get started and start collaborating.";
pub const NO_SEARCH_MATCH: &str = "No team members match your search";
pub const NO_FILTER_MATCH: &str = "No team members match the selected filters";

pub const CREATE_TITLE: &str = "Add Team Member";
pub const CREATE_SUBMIT: &str = "Add to Team";
pub const EDIT_TITLE: &str = "Edit Team Member";
pub const EDIT_SUBMIT: &str = "Save Changes";
pub const DELETE_TITLE: &str = "Delete Member?";
pub const DELETE_BODY: &str =
    "This will permanently remove this team member. This action cannot be undone.";
pub const ERROR_TITLE: &str = "Something Went Wrong";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub id: MemberId,
    pub full_name: String,
    pub email: String,
    pub function: &'static str,
    pub role: &'static str,
    pub role_badge: &'static str,
    pub menu_open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub title: &'static str,
    pub submit_label: &'static str,
    pub full_name: String,
    pub email: String,
    pub function: Option<&'static str>,
    pub role: Option<&'static str>,
    /// Labels of the offered choices, in display order.
    pub function_choices: Vec<&'static str>,
    pub role_choices: Vec<&'static str>,
    pub errors: Vec<(Field, &'static str)>,
    pub submit_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalView {
    None,
    Form(FormView),
    DeleteConfirm {
        title: &'static str,
        body: &'static str,
        target: MemberId,
        confirm_enabled: bool,
    },
    Error {
        title: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterView {
    pub rows: Vec<RowView>,
    pub loading: bool,
    pub busy: bool,
    pub empty_state: Option<&'static str>,
    pub modal: ModalView,
    pub toast: Option<String>,
}

/// Message shown in place of the table when the snapshot is empty.
pub fn empty_state_message(query: &QueryDescriptor) -> &'static str {
    if query.has_text() {
        NO_SEARCH_MATCH
    } else if query.has_filters() {
        NO_FILTER_MATCH
    } else {
        EMPTY_ROSTER
    }
}

pub(crate) struct ViewParts<'a> {
    pub store: &'a RosterStore,
    pub interaction: &'a InteractionState,
    pub notifications: &'a NotificationQueue,
    pub validator: &'a FieldValidator,
    pub query: &'a QueryDescriptor,
    pub busy: bool,
}

pub(crate) fn build(parts: ViewParts<'_>) -> RosterView {
    let menu = parts.interaction.row_menu();
    let rows = parts
        .store
        .members()
        .iter()
        .map(|m| RowView {
            id: m.id.clone(),
            full_name: m.full_name.clone(),
            email: m.email.clone(),
            function: m.function.label(),
            role: m.role.label(),
            role_badge: m.role.badge(),
            menu_open: menu == Some(&m.id),
        })
        .collect();

    let empty_state = parts
        .store
        .is_empty()
        .then(|| empty_state_message(parts.query));

    RosterView {
        rows,
        loading: parts.store.is_loading(),
        busy: parts.busy,
        empty_state,
        modal: modal_view(parts.interaction.modal(), parts.validator, parts.busy),
        toast: parts.notifications.current().map(|t| t.message.clone()),
    }
}

fn modal_view(modal: &Modal, validator: &FieldValidator, busy: bool) -> ModalView {
    match modal {
        Modal::Closed => ModalView::None,
        Modal::FormOpen(form) => {
            let (title, submit_label) = match form.mode {
                FormMode::Create => (CREATE_TITLE, CREATE_SUBMIT),
                FormMode::Edit(_) => (EDIT_TITLE, EDIT_SUBMIT),
            };
            let fields = &form.draft.fields;
            let options = validator.options();
            ModalView::Form(FormView {
                title,
                submit_label,
                full_name: fields.full_name.clone(),
                email: fields.email.clone(),
                function: fields.function.map(|f| f.label()),
                role: fields.role.map(|r| r.label()),
                function_choices: options.function_options.iter().map(|o| o.label).collect(),
                role_choices: options.role_options.iter().map(|o| o.label).collect(),
                errors: form.draft.validation_errors.iter().collect(),
                submit_enabled: !busy && validator.is_submit_eligible(fields),
            })
        }
        Modal::DeleteConfirmOpen { target, .. } => ModalView::DeleteConfirm {
            title: DELETE_TITLE,
            body: DELETE_BODY,
            target: target.clone(),
            confirm_enabled: !busy,
        },
        Modal::ErrorOpen { notice, .. } => ModalView::Error {
            title: ERROR_TITLE,
            message: notice.message.clone(),
        },
    }
}

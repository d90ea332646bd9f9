//! Modal and row-menu state.
//!
//! A single tagged [`Modal`] replaces independent per-dialog flags, so two
//! modal layers can never be open at once. The row action menu is tracked
//! separately and may only be open while no modal is.

use crate::errors::{ClientError, ErrorNotice};
use crate::models::{MemberDraft, MemberId, MemberPayload};
use crate::store::RosterStore;
use crate::validation::{FieldValidator, ValidationErrors};

/// Identity of one opened modal; a new one is minted every time a modal opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModalEpoch(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(MemberId),
}

/// Working copy of the form fields plus their current errors.
///
/// Exists only while a form is open and is dropped on cancel or close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDraft {
    pub fields: MemberDraft,
    pub validation_errors: ValidationErrors,
}

impl FormDraft {
    fn new(fields: MemberDraft, validator: &FieldValidator) -> Self {
        let validation_errors = validator.validate(&fields);
        Self {
            fields,
            validation_errors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSession {
    pub mode: FormMode,
    pub draft: FormDraft,
    epoch: ModalEpoch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    Closed,
    FormOpen(FormSession),
    DeleteConfirmOpen {
        target: MemberId,
        epoch: ModalEpoch,
    },
    /// The form or confirmation that was open when the error surfaced is kept
    /// in `resume` and comes back on acknowledge.
    ErrorOpen {
        notice: ErrorNotice,
        resume: Option<Box<Modal>>,
    },
}

impl Modal {
    fn epoch(&self) -> Option<ModalEpoch> {
        match self {
            Modal::FormOpen(form) => Some(form.epoch),
            Modal::DeleteConfirmOpen { epoch, .. } => Some(*epoch),
            _ => None,
        }
    }
}

/// Proof that the user confirmed a delete in the confirmation modal.
///
/// Only [`InteractionState::confirm_delete`] constructs one, which makes the
/// confirmation step the sole path to a delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteConfirmation {
    target: MemberId,
    origin: ModalEpoch,
}

impl DeleteConfirmation {
    pub fn target(&self) -> &MemberId {
        &self.target
    }

    pub fn origin(&self) -> ModalEpoch {
        self.origin
    }
}

/// A validated form ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormSubmission {
    Create {
        payload: MemberPayload,
        origin: ModalEpoch,
    },
    Update {
        id: MemberId,
        payload: MemberPayload,
        origin: ModalEpoch,
    },
}

#[derive(Debug)]
pub struct InteractionState {
    modal: Modal,
    row_menu: Option<MemberId>,
    next_epoch: u64,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionState {
    pub fn new() -> Self {
        Self {
            modal: Modal::Closed,
            row_menu: None,
            next_epoch: 0,
        }
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn row_menu(&self) -> Option<&MemberId> {
        self.row_menu.as_ref()
    }

    pub fn is_modal_open(&self) -> bool {
        !matches!(self.modal, Modal::Closed)
    }

    /// The form currently open, or suspended underneath an error.
    pub fn form(&self) -> Option<&FormSession> {
        match &self.modal {
            Modal::FormOpen(form) => Some(form),
            Modal::ErrorOpen {
                resume: Some(inner),
                ..
            } => match inner.as_ref() {
                Modal::FormOpen(form) => Some(form),
                _ => None,
            },
            _ => None,
        }
    }

    fn mint_epoch(&mut self) -> ModalEpoch {
        self.next_epoch += 1;
        ModalEpoch(self.next_epoch)
    }

    fn require_closed(&self, action: &str) -> Result<(), ClientError> {
        if self.is_modal_open() {
            return Err(ClientError::Rejected(format!(
                "cannot {} while a modal is open",
                action
            )));
        }
        Ok(())
    }

    fn open(&mut self, modal: Modal) {
        self.row_menu = None;
        tracing::debug!(modal = ?modal_name(&modal), "modal opened");
        self.modal = modal;
    }

    /// Closed -> FormOpen(Create) with an empty draft.
    pub fn open_create(&mut self, validator: &FieldValidator) -> Result<(), ClientError> {
        self.require_closed("add a member")?;
        let epoch = self.mint_epoch();
        self.open(Modal::FormOpen(FormSession {
            mode: FormMode::Create,
            draft: FormDraft::new(MemberDraft::default(), validator),
            epoch,
        }));
        Ok(())
    }

    /// Open, switch, or close the action menu of a row.
    pub fn toggle_row_menu(&mut self, id: &MemberId) -> Result<(), ClientError> {
        self.require_closed("open a row menu")?;
        if self.row_menu.as_ref() == Some(id) {
            self.row_menu = None;
        } else {
            self.row_menu = Some(id.clone());
        }
        Ok(())
    }

    /// A click anywhere outside the open menu.
    pub fn click_outside(&mut self) {
        self.row_menu = None;
    }

    fn take_menu_target(&mut self) -> Result<MemberId, ClientError> {
        self.require_closed("use a row action")?;
        self.row_menu
            .take()
            .ok_or_else(|| ClientError::Rejected("no row menu is open".to_string()))
    }

    /// "Edit" row action: FormOpen(Edit) seeded from a copy of the stored record.
    pub fn choose_edit(
        &mut self,
        store: &RosterStore,
        validator: &FieldValidator,
    ) -> Result<(), ClientError> {
        let id = self.take_menu_target()?;
        let member = store
            .get(&id)
            .ok_or_else(|| ClientError::NotFound(format!("Member {} is no longer listed", id)))?;
        let fields = MemberDraft::from_member(member);
        let epoch = self.mint_epoch();
        self.open(Modal::FormOpen(FormSession {
            mode: FormMode::Edit(id),
            draft: FormDraft::new(fields, validator),
            epoch,
        }));
        Ok(())
    }

    /// "Delete" row action: DeleteConfirmOpen for the menu's row.
    pub fn choose_delete(&mut self) -> Result<(), ClientError> {
        let target = self.take_menu_target()?;
        let epoch = self.mint_epoch();
        self.open(Modal::DeleteConfirmOpen { target, epoch });
        Ok(())
    }

    /// Edit the open form's fields; inline errors are recomputed.
    pub fn update_draft(
        &mut self,
        validator: &FieldValidator,
        edit: impl FnOnce(&mut MemberDraft),
    ) -> Result<(), ClientError> {
        let Modal::FormOpen(form) = &mut self.modal else {
            return Err(ClientError::Rejected("no form is open".to_string()));
        };
        edit(&mut form.draft.fields);
        form.draft.validation_errors = validator.validate(&form.draft.fields);
        Ok(())
    }

    /// Validate the open form for submission. On failure the submit errors
    /// are shown inline and nothing is sent.
    pub fn submit_form(&mut self, validator: &FieldValidator) -> Result<FormSubmission, ClientError> {
        let Modal::FormOpen(form) = &mut self.modal else {
            return Err(ClientError::Rejected("no form is open".to_string()));
        };
        match validator.submit(&form.draft.fields) {
            Ok(payload) => Ok(match &form.mode {
                FormMode::Create => FormSubmission::Create {
                    payload,
                    origin: form.epoch,
                },
                FormMode::Edit(id) => FormSubmission::Update {
                    id: id.clone(),
                    payload,
                    origin: form.epoch,
                },
            }),
            Err(errors) => {
                form.draft.validation_errors = errors.clone();
                Err(ClientError::Validation(errors))
            }
        }
    }

    /// Confirm action of the delete modal. The modal stays open until the
    /// delete succeeds.
    pub fn confirm_delete(&self) -> Result<DeleteConfirmation, ClientError> {
        match &self.modal {
            Modal::DeleteConfirmOpen { target, epoch } => Ok(DeleteConfirmation {
                target: target.clone(),
                origin: *epoch,
            }),
            _ => Err(ClientError::Rejected(
                "delete requires an open confirmation".to_string(),
            )),
        }
    }

    /// Cancel, backdrop, or close button. Discards any draft; on the error
    /// dialog this is the same as acknowledging it.
    pub fn dismiss(&mut self) {
        match self.modal {
            Modal::ErrorOpen { .. } => self.acknowledge_error(),
            Modal::Closed => {}
            _ => {
                tracing::debug!(modal = ?modal_name(&self.modal), "modal dismissed");
                self.modal = Modal::Closed;
            }
        }
    }

    /// Any state -> ErrorOpen. An open form or confirmation is suspended so the
    /// user's input survives the error.
    pub fn open_error(&mut self, notice: ErrorNotice) {
        let previous = std::mem::replace(&mut self.modal, Modal::Closed);
        let resume = match previous {
            Modal::Closed => None,
            Modal::ErrorOpen { resume, .. } => resume,
            other => Some(Box::new(other)),
        };
        self.open(Modal::ErrorOpen { notice, resume });
    }

    /// ErrorOpen -> the suspended modal, or Closed when there is none.
    pub fn acknowledge_error(&mut self) {
        if let Modal::ErrorOpen { resume, .. } = &mut self.modal {
            self.modal = match resume.take() {
                Some(inner) => *inner,
                None => Modal::Closed,
            };
            tracing::debug!(modal = ?modal_name(&self.modal), "error acknowledged");
        }
    }

    /// Close the modal a successful mutation came from, if it is still the
    /// one showing (directly or suspended under an error).
    pub fn close_after_success(&mut self, origin: ModalEpoch) -> bool {
        if self.modal.epoch() == Some(origin) {
            self.modal = Modal::Closed;
            return true;
        }
        if let Modal::ErrorOpen { resume, .. } = &mut self.modal {
            if resume.as_ref().and_then(|m| m.epoch()) == Some(origin) {
                *resume = None;
                return true;
            }
        }
        false
    }
}

fn modal_name(modal: &Modal) -> &'static str {
    match modal {
        Modal::Closed => "closed",
        Modal::FormOpen(FormSession {
            mode: FormMode::Create,
            ..
        }) => "form:create",
        Modal::FormOpen(_) => "form:edit",
        Modal::DeleteConfirmOpen { .. } => "delete-confirm",
        Modal::ErrorOpen { .. } => "error",
    }
}

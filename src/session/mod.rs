//! The roster session: single owner of all client state.
//!
//! User actions are synchronous methods. Timers, fetches and writes run as
//! spawned tasks that report back through one event channel; [`RosterSession::step`]
//! applies those events one at a time, so no two handlers ever interleave.

mod view;


pub use view::*;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::api::RosterService;
use crate::config::{Config, ToastMessages};
use crate::errors::{ClientError, ErrorNotice, ErrorOrigin};
use crate::interaction::{FormSubmission, InteractionState};
use crate::models::{
    FormOptions, JobFunction, Member, MemberDraft, MemberId, MutationKind, QueryDescriptor, Role,
};
use crate::mutation::{MutationCoordinator, MutationTicket};
use crate::notify::NotificationQueue;
use crate::store::{ApplyOutcome, FetchTicket, Generation, RosterStore};
use crate::sync::DebouncedFetchController;
use crate::validation::FieldValidator;

/// Runtime settings of a session.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub debounce: Duration,
    pub toast_duration: Duration,
    pub toast_messages: ToastMessages,
    pub form_options: FormOptions,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SessionSettings {
    fn from(config: &Config) -> Self {
        Self {
            debounce: config.debounce,
            toast_duration: config.toast_duration,
            toast_messages: config.toast_messages.clone(),
            form_options: config.form_options.clone(),
        }
    }
}

/// Completion events delivered by spawned tasks.
#[derive(Debug)]
pub enum SessionEvent {
    DebounceElapsed {
        seq: u64,
    },
    FetchCompleted {
        ticket: FetchTicket,
        result: Result<Vec<Member>, ClientError>,
    },
    MutationCompleted {
        ticket: MutationTicket,
        result: Result<(), ClientError>,
    },
    ToastExpired {
        token: u64,
    },
}

/// What handling one event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    FetchIssued(Generation),
    FetchApplied(Generation),
    FetchDropped(Generation),
    FetchFailed(Generation),
    MutationSucceeded {
        kind: MutationKind,
        refetch: Generation,
    },
    MutationFailed {
        kind: MutationKind,
    },
    ToastExpired,
    Ignored,
}

pub struct RosterSession {
    settings: SessionSettings,
    validator: FieldValidator,
    store: RosterStore,
    fetcher: DebouncedFetchController,
    mutations: MutationCoordinator,
    interaction: InteractionState,
    notifications: NotificationQueue,
    events: mpsc::UnboundedReceiver<SessionEvent>,
    cancel: CancellationToken,
    closed: bool,
}

impl RosterSession {
    /// Build a session and issue the initial load. Must run inside a tokio runtime.
    pub fn start(service: Arc<dyn RosterService>, settings: SessionSettings) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let fetcher = DebouncedFetchController::new(
            Arc::clone(&service),
            settings.debounce,
            tx.clone(),
            cancel.clone(),
        );
        let mutations = MutationCoordinator::new(service, tx.clone(), cancel.clone());
        let notifications = NotificationQueue::new(settings.toast_duration, tx, cancel.clone());

        let mut session = Self {
            validator: FieldValidator::new(settings.form_options.clone()),
            settings,
            store: RosterStore::new(),
            fetcher,
            mutations,
            interaction: InteractionState::new(),
            notifications,
            events: rx,
            cancel,
            closed: false,
        };
        session.fetcher.fetch_now(&mut session.store);
        session
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn store(&self) -> &RosterStore {
        &self.store
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.interaction
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn validator(&self) -> &FieldValidator {
        &self.validator
    }

    /// Descriptor built from the current search and filter inputs.
    pub fn query(&self) -> &QueryDescriptor {
        self.fetcher.target()
    }

    pub fn is_busy(&self) -> bool {
        self.mutations.is_busy()
    }

    pub fn view(&self) -> RosterView {
        view::build(view::ViewParts {
            store: &self.store,
            interaction: &self.interaction,
            notifications: &self.notifications,
            validator: &self.validator,
            query: self.fetcher.target(),
            busy: self.mutations.is_busy(),
        })
    }

    // ==================== QUERY INPUTS ====================

    pub fn set_search_text(&mut self, text: &str) -> bool {
        self.fetcher.set_text(text)
    }

    pub fn set_function_filter(&mut self, function: Option<JobFunction>) -> bool {
        self.fetcher.set_function(function)
    }

    pub fn set_role_filter(&mut self, role: Option<Role>) -> bool {
        self.fetcher.set_role(role)
    }

    // ==================== INTERACTIONS ====================

    pub fn open_add_member(&mut self) -> Result<(), ClientError> {
        self.interaction.open_create(&self.validator)
    }

    pub fn toggle_row_menu(&mut self, id: &MemberId) -> Result<(), ClientError> {
        self.interaction.toggle_row_menu(id)
    }

    pub fn click_outside(&mut self) {
        self.interaction.click_outside();
    }

    pub fn edit_selected(&mut self) -> Result<(), ClientError> {
        self.interaction.choose_edit(&self.store, &self.validator)
    }

    pub fn delete_selected(&mut self) -> Result<(), ClientError> {
        self.interaction.choose_delete()
    }

    pub fn update_draft(&mut self, edit: impl FnOnce(&mut MemberDraft)) -> Result<(), ClientError> {
        self.interaction.update_draft(&self.validator, edit)
    }

    pub fn set_full_name(&mut self, value: &str) -> Result<(), ClientError> {
        self.update_draft(|d| d.full_name = value.to_string())
    }

    pub fn set_email(&mut self, value: &str) -> Result<(), ClientError> {
        self.update_draft(|d| d.email = value.to_string())
    }

    pub fn set_draft_function(&mut self, function: Option<JobFunction>) -> Result<(), ClientError> {
        self.update_draft(|d| d.function = function)
    }

    pub fn set_draft_role(&mut self, role: Option<Role>) -> Result<(), ClientError> {
        self.update_draft(|d| d.role = role)
    }

    /// Submit the open form as a create or update.
    pub fn submit_form(&mut self) -> Result<MutationTicket, ClientError> {
        if self.mutations.is_busy() {
            return Err(ClientError::Busy);
        }
        match self.interaction.submit_form(&self.validator)? {
            FormSubmission::Create { payload, origin } => self.mutations.create(payload, origin),
            FormSubmission::Update { id, payload, origin } => {
                self.mutations.update(id, payload, origin)
            }
        }
    }

    /// Confirm action of the delete modal.
    pub fn confirm_delete(&mut self) -> Result<MutationTicket, ClientError> {
        if self.mutations.is_busy() {
            return Err(ClientError::Busy);
        }
        let confirmation = self.interaction.confirm_delete()?;
        self.mutations.delete(confirmation)
    }

    pub fn dismiss_modal(&mut self) {
        self.interaction.dismiss();
    }

    pub fn acknowledge_error(&mut self) {
        self.interaction.acknowledge_error();
    }

    /// Acknowledge the error dialog and fetch the current query again.
    pub fn acknowledge_and_retry(&mut self) -> Generation {
        self.interaction.acknowledge_error();
        self.fetcher.fetch_now(&mut self.store)
    }

    pub fn dismiss_toast(&mut self) {
        self.notifications.dismiss();
    }

    // ==================== EVENTS ====================

    /// Wait for the next completion event and apply it.
    pub async fn step(&mut self) -> Option<Outcome> {
        if self.closed {
            return None;
        }
        let event = self.events.recv().await?;
        Some(self.handle(event))
    }

    /// Apply one already-delivered event without waiting.
    pub fn try_step(&mut self) -> Option<Outcome> {
        if self.closed {
            return None;
        }
        let event = self.events.try_recv().ok()?;
        Some(self.handle(event))
    }

    pub fn handle(&mut self, event: SessionEvent) -> Outcome {
        if self.closed {
            return Outcome::Ignored;
        }
        match event {
            SessionEvent::DebounceElapsed { seq } => {
                match self.fetcher.on_debounce_elapsed(seq, &mut self.store) {
                    Some(generation) => Outcome::FetchIssued(generation),
                    None => Outcome::Ignored,
                }
            }
            SessionEvent::FetchCompleted { ticket, result } => self.on_fetch_completed(ticket, result),
            SessionEvent::MutationCompleted { ticket, result } => {
                self.on_mutation_completed(ticket, result)
            }
            SessionEvent::ToastExpired { token } => {
                if self.notifications.on_expired(token) {
                    Outcome::ToastExpired
                } else {
                    Outcome::Ignored
                }
            }
        }
    }

    fn on_fetch_completed(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Member>, ClientError>,
    ) -> Outcome {
        let generation = ticket.generation;
        match result {
            Ok(members) => {
                let count = members.len();
                match self.store.apply(&ticket, members) {
                    ApplyOutcome::Applied => {
                        tracing::debug!(generation = generation.value(), count, "fetch applied");
                        Outcome::FetchApplied(generation)
                    }
                    ApplyOutcome::Stale => Outcome::FetchDropped(generation),
                }
            }
            Err(err) => {
                if !self.store.fail(&ticket) {
                    tracing::debug!(generation = generation.value(), "dropping stale fetch failure");
                    return Outcome::FetchDropped(generation);
                }
                tracing::warn!(generation = generation.value(), error = %err, "fetch failed");
                self.interaction
                    .open_error(ErrorNotice::new(ErrorOrigin::Fetch, &err));
                Outcome::FetchFailed(generation)
            }
        }
    }

    fn on_mutation_completed(
        &mut self,
        ticket: MutationTicket,
        result: Result<(), ClientError>,
    ) -> Outcome {
        if !self.mutations.finish(&ticket) {
            return Outcome::Ignored;
        }
        let kind = ticket.kind;
        match result {
            Ok(()) => {
                tracing::info!(kind = %kind, target = ?ticket.target, "mutation succeeded");
                // Close, clear, refetch and notify in one handler so no render
                // can see a closed modal next to a stale draft.
                self.interaction.close_after_success(ticket.origin);
                let refetch = self.fetcher.fetch_now(&mut self.store);
                let message = self.success_message(kind).to_string();
                self.notifications.show(message);
                Outcome::MutationSucceeded { kind, refetch }
            }
            Err(err) => {
                tracing::warn!(kind = %kind, target = ?ticket.target, error = %err, "mutation failed");
                self.interaction
                    .open_error(ErrorNotice::new(ErrorOrigin::Mutation(kind), &err));
                Outcome::MutationFailed { kind }
            }
        }
    }

    fn success_message(&self, kind: MutationKind) -> &str {
        let messages = &self.settings.toast_messages;
        match kind {
            MutationKind::Create => &messages.created,
            MutationKind::Update => &messages.updated,
            MutationKind::Delete => &messages.deleted,
        }
    }

    /// Tear down: cancel timers and tasks and make every in-flight response stale.
    pub fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.cancel.cancel();
        self.fetcher.shutdown(&mut self.store);
        self.mutations.shutdown();
        self.notifications.shutdown();
        self.events.close();
        tracing::debug!("roster session shut down");
    }
}

impl Drop for RosterSession {
    fn drop(&mut self) {
        self.shutdown();
    }
}

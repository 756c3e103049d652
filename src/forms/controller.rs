//! Form controller
//!
//! Owns the answers for one form instance and drives it through
//! validation and submission:
//!
//! ```text
//! Editing -> Validating -> Editing           (some answer invalid)
//!                       -> Submitting -> Submitted
//!                                     -> SubmitFailed
//! ```
//!
//! The UI never mutates answers directly. It calls [`FormController::set_value`]
//! and listens to [`FormEvent`]s from [`FormController::subscribe`].

use std::fmt;
use tokio::sync::broadcast;
use tracing::{debug, info};
use crate::models::event::{submission_hash, EventContext};
use crate::services::submission::FormPayload;
use crate::services::FormServices;
use crate::utils::errors::{Result, VolunteerError};
use crate::utils::logging::{log_config_error, log_persistence_error, log_submission};
use super::question::Question;
use super::value::{FieldValue, FormValues};

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormPhase {
    Editing,
    Validating,
    Submitting,
    Submitted,
    SubmitFailed,
}

impl FormPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, FormPhase::Submitted | FormPhase::SubmitFailed)
    }
}

impl fmt::Display for FormPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormPhase::Editing => "editing",
            FormPhase::Validating => "validating",
            FormPhase::Submitting => "submitting",
            FormPhase::Submitted => "submitted",
            FormPhase::SubmitFailed => "submit_failed",
        };
        write!(f, "{}", name)
    }
}

/// Notification for the UI layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    ValueChanged { name: String },
    ValidityChanged { name: String, valid: bool },
    /// Scroll so the topmost invalid question is in view
    ScrollTo { position: i32 },
    PhaseChanged { from: FormPhase, to: FormPhase },
}

/// Result of a completed submit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; the form stays editable
    Invalid { scroll_to: Option<i32> },
    /// Accepted by the form backend
    Submitted { hash: String },
    /// Network error or non-2xx response; nothing was recorded
    Failed { reason: String },
}

pub struct FormController {
    title: String,
    context: EventContext,
    questions: Vec<Question>,
    values: FormValues,
    phase: FormPhase,
    services: FormServices,
    events_tx: broadcast::Sender<FormEvent>,
    scroll_target: Option<i32>,
}

impl FormController {
    pub fn new(
        title: impl Into<String>,
        context: EventContext,
        questions: Vec<Question>,
        services: FormServices,
    ) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            title: title.into(),
            context,
            questions,
            values: FormValues::new(),
            phase: FormPhase::Editing,
            services,
            events_tx,
            scroll_target: None,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FormEvent> {
        self.events_tx.subscribe()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn context(&self) -> &EventContext {
        &self.context
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, name: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.name() == name)
    }

    /// Questions currently shown, in form order
    pub fn visible_questions(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter().filter(|q| q.is_visible(&self.values))
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    /// Position requested by the last failed validation
    pub fn scroll_target(&self) -> Option<i32> {
        self.scroll_target
    }

    pub fn get_value(&self, name: &str) -> &FieldValue {
        self.values.get(name)
    }

    /// Store an answer. Questions already flagged invalid are re-checked so
    /// errors clear as soon as they are fixed.
    pub fn set_value(&mut self, name: &str, value: FieldValue) -> Result<()> {
        if self.phase != FormPhase::Editing {
            return Err(VolunteerError::InvalidStateTransition {
                from: self.phase.to_string(),
                to: FormPhase::Editing.to_string(),
            });
        }
        if self.question(name).is_none() {
            return Err(VolunteerError::InvalidInput(format!(
                "Form '{}' has no question '{}'",
                self.title, name
            )));
        }

        self.values.set(name, value);
        self.emit(FormEvent::ValueChanged { name: name.to_string() });

        let mut cleared = Vec::new();
        for question in self.questions.iter_mut().filter(|q| q.is_invalid()) {
            if question.effective_validate(&self.values) {
                question.set_invalid(false);
                cleared.push(question.name().to_string());
            }
        }
        for name in cleared {
            self.emit(FormEvent::ValidityChanged { name, valid: true });
        }
        Ok(())
    }

    /// Record where the UI laid a question out
    pub fn set_vertical_position(&mut self, name: &str, position: i32) -> Result<()> {
        let question = self
            .questions
            .iter_mut()
            .find(|q| q.name() == name)
            .ok_or_else(|| VolunteerError::InvalidInput(format!("Unknown question '{}'", name)))?;
        question.set_vertical_position(position);
        Ok(())
    }

    /// Check every question, flag the failures and request a scroll to the
    /// topmost one. Returns whether the form may be submitted.
    pub fn validate(&mut self) -> bool {
        let mut changes = Vec::new();
        let mut topmost: Option<i32> = None;

        for question in self.questions.iter_mut() {
            let valid = question.effective_validate(&self.values);
            if !valid {
                let position = question.vertical_position();
                topmost = Some(topmost.map_or(position, |top| top.min(position)));
            }
            if question.is_invalid() == valid {
                question.set_invalid(!valid);
                changes.push((question.name().to_string(), valid));
            }
        }

        for (name, valid) in changes {
            self.emit(FormEvent::ValidityChanged { name, valid });
        }

        self.scroll_target = topmost;
        match topmost {
            Some(position) => {
                debug!(form = %self.title, position = position, "Validation failed");
                self.emit(FormEvent::ScrollTo { position });
                false
            }
            None => true,
        }
    }

    /// Event context first, then every visible answer, keyed by entry id
    pub fn encode_payload(&self) -> Result<FormPayload> {
        let ids = self.services.registry.lookup(&self.title)?;

        let mut payload = FormPayload::new(&ids.form_id);
        payload.push_entry(&ids.location_entry, self.context.location.as_str());
        payload.push_entry(&ids.date_entry, self.context.date.as_str());

        for question in self.visible_questions() {
            let entry_id = ids.entry_for(question.name()).ok_or_else(|| {
                VolunteerError::MissingEntryId {
                    form: self.title.clone(),
                    field: question.name().to_string(),
                }
            })?;
            payload.push_entry(entry_id, self.values.get(question.name()).encode());
        }

        Ok(payload)
    }

    /// Validate, post and record the submission.
    ///
    /// Invalid answers and transport failures are reported through
    /// [`SubmitOutcome`]; configuration problems come back as errors before
    /// anything is sent. Dropping the future while the post is pending
    /// leaves the form in `SubmitFailed`.
    pub async fn submit(&mut self) -> Result<SubmitOutcome> {
        match self.phase {
            FormPhase::Editing => {}
            FormPhase::Validating | FormPhase::Submitting => {
                return Err(VolunteerError::SubmissionInProgress);
            }
            terminal => {
                return Err(VolunteerError::InvalidStateTransition {
                    from: terminal.to_string(),
                    to: FormPhase::Submitting.to_string(),
                });
            }
        }

        self.transition(FormPhase::Validating);
        if !self.validate() {
            self.transition(FormPhase::Editing);
            return Ok(SubmitOutcome::Invalid {
                scroll_to: self.scroll_target,
            });
        }

        let payload = match self.encode_payload() {
            Ok(payload) => payload,
            Err(e) => {
                let field = match &e {
                    VolunteerError::MissingEntryId { field, .. } => Some(field.as_str()),
                    _ => None,
                };
                log_config_error(&self.title, field, &e.to_string());
                self.transition(FormPhase::Editing);
                return Err(e);
            }
        };

        self.transition(FormPhase::Submitting);
        let mut in_flight = InFlight {
            controller: &mut *self,
            finished: false,
        };
        let sent = in_flight.controller.services.transport.submit(&payload).await;
        in_flight.finished = true;
        drop(in_flight);

        match sent {
            Ok(()) => {
                let hash = submission_hash(&self.title, &self.context.location, &self.context.date);
                if let Err(e) = self.services.ledger.record(&hash).await {
                    log_persistence_error("write", &e.to_string());
                }
                log_submission(&self.title, "submitted", None);
                self.transition(FormPhase::Submitted);
                Ok(SubmitOutcome::Submitted { hash })
            }
            Err(e) => {
                let reason = e.to_string();
                log_submission(&self.title, "failed", Some(&reason));
                self.transition(FormPhase::SubmitFailed);
                Ok(SubmitOutcome::Failed { reason })
            }
        }
    }

    /// Text for the generic failure alert
    pub fn failure_message(&self) -> String {
        if self.services.support_email.is_empty() {
            format!("Your {} signup could not be sent. Please try again later.", self.title)
        } else {
            format!(
                "Your {} signup could not be sent. Please try again later or contact {}.",
                self.title, self.services.support_email
            )
        }
    }

    fn transition(&mut self, to: FormPhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        self.phase = to;
        if to.is_terminal() {
            info!(form = %self.title, from = %from, to = %to, "Form finished");
        } else {
            debug!(form = %self.title, from = %from, to = %to, "Form phase changed");
        }
        self.emit(FormEvent::PhaseChanged { from, to });
    }

    fn emit(&self, event: FormEvent) {
        // No subscribers is fine
        let _ = self.events_tx.send(event);
    }
}

/// Moves the form to `SubmitFailed` if a submit future is dropped mid-post
struct InFlight<'a> {
    controller: &'a mut FormController,
    finished: bool,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            log_submission(&self.controller.title, "abandoned", Some("submit cancelled while posting"));
            self.controller.transition(FormPhase::SubmitFailed);
        }
    }
}

impl fmt::Debug for FormController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormController")
            .field("title", &self.title)
            .field("context", &self.context)
            .field("phase", &self.phase)
            .field("questions", &self.questions.len())
            .finish_non_exhaustive()
    }
}

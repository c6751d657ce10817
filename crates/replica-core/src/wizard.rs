use tracing::{debug, info, warn};

use crate::document::DocumentSet;
use crate::drafter::{DraftBackend, DraftRequest};
use crate::error::{DraftError, GenerateError, ValidationError};
use crate::step::WizardStep;

/// Correlates a generation attempt with its eventual completion. A
/// completion carrying a ticket other than the most recent one is dropped,
/// so late responses from abandoned attempts never touch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationStatus {
    Idle,
    /// A request is outstanding; the generate control stays disabled.
    InProgress,
    /// Last attempt failed; the message is shown on the review step until
    /// superseded by a new attempt.
    Failed(String),
}

/// The wizard controller: owns the step, the document buffers, the focus
/// instruction, and the generation state for one interactive session.
/// Nothing here is persisted or shared.
pub struct Wizard {
    step: WizardStep,
    documents: DocumentSet,
    focus_area: String,
    result: Option<String>,
    status: GenerationStatus,
    next_ticket: u64,
    in_flight: Option<Ticket>,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::InitialPetition,
            documents: DocumentSet::default(),
            focus_area: String::new(),
            result: None,
            status: GenerationStatus::Idle,
            next_ticket: 0,
            in_flight: None,
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn documents(&self) -> &DocumentSet {
        &self.documents
    }

    pub fn documents_mut(&mut self) -> &mut DocumentSet {
        &mut self.documents
    }

    pub fn focus_area(&self) -> &str {
        &self.focus_area
    }

    pub fn set_focus_area(&mut self, focus: String) {
        self.focus_area = focus;
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn status(&self) -> &GenerationStatus {
        &self.status
    }

    pub fn is_generating(&self) -> bool {
        self.status == GenerationStatus::InProgress
    }

    /// Advance to the adjacent forward step, validating the document the
    /// current step requires. A rejected advance changes nothing.
    pub fn advance(&mut self) -> Result<(), ValidationError> {
        match self.step {
            WizardStep::InitialPetition => {
                if self.documents.initial_petition.trim().is_empty() {
                    return Err(ValidationError::EmptyInitialPetition);
                }
            }
            WizardStep::Contestation => {
                if self.documents.contestation1.trim().is_empty() {
                    return Err(ValidationError::EmptyContestation);
                }
            }
            // Review advances only through a successful generation, and
            // Result is terminal; both are no-ops here.
            WizardStep::ReviewAndGenerate | WizardStep::Result => return Ok(()),
        }
        if let Some(next) = self.step.next() {
            debug!(from = ?self.step, to = ?next, "wizard advance");
            self.step = next;
        }
        Ok(())
    }

    /// Move to the adjacent previous step. No validation; a no-op on the
    /// first step.
    pub fn back(&mut self) {
        if let Some(prev) = self.step.back() {
            debug!(from = ?self.step, to = ?prev, "wizard back");
            self.step = prev;
        }
    }

    /// Step-indicator jump: permitted only to steps strictly behind the
    /// current one. Returns whether the jump was applied.
    pub fn jump_to(&mut self, target: WizardStep) -> bool {
        if self.step.can_jump_to(target) {
            debug!(from = ?self.step, to = ?target, "wizard jump");
            self.step = target;
            true
        } else {
            false
        }
    }

    /// Explicit redo from the result step back to review. Documents, focus
    /// instruction, and the previous result are all kept.
    pub fn redo(&mut self) {
        if self.step == WizardStep::Result {
            self.step = WizardStep::ReviewAndGenerate;
        }
    }

    /// Start a generation attempt: requires the review step with no request
    /// outstanding. Clears a previous failure, marks the wizard in
    /// progress, and hands back the correlation ticket plus a snapshot of
    /// the inputs.
    pub fn begin_generation(&mut self) -> Result<(Ticket, DraftRequest), GenerateError> {
        if self.step != WizardStep::ReviewAndGenerate {
            return Err(GenerateError::WrongStep);
        }
        if self.status == GenerationStatus::InProgress {
            return Err(GenerateError::InFlight);
        }
        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight = Some(ticket);
        self.status = GenerationStatus::InProgress;
        info!(ticket = ticket.0, "generation started");
        Ok((
            ticket,
            DraftRequest {
                initial_petition: self.documents.initial_petition.clone(),
                contestation1: self.documents.contestation1.clone(),
                contestation2: self.documents.contestation2.clone(),
                focus_area: self.focus_area.clone(),
            },
        ))
    }

    /// Apply the outcome of a generation attempt. Stale tickets (anything
    /// but the most recent attempt) are ignored outright. Success stores
    /// the draft and moves to the result step; failure records the message
    /// and stays on review so the user can edit and retry.
    pub fn complete_generation(&mut self, ticket: Ticket, outcome: Result<String, DraftError>) {
        if self.in_flight != Some(ticket) {
            warn!(ticket = ticket.0, "dropping stale generation result");
            return;
        }
        self.in_flight = None;
        match outcome {
            Ok(text) => {
                info!(ticket = ticket.0, draft_len = text.len(), "generation succeeded");
                self.result = Some(text);
                self.status = GenerationStatus::Idle;
                self.step = WizardStep::Result;
            }
            Err(e) => {
                warn!(ticket = ticket.0, "generation failed: {e}");
                self.status = GenerationStatus::Failed(e.to_string());
            }
        }
    }

    /// Run one full generation attempt against `backend`, blocking the
    /// caller until it completes. Interactive front ends drive
    /// [`begin_generation`](Self::begin_generation) /
    /// [`complete_generation`](Self::complete_generation) from a spawned
    /// task instead.
    pub async fn generate(&mut self, backend: &dyn DraftBackend) -> Result<(), GenerateError> {
        let (ticket, request) = self.begin_generation()?;
        let outcome = backend.draft(&request).await;
        self.complete_generation(ticket, outcome);
        Ok(())
    }
}

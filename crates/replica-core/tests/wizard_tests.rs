// Controller-level tests for the four-step wizard: validation gating,
// backward navigation, generation status transitions, and request/response
// correlation.

use async_trait::async_trait;
use replica_core::{
    DraftBackend, DraftError, DraftRequest, GenerateError, GenerationStatus, ValidationError,
    Wizard, WizardStep,
};

/// Backend double that answers with a canned outcome and records the
/// requests it saw.
struct FakeBackend {
    outcome: Result<String, DraftError>,
    seen: std::sync::Mutex<Vec<DraftRequest>>,
}

impl FakeBackend {
    fn ok(text: &str) -> Self {
        Self {
            outcome: Ok(text.to_string()),
            seen: std::sync::Mutex::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            outcome: Err(DraftError::Service),
            seen: std::sync::Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl DraftBackend for FakeBackend {
    async fn draft(&self, request: &DraftRequest) -> Result<String, DraftError> {
        self.seen.lock().unwrap().push(request.clone());
        self.outcome.clone()
    }
}

fn wizard_at_review() -> Wizard {
    let mut w = Wizard::new();
    w.documents_mut().initial_petition = "Peticao X".into();
    w.advance().unwrap();
    w.documents_mut().contestation1 = "Defesa Y".into();
    w.advance().unwrap();
    assert_eq!(w.step(), WizardStep::ReviewAndGenerate);
    w
}

// ── Validation gating ─────────────────────────────────────────────────────

#[test]
fn empty_petition_blocks_advance_and_mutates_nothing() {
    let mut w = Wizard::new();
    w.documents_mut().initial_petition = "   \n ".into();
    let docs_before = w.documents().clone();

    assert_eq!(w.advance(), Err(ValidationError::EmptyInitialPetition));
    assert_eq!(w.step(), WizardStep::InitialPetition);
    assert_eq!(w.documents(), &docs_before);
}

#[test]
fn non_empty_petition_advances_exactly_one_step() {
    let mut w = Wizard::new();
    w.documents_mut().initial_petition = "Peticao X".into();

    w.advance().unwrap();
    assert_eq!(w.step(), WizardStep::Contestation);
}

#[test]
fn empty_first_contestation_blocks_advance() {
    let mut w = Wizard::new();
    w.documents_mut().initial_petition = "Peticao X".into();
    w.advance().unwrap();

    assert_eq!(w.advance(), Err(ValidationError::EmptyContestation));
    assert_eq!(w.step(), WizardStep::Contestation);
}

#[test]
fn advance_never_skips_review() {
    let mut w = wizard_at_review();
    // Review has no forward adjacency; Result is reached only by generation.
    w.advance().unwrap();
    assert_eq!(w.step(), WizardStep::ReviewAndGenerate);
}

// ── Navigation ────────────────────────────────────────────────────────────

#[test]
fn back_is_always_allowed_and_keeps_documents() {
    let mut w = wizard_at_review();
    w.back();
    assert_eq!(w.step(), WizardStep::Contestation);
    w.back();
    assert_eq!(w.step(), WizardStep::InitialPetition);
    w.back();
    assert_eq!(w.step(), WizardStep::InitialPetition);
    assert_eq!(w.documents().initial_petition, "Peticao X");
}

#[test]
fn indicator_jumps_only_backward() {
    let mut w = wizard_at_review();
    assert!(!w.jump_to(WizardStep::Result));
    assert!(!w.jump_to(WizardStep::ReviewAndGenerate));
    assert!(w.jump_to(WizardStep::InitialPetition));
    assert_eq!(w.step(), WizardStep::InitialPetition);
    assert!(!w.jump_to(WizardStep::Contestation));
}

// ── Generation ────────────────────────────────────────────────────────────

#[tokio::test]
async fn successful_generation_moves_to_result() {
    let mut w = wizard_at_review();
    let backend = FakeBackend::ok("# Minuta\ntexto");

    w.generate(&backend).await.unwrap();

    assert_eq!(w.step(), WizardStep::Result);
    assert_eq!(w.status(), &GenerationStatus::Idle);
    assert_eq!(w.result(), Some("# Minuta\ntexto"));

    let seen = backend.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].initial_petition, "Peticao X");
    assert_eq!(seen[0].contestation1, "Defesa Y");
}

#[tokio::test]
async fn failed_generation_stays_on_review_with_message() {
    let mut w = wizard_at_review();
    let backend = FakeBackend::failing();

    w.generate(&backend).await.unwrap();

    assert_eq!(w.step(), WizardStep::ReviewAndGenerate);
    assert_eq!(
        w.status(),
        &GenerationStatus::Failed("Falha na comunicação com a IA Jurídica.".into())
    );
    assert_eq!(w.result(), None);
}

#[tokio::test]
async fn retry_after_failure_replaces_status_and_result() {
    let mut w = wizard_at_review();
    w.generate(&FakeBackend::failing()).await.unwrap();
    assert!(matches!(w.status(), GenerationStatus::Failed(_)));

    w.generate(&FakeBackend::ok("segunda tentativa")).await.unwrap();
    assert_eq!(w.status(), &GenerationStatus::Idle);
    assert_eq!(w.result(), Some("segunda tentativa"));
}

#[test]
fn generation_is_refused_outside_review() {
    let mut w = Wizard::new();
    assert_eq!(
        w.begin_generation().map(|_| ()),
        Err(GenerateError::WrongStep)
    );
}

#[test]
fn concurrent_generation_is_refused() {
    let mut w = wizard_at_review();
    let _inflight = w.begin_generation().unwrap();
    assert!(w.is_generating());
    assert_eq!(
        w.begin_generation().map(|_| ()),
        Err(GenerateError::InFlight)
    );
}

#[test]
fn begin_generation_clears_previous_failure() {
    let mut w = wizard_at_review();
    let (t, _) = w.begin_generation().unwrap();
    w.complete_generation(t, Err(DraftError::Service));
    assert!(matches!(w.status(), GenerationStatus::Failed(_)));

    w.begin_generation().unwrap();
    assert_eq!(w.status(), &GenerationStatus::InProgress);
}

#[test]
fn stale_ticket_results_are_dropped() {
    let mut w = wizard_at_review();
    let (first, _) = w.begin_generation().unwrap();
    w.complete_generation(first, Ok("primeira minuta".into()));
    assert_eq!(w.step(), WizardStep::Result);

    w.redo();
    let (_second, _) = w.begin_generation().unwrap();

    // The first attempt's response arrives again (e.g. a late transport
    // callback); it must not complete the second attempt.
    w.complete_generation(first, Ok("resposta atrasada".into()));
    assert_eq!(w.status(), &GenerationStatus::InProgress);
    assert_eq!(w.step(), WizardStep::ReviewAndGenerate);
    assert_eq!(w.result(), Some("primeira minuta"));
}

// ── Redo ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn redo_returns_to_review_without_touching_inputs() {
    let mut w = wizard_at_review();
    w.set_focus_area("prescrição intercorrente".into());
    w.generate(&FakeBackend::ok("minuta")).await.unwrap();
    assert_eq!(w.step(), WizardStep::Result);

    let docs_before = w.documents().clone();
    w.redo();

    assert_eq!(w.step(), WizardStep::ReviewAndGenerate);
    assert_eq!(w.documents(), &docs_before);
    assert_eq!(w.focus_area(), "prescrição intercorrente");
    // Previous draft is kept until a new attempt overwrites it.
    assert_eq!(w.result(), Some("minuta"));
}

#[test]
fn redo_outside_result_is_a_no_op() {
    let mut w = wizard_at_review();
    w.redo();
    assert_eq!(w.step(), WizardStep::ReviewAndGenerate);
}

// ── Step set closure ──────────────────────────────────────────────────────

#[tokio::test]
async fn every_operation_keeps_the_step_in_the_defined_set() {
    let mut w = Wizard::new();
    let backend = FakeBackend::ok("minuta");

    let check = |w: &Wizard| assert!(WizardStep::ALL.contains(&w.step()));

    let _ = w.advance();
    check(&w);
    w.documents_mut().initial_petition = "Peticao X".into();
    w.advance().unwrap();
    check(&w);
    w.back();
    check(&w);
    w.advance().unwrap();
    w.documents_mut().contestation1 = "Defesa Y".into();
    w.advance().unwrap();
    check(&w);
    w.generate(&backend).await.unwrap();
    check(&w);
    w.redo();
    check(&w);
    assert!(w.jump_to(WizardStep::InitialPetition));
    check(&w);
}

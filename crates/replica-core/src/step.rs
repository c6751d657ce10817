use serde::{Deserialize, Serialize};

/// The four stations of the drafting wizard, in order.
///
/// Transitions are an explicit adjacency table (`next` / `back`) rather than
/// arithmetic on an ordinal, so no operation can produce a value outside
/// this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    /// Collects the initial petition (required).
    InitialPetition,
    /// Collects one required and one optional contestation.
    Contestation,
    /// Review summary, focus instruction, and the generate action.
    ReviewAndGenerate,
    /// Displays the generated draft.
    Result,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::InitialPetition,
        WizardStep::Contestation,
        WizardStep::ReviewAndGenerate,
        WizardStep::Result,
    ];

    /// The adjacent forward step. `ReviewAndGenerate` has no forward
    /// adjacency here: reaching `Result` is the generation operation's job.
    pub fn next(self) -> Option<WizardStep> {
        match self {
            WizardStep::InitialPetition => Some(WizardStep::Contestation),
            WizardStep::Contestation => Some(WizardStep::ReviewAndGenerate),
            WizardStep::ReviewAndGenerate | WizardStep::Result => None,
        }
    }

    /// The adjacent backward step, always permitted.
    pub fn back(self) -> Option<WizardStep> {
        match self {
            WizardStep::InitialPetition => None,
            WizardStep::Contestation => Some(WizardStep::InitialPetition),
            WizardStep::ReviewAndGenerate => Some(WizardStep::Contestation),
            WizardStep::Result => Some(WizardStep::ReviewAndGenerate),
        }
    }

    /// Zero-based position for the step indicator.
    pub fn ordinal(self) -> usize {
        match self {
            WizardStep::InitialPetition => 0,
            WizardStep::Contestation => 1,
            WizardStep::ReviewAndGenerate => 2,
            WizardStep::Result => 3,
        }
    }

    /// Whether the indicator may jump from `self` to `target`: only steps
    /// strictly behind the current one, never forward.
    pub fn can_jump_to(self, target: WizardStep) -> bool {
        target.ordinal() < self.ordinal()
    }

    pub fn label(self) -> &'static str {
        match self {
            WizardStep::InitialPetition => "Petição Inicial",
            WizardStep::Contestation => "Contestações",
            WizardStep::ReviewAndGenerate => "Revisão",
            WizardStep::Result => "Resultado",
        }
    }
}

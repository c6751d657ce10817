use thiserror::Error;

/// A required document is empty when leaving its step. Blocks the
/// transition; nothing else changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Por favor, insira o texto da Petição Inicial.")]
    EmptyInitialPetition,
    #[error("Por favor, insira o texto da primeira Contestação.")]
    EmptyContestation,
}

/// A file import that could not be applied. The target buffer is left
/// unchanged in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("Selecione um arquivo .txt.")]
    WrongExtension,
    #[error("Não foi possível ler o arquivo selecionado.")]
    Unreadable,
    #[error("O arquivo selecionado não contém texto legível.")]
    Undecodable,
}

/// The single generic failure kind for the outbound generation call.
/// Provider-specific detail is logged at the call site and deliberately
/// not carried here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Falha na comunicação com a IA Jurídica.")]
    Service,
}

/// Refusals of the generate operation's preconditions. The UI normally
/// prevents both by disabling the control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("a generation request is already in flight")]
    InFlight,
    #[error("generation can only start from the review step")]
    WrongStep,
}

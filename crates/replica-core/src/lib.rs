pub mod config;
pub mod document;
pub mod drafter;
pub mod error;
pub mod prompt;
pub mod step;
pub mod wizard;

pub use drafter::{DraftBackend, DraftRequest};
pub use error::{DraftError, GenerateError, ImportError, ValidationError};
pub use step::WizardStep;
pub use wizard::{GenerationStatus, Ticket, Wizard};

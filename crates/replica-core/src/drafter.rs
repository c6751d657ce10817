use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::DraftError;

/// Snapshot of the four user inputs taken when a generation attempt starts.
/// Later edits do not affect an in-flight request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRequest {
    pub initial_petition: String,
    pub contestation1: String,
    pub contestation2: String,
    pub focus_area: String,
}

impl DraftRequest {
    pub fn has_second_defendant(&self) -> bool {
        !self.contestation2.trim().is_empty()
    }
}

/// The outbound generation service, as seen by the wizard. Implementations
/// issue exactly one request per call and collapse every transport or
/// service failure into [`DraftError::Service`]; a present-but-blank
/// response is mapped to a fixed fallback message, not an error.
///
/// Constructed explicitly and passed in (never module state) so tests can
/// substitute a fake.
#[async_trait]
pub trait DraftBackend: Send + Sync {
    async fn draft(&self, request: &DraftRequest) -> Result<String, DraftError>;
}

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ImportError;

/// Identifies one of the three logical document buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSlot {
    InitialPetition,
    Contestation1,
    Contestation2,
}

impl DocumentSlot {
    pub fn label(self) -> &'static str {
        match self {
            DocumentSlot::InitialPetition => "Petição Inicial",
            DocumentSlot::Contestation1 => "Contestação (Réu 1)",
            DocumentSlot::Contestation2 => "Contestação (Réu 2)",
        }
    }
}

/// The three text buffers collected by the wizard. Created empty, mutated
/// only by direct edits or file import, never cleared automatically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSet {
    pub initial_petition: String,
    pub contestation1: String,
    /// Optional; empty means a single-defendant case.
    pub contestation2: String,
}

impl DocumentSet {
    pub fn get(&self, slot: DocumentSlot) -> &str {
        match slot {
            DocumentSlot::InitialPetition => &self.initial_petition,
            DocumentSlot::Contestation1 => &self.contestation1,
            DocumentSlot::Contestation2 => &self.contestation2,
        }
    }

    pub fn set(&mut self, slot: DocumentSlot, value: String) {
        match slot {
            DocumentSlot::InitialPetition => self.initial_petition = value,
            DocumentSlot::Contestation1 => self.contestation1 = value,
            DocumentSlot::Contestation2 => self.contestation2 = value,
        }
    }

    /// Live character count shown next to each field.
    pub fn char_count(&self, slot: DocumentSlot) -> usize {
        self.get(slot).chars().count()
    }

    pub fn has_second_defendant(&self) -> bool {
        !self.contestation2.trim().is_empty()
    }
}

/// Read a `.txt` file as plain decoded text. The contents replace the
/// target buffer verbatim (no trimming, no transformation); any failure
/// leaves the buffer untouched, so this only returns the text.
pub fn import_txt(path: &Path) -> Result<String, ImportError> {
    let is_txt = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("txt"))
        .unwrap_or(false);
    if !is_txt {
        return Err(ImportError::WrongExtension);
    }
    let bytes = std::fs::read(path).map_err(|_| ImportError::Unreadable)?;
    String::from_utf8(bytes).map_err(|_| ImportError::Undecodable)
}

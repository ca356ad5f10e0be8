//! Edit surface: the single owner of the current label record.

use log::{debug, info, warn};

use crate::rendering::{render, RenderedLabel};
use crate::symbols::EncodedSymbols;
use crate::{FieldValue, LabelField, LabelRecord, RenderConfig, Result};

pub const RESET_PROMPT: &str = "Reset all data to default?";

/// A yes/no gate shown before destructive actions
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Always answers the same way
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&self, _prompt: &str) -> bool {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// The default record is now current
    Restored,
    /// The user said no; nothing changed
    Declined,
}

/// Holds the current [`LabelRecord`] and the symbols encoded for it.
///
/// Every change replaces the record wholesale and bumps the revision. Symbol
/// slots whose source value no longer matches are dropped on each change, so
/// a render never pairs a record with another record's barcode or QR.
#[derive(Debug, Clone)]
pub struct LabelEditor {
    record: LabelRecord,
    revision: u64,
    symbols: EncodedSymbols,
}

impl Default for LabelEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelEditor {
    /// Start from the default record
    pub fn new() -> Self {
        Self::with_record(LabelRecord::default())
    }

    pub fn with_record(record: LabelRecord) -> Self {
        Self {
            record,
            revision: 0,
            symbols: EncodedSymbols::empty(),
        }
    }

    pub fn record(&self) -> &LabelRecord {
        &self.record
    }

    /// Number of changes applied since construction
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn symbols(&self) -> &EncodedSymbols {
        &self.symbols
    }

    /// Replace the record wholesale.
    pub fn update(&mut self, record: LabelRecord) {
        self.record = record;
        self.revision += 1;
        self.symbols.retain_current(&self.record);
        debug!("label revision {}", self.revision);
    }

    /// Replace one field, keeping all others.
    pub fn set_field(&mut self, field: LabelField, value: impl Into<FieldValue>) -> Result<()> {
        let next = self.record.with_field(field, value)?;
        self.update(next);
        Ok(())
    }

    /// Apply a `field=value` assignment
    pub fn assign(&mut self, assignment: &str) -> Result<()> {
        let next = self.record.with_assignment(assignment)?;
        self.update(next);
        Ok(())
    }

    /// Restore the default record if `confirm` agrees.
    pub fn reset(&mut self, confirm: &dyn Confirm) -> ResetOutcome {
        if !confirm.confirm(RESET_PROMPT) {
            debug!("reset declined");
            return ResetOutcome::Declined;
        }
        self.update(LabelRecord::default());
        info!("label reset to defaults");
        ResetOutcome::Restored
    }

    /// Store encoder output, keeping only slots that match the current
    /// record. Returns whether anything was accepted.
    pub fn accept_symbols(&mut self, symbols: EncodedSymbols) -> bool {
        let mut accepted = false;
        match symbols.barcode {
            Some(slot) if slot.source == self.record.resi_number => {
                self.symbols.barcode = Some(slot);
                accepted = true;
            }
            Some(slot) => warn!("discarding stale barcode for {:?}", slot.source),
            None => {}
        }
        match symbols.qr {
            Some(slot) if slot.source == self.record.order_id => {
                self.symbols.qr = Some(slot);
                accepted = true;
            }
            Some(slot) => warn!("discarding stale qr for {:?}", slot.source),
            None => {}
        }
        accepted
    }

    /// Render the current record, encoding any symbol not yet resolved for
    /// its value and `config.symbols`.
    pub fn render(&mut self, config: &RenderConfig) -> RenderedLabel {
        if !self.symbols.is_current_for(&self.record, &config.symbols) {
            self.symbols = self.symbols.refreshed(&self.record, &config.symbols);
        }
        render(&self.record, &self.symbols, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_field_bumps_revision() {
        let mut editor = LabelEditor::new();
        editor.set_field(LabelField::Weight, "1 kg").unwrap();
        assert_eq!(editor.revision(), 1);
        assert_eq!(editor.record().weight, "1 kg");
    }

    #[test]
    fn type_mismatch_leaves_record_alone() {
        let mut editor = LabelEditor::new();
        assert!(editor.set_field(LabelField::IsCashless, "maybe").is_err());
        assert_eq!(editor.revision(), 0);
        assert_eq!(editor.record(), &LabelRecord::default());
    }

    #[test]
    fn reset_prompt_text() {
        let mut editor = LabelEditor::new();
        let asked = std::cell::RefCell::new(String::new());
        let outcome = editor.reset(&|p: &str| {
            *asked.borrow_mut() = p.to_string();
            false
        });
        assert_eq!(outcome, ResetOutcome::Declined);
        assert_eq!(asked.borrow().as_str(), "Reset all data to default?");
    }

    #[test]
    fn edit_drops_only_the_stale_slot() {
        let mut editor = LabelEditor::new();
        editor.render(&RenderConfig::default());
        assert!(editor
            .symbols()
            .is_current_for(editor.record(), &Default::default()));

        editor.set_field(LabelField::OrderId, "ORDER2").unwrap();
        assert!(editor.symbols().qr.is_none());
        assert!(editor.symbols().barcode.is_some());
    }
}

//! Symbol encoders: Code 128 for the tracking number, QR for the order id.
//!
//! Both encoders are pure functions of their input string and options. Results
//! are collected in [`EncodedSymbols`], keyed by the value and options they
//! were encoded with, so a render never shows a symbol for a value the record
//! no longer holds or at a size the config no longer asks for.

pub mod barcode;
pub mod qr;
pub mod worker;

pub use barcode::{encode_barcode, Bar, BarcodeImage, BarcodeOptions};
pub use qr::{encode_qr, QrImage, QrOptions, QrSize};
pub use worker::SymbolWorker;

use log::{debug, warn};

use crate::{LabelRecord, Result};

/// Encoder configuration shared by the sync and async paths
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SymbolOptions {
    pub barcode: BarcodeOptions,
    pub qr: QrOptions,
}

/// Outcome of encoding one source value with one set of options.
///
/// `image` is `None` both for empty input and for a failed encode; either way
/// the region renders blank.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolSlot<T, O> {
    pub source: String,
    pub options: O,
    pub image: Option<T>,
}

pub type BarcodeSlot = SymbolSlot<BarcodeImage, BarcodeOptions>;
pub type QrSlot = SymbolSlot<QrImage, QrOptions>;

impl<T, O: PartialEq + Copy> SymbolSlot<T, O> {
    fn resolve(source: &str, options: &O, result: Result<Option<T>>) -> Self {
        let image = match result {
            Ok(image) => image,
            Err(e) => {
                warn!("{} (value {:?}); leaving region blank", e, source);
                None
            }
        };
        Self {
            source: source.to_string(),
            options: *options,
            image,
        }
    }

    fn matches(&self, value: &str) -> bool {
        self.source == value
    }

    /// Encoded from `value` with exactly `options`
    pub fn is_for(&self, value: &str, options: &O) -> bool {
        self.matches(value) && self.options == *options
    }
}

/// Encoder output for one label. Each slot is independently optional until
/// resolved.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EncodedSymbols {
    pub barcode: Option<BarcodeSlot>,
    pub qr: Option<QrSlot>,
}

impl EncodedSymbols {
    /// No slot resolved yet
    pub fn empty() -> Self {
        Self::default()
    }

    /// Encode both symbols for `record` synchronously. Failures are logged and
    /// produce blank slots.
    pub fn encode(record: &LabelRecord, options: &SymbolOptions) -> Self {
        Self {
            barcode: Some(barcode_slot(&record.resi_number, &options.barcode)),
            qr: Some(qr_slot(&record.order_id, &options.qr)),
        }
    }

    /// Encode whichever slots are missing or stale for `record` and
    /// `options`, keeping the ones that still match both.
    pub fn refreshed(&self, record: &LabelRecord, options: &SymbolOptions) -> Self {
        let barcode = match &self.barcode {
            Some(slot) if slot.is_for(&record.resi_number, &options.barcode) => slot.clone(),
            _ => barcode_slot(&record.resi_number, &options.barcode),
        };
        let qr = match &self.qr {
            Some(slot) if slot.is_for(&record.order_id, &options.qr) => slot.clone(),
            _ => qr_slot(&record.order_id, &options.qr),
        };
        Self {
            barcode: Some(barcode),
            qr: Some(qr),
        }
    }

    /// Both slots resolved for the record's current values with `options`
    pub fn is_current_for(&self, record: &LabelRecord, options: &SymbolOptions) -> bool {
        self.barcode
            .as_ref()
            .is_some_and(|s| s.is_for(&record.resi_number, &options.barcode))
            && self
                .qr
                .as_ref()
                .is_some_and(|s| s.is_for(&record.order_id, &options.qr))
    }

    /// Barcode for the record's current tracking number, if any
    pub fn barcode_for(&self, record: &LabelRecord) -> Option<&BarcodeImage> {
        self.barcode
            .as_ref()
            .filter(|s| s.matches(&record.resi_number))
            .and_then(|s| s.image.as_ref())
    }

    /// QR for the record's current order id, if any
    pub fn qr_for(&self, record: &LabelRecord) -> Option<&QrImage> {
        self.qr
            .as_ref()
            .filter(|s| s.matches(&record.order_id))
            .and_then(|s| s.image.as_ref())
    }

    /// Drop slots whose source no longer matches `record`
    pub fn retain_current(&mut self, record: &LabelRecord) {
        if self.barcode.as_ref().is_some_and(|s| !s.matches(&record.resi_number)) {
            debug!("dropping stale barcode slot");
            self.barcode = None;
        }
        if self.qr.as_ref().is_some_and(|s| !s.matches(&record.order_id)) {
            debug!("dropping stale qr slot");
            self.qr = None;
        }
    }
}

pub(crate) fn barcode_slot(value: &str, options: &BarcodeOptions) -> BarcodeSlot {
    SymbolSlot::resolve(value, options, encode_barcode(value, options))
}

pub(crate) fn qr_slot(value: &str, options: &QrOptions) -> QrSlot {
    SymbolSlot::resolve(value, options, encode_qr(value, options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LabelField;

    #[test]
    fn encode_resolves_both_slots() {
        let record = LabelRecord::default();
        let symbols = EncodedSymbols::encode(&record, &SymbolOptions::default());
        assert!(symbols.is_current_for(&record, &SymbolOptions::default()));
        assert!(symbols.barcode_for(&record).is_some());
        assert!(symbols.qr_for(&record).is_some());
    }

    #[test]
    fn failed_barcode_leaves_qr_intact() {
        let record = LabelRecord::default()
            .with_field(LabelField::ResiNumber, "RESI\u{00e9}")
            .unwrap();
        let symbols = EncodedSymbols::encode(&record, &SymbolOptions::default());
        assert!(symbols.is_current_for(&record, &SymbolOptions::default()));
        assert!(symbols.barcode_for(&record).is_none());
        assert!(symbols.qr_for(&record).is_some());
    }

    #[test]
    fn slots_for_old_values_are_not_served() {
        let record = LabelRecord::default();
        let symbols = EncodedSymbols::encode(&record, &SymbolOptions::default());
        let edited = record.with_field(LabelField::OrderId, "NEWORDER1").unwrap();
        assert!(!symbols.is_current_for(&edited, &SymbolOptions::default()));
        assert!(symbols.qr_for(&edited).is_none());
        // the barcode source did not change
        assert!(symbols.barcode_for(&edited).is_some());

        let refreshed = symbols.refreshed(&edited, &SymbolOptions::default());
        assert_eq!(refreshed.qr_for(&edited).unwrap().source(), "NEWORDER1");
        assert_eq!(refreshed.barcode, symbols.barcode);
    }

    #[test]
    fn changed_options_reencode_only_that_symbol() {
        let record = LabelRecord::default();
        let symbols = EncodedSymbols::encode(&record, &SymbolOptions::default());
        let compact = SymbolOptions {
            qr: QrOptions {
                size: QrSize::Compact,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(!symbols.is_current_for(&record, &compact));

        let refreshed = symbols.refreshed(&record, &compact);
        assert!(refreshed.is_current_for(&record, &compact));
        assert_eq!(refreshed.qr_for(&record).unwrap().size_px(), 50);
        assert_eq!(refreshed.barcode, symbols.barcode);
    }
}

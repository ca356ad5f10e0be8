//! Code 128 barcode for the tracking number.
//!
//! The symbol carries no human-readable line and no quiet zone; the label
//! layout supplies the surrounding white space.

use barcoders::sym::code128::Code128;
use log::debug;

use crate::error::SymbolKind;
use crate::{Error, Result};

// barcoders selects/switches code sets through these marker characters.
const SET_A: char = '\u{00C0}';
const SET_B: char = '\u{0181}';
const SET_C: char = '\u{0106}';
// barcoders spells DEL (set B value 95) as this character.
const SET_B_DEL: char = '\u{00F7}';

/// Rendering parameters for the barcode. These never depend on the data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarcodeOptions {
    /// Width of one module (narrowest bar) in CSS px before fitting
    pub module_width: f32,
    /// Bar height in CSS px
    pub bar_height: f32,
}

impl Default for BarcodeOptions {
    fn default() -> Self {
        Self {
            module_width: 1.4,
            bar_height: 32.0,
        }
    }
}

/// A single dark bar, in module units from the left edge of the symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bar {
    pub start: usize,
    pub width: usize,
}

/// An encoded Code 128 symbol
#[derive(Debug, Clone, PartialEq)]
pub struct BarcodeImage {
    source: String,
    modules: Vec<u8>,
    options: BarcodeOptions,
}

impl BarcodeImage {
    /// The text this symbol encodes
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Module pattern, `1` = bar, `0` = space
    pub fn modules(&self) -> &[u8] {
        &self.modules
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    pub fn options(&self) -> BarcodeOptions {
        self.options
    }

    /// Width at the configured module width
    pub fn natural_width(&self) -> f32 {
        self.modules.len() as f32 * self.options.module_width
    }

    /// Runs of dark modules, left to right
    pub fn bars(&self) -> Vec<Bar> {
        let mut bars = Vec::new();
        let mut i = 0;
        while i < self.modules.len() {
            if self.modules[i] == 1 {
                let start = i;
                while i < self.modules.len() && self.modules[i] == 1 {
                    i += 1;
                }
                bars.push(Bar {
                    start,
                    width: i - start,
                });
            } else {
                i += 1;
            }
        }
        bars
    }
}

/// Encode a tracking number as Code 128.
///
/// Empty input yields `Ok(None)`. Any ASCII character is encodable; anything
/// else is an [`Error::EncodingError`].
pub fn encode_barcode(value: &str, options: &BarcodeOptions) -> Result<Option<BarcodeImage>> {
    if value.is_empty() {
        return Ok(None);
    }
    if let Some(bad) = value.chars().find(|c| !c.is_ascii()) {
        return Err(Error::EncodingError {
            symbol: SymbolKind::Barcode,
            reason: format!("character {:?} is not encodable", bad),
        });
    }

    let data = with_code_sets(value);
    debug!("code128 data for {:?}: {:?}", value, data);
    let symbol = Code128::new(&data).map_err(|e| Error::EncodingError {
        symbol: SymbolKind::Barcode,
        reason: e.to_string(),
    })?;

    let mut modules = symbol.encode();
    // Strip any quiet zone the encoder adds
    while modules.last() == Some(&0) {
        modules.pop();
    }
    let lead = modules.iter().take_while(|&&m| m == 0).count();
    modules.drain(..lead);

    Ok(Some(BarcodeImage {
        source: value.to_string(),
        modules,
        options: *options,
    }))
}

/// Prefix code-set markers: set B for text, set A for control characters,
/// set C for digit runs long enough to pay for the switch (4 at either end of
/// the data, 6 in the middle).
fn with_code_sets(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len() + 4);
    let mut current = None;
    let mut i = 0;

    while i < chars.len() {
        let run = chars[i..].iter().take_while(|c| c.is_ascii_digit()).count();
        let touches_edge = i == 0 || i + run == chars.len();
        let threshold = if touches_edge { 4 } else { 6 };

        if run >= threshold {
            let mut run = run;
            if run % 2 == 1 {
                switch_to(&mut out, &mut current, SET_B);
                out.push(chars[i]);
                i += 1;
                run -= 1;
            }
            switch_to(&mut out, &mut current, SET_C);
            out.extend(&chars[i..i + run]);
            i += run;
        } else if run > 0 {
            let set = if current == Some(SET_A) { SET_A } else { SET_B };
            switch_to(&mut out, &mut current, set);
            out.extend(&chars[i..i + run]);
            i += run;
        } else {
            let c = chars[i];
            let set = match c {
                '\u{00}'..='\u{1F}' => SET_A,
                // upper case and punctuation exist in both A and B
                ' '..='_' if current == Some(SET_A) => SET_A,
                _ => SET_B,
            };
            switch_to(&mut out, &mut current, set);
            out.push(if c == '\u{7F}' { SET_B_DEL } else { c });
            i += 1;
        }
    }
    out
}

fn switch_to(out: &mut String, current: &mut Option<char>, set: char) {
    if *current != Some(set) {
        out.push(set);
        *current = Some(set);
    }
}

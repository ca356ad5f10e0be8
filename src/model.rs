//! Label data model: the record behind every rendered label.
//!
//! A [`LabelRecord`] is always fully populated. Edits never mutate a record in
//! place; [`LabelRecord::with_field`] returns a new record with one field
//! replaced and everything else copied.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The complete set of editable shipping-label fields at a point in time.
///
/// Serialized with camelCase keys; fields missing from an input document take
/// their default values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LabelRecord {
    /// Facility/area code shown large in the main code box
    pub main_code: String,
    /// Sub-hub routing code
    pub hub_sub_code: String,
    /// Tracking number; barcode source and border trim text
    pub resi_number: String,
    /// Service tier (ECO, STD, ...)
    pub service_type: String,
    pub recipient_name: String,
    pub recipient_phone: String,
    /// Free-form, may span several lines
    pub recipient_address: String,
    pub sender_name: String,
    pub sender_phone: String,
    pub sender_city: String,
    pub district: String,
    pub sub_district: String,
    pub village: String,
    pub weight: String,
    /// Order identifier; QR source
    pub order_id: String,
    /// "Verify before cash on delivery" flag text
    pub cod_cek_dulu: String,
    /// Delivery deadline text
    pub batas_kirim: String,
    pub is_cashless: bool,
    /// Background watermark token
    pub watermark: String,
}

impl Default for LabelRecord {
    fn default() -> Self {
        Self {
            main_code: "U - 46\"".to_string(),
            hub_sub_code: "TOM2-MH-11".to_string(),
            resi_number: "SPXID064356436531".to_string(),
            service_type: "ECO".to_string(),
            recipient_name: "Risna".to_string(),
            recipient_phone: "081234567890".to_string(),
            recipient_address: "Mesjid Babul Jannah, Jalan Dusun Suggumanai, Biringbulu, BIRINGBULU, KAB. GOWA, SULAWESI SELATAN".to_string(),
            sender_name: "Kiara Jewelry".to_string(),
            sender_phone: "6289692134050".to_string(),
            sender_city: "KOTA SURABAYA".to_string(),
            district: "KAB. GOWA".to_string(),
            sub_district: "BIRINGBULU".to_string(),
            village: "Parangloe".to_string(),
            weight: "6 gr".to_string(),
            order_id: "2601179M0WA1WA".to_string(),
            cod_cek_dulu: "Ya".to_string(),
            batas_kirim: "19-01-2026".to_string(),
            is_cashless: true,
            watermark: "COD".to_string(),
        }
    }
}

/// Field identifiers, named as they appear in JSON and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelField {
    MainCode,
    HubSubCode,
    ResiNumber,
    ServiceType,
    RecipientName,
    RecipientPhone,
    RecipientAddress,
    SenderName,
    SenderPhone,
    SenderCity,
    District,
    SubDistrict,
    Village,
    Weight,
    OrderId,
    CodCekDulu,
    BatasKirim,
    IsCashless,
    Watermark,
}

/// Shape constraint of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Unconstrained free-form text
    Text,
    /// Boolean flag
    Flag,
}

impl LabelField {
    pub const ALL: [LabelField; 19] = [
        LabelField::MainCode,
        LabelField::HubSubCode,
        LabelField::ResiNumber,
        LabelField::ServiceType,
        LabelField::RecipientName,
        LabelField::RecipientPhone,
        LabelField::RecipientAddress,
        LabelField::SenderName,
        LabelField::SenderPhone,
        LabelField::SenderCity,
        LabelField::District,
        LabelField::SubDistrict,
        LabelField::Village,
        LabelField::Weight,
        LabelField::OrderId,
        LabelField::CodCekDulu,
        LabelField::BatasKirim,
        LabelField::IsCashless,
        LabelField::Watermark,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LabelField::MainCode => "mainCode",
            LabelField::HubSubCode => "hubSubCode",
            LabelField::ResiNumber => "resiNumber",
            LabelField::ServiceType => "serviceType",
            LabelField::RecipientName => "recipientName",
            LabelField::RecipientPhone => "recipientPhone",
            LabelField::RecipientAddress => "recipientAddress",
            LabelField::SenderName => "senderName",
            LabelField::SenderPhone => "senderPhone",
            LabelField::SenderCity => "senderCity",
            LabelField::District => "district",
            LabelField::SubDistrict => "subDistrict",
            LabelField::Village => "village",
            LabelField::Weight => "weight",
            LabelField::OrderId => "orderId",
            LabelField::CodCekDulu => "codCekDulu",
            LabelField::BatasKirim => "batasKirim",
            LabelField::IsCashless => "isCashless",
            LabelField::Watermark => "watermark",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            LabelField::IsCashless => FieldKind::Flag,
            _ => FieldKind::Text,
        }
    }
}

impl fmt::Display for LabelField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LabelField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        LabelField::ALL
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownField(s.to_string()))
    }
}

/// Value held by a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
}

impl FieldValue {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Flag(_) => FieldKind::Flag,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Flag(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Flag(b)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "ya" => Some(true),
        "false" | "no" | "n" | "0" | "tidak" => Some(false),
        _ => None,
    }
}

impl LabelRecord {
    /// Read a single field
    pub fn get(&self, field: LabelField) -> FieldValue {
        let text = match field {
            LabelField::IsCashless => return FieldValue::Flag(self.is_cashless),
            LabelField::MainCode => &self.main_code,
            LabelField::HubSubCode => &self.hub_sub_code,
            LabelField::ResiNumber => &self.resi_number,
            LabelField::ServiceType => &self.service_type,
            LabelField::RecipientName => &self.recipient_name,
            LabelField::RecipientPhone => &self.recipient_phone,
            LabelField::RecipientAddress => &self.recipient_address,
            LabelField::SenderName => &self.sender_name,
            LabelField::SenderPhone => &self.sender_phone,
            LabelField::SenderCity => &self.sender_city,
            LabelField::District => &self.district,
            LabelField::SubDistrict => &self.sub_district,
            LabelField::Village => &self.village,
            LabelField::Weight => &self.weight,
            LabelField::OrderId => &self.order_id,
            LabelField::CodCekDulu => &self.cod_cek_dulu,
            LabelField::BatasKirim => &self.batas_kirim,
            LabelField::Watermark => &self.watermark,
        };
        FieldValue::Text(text.clone())
    }

    /// Return a new record with `field` replaced; every other field is copied.
    pub fn with_field(&self, field: LabelField, value: impl Into<FieldValue>) -> Result<Self> {
        let value = value.into();
        let mut next = self.clone();
        match value {
            FieldValue::Flag(b) if field == LabelField::IsCashless => next.is_cashless = b,
            FieldValue::Flag(_) => {
                return Err(Error::FieldTypeError {
                    field: field.name(),
                    expected: "text",
                })
            }
            FieldValue::Text(s) => match next.text_slot(field) {
                Some(slot) => *slot = s,
                None => {
                    return Err(Error::FieldTypeError {
                        field: field.name(),
                        expected: "boolean",
                    })
                }
            },
        }
        Ok(next)
    }

    /// Apply a `field=value` assignment as typed on the command line.
    ///
    /// Only the first `=` separates name from value, so values may contain `=`.
    pub fn with_assignment(&self, assignment: &str) -> Result<Self> {
        let (name, raw) = assignment
            .split_once('=')
            .ok_or_else(|| Error::InvalidAssignment(assignment.to_string()))?;
        let field: LabelField = name.parse()?;
        let value = match field.kind() {
            FieldKind::Text => FieldValue::Text(raw.replace("\\n", "\n")),
            FieldKind::Flag => FieldValue::Flag(
                parse_flag(raw).ok_or_else(|| Error::InvalidAssignment(assignment.to_string()))?,
            ),
        };
        self.with_field(field, value)
    }

    fn text_slot(&mut self, field: LabelField) -> Option<&mut String> {
        let slot = match field {
            LabelField::MainCode => &mut self.main_code,
            LabelField::HubSubCode => &mut self.hub_sub_code,
            LabelField::ResiNumber => &mut self.resi_number,
            LabelField::ServiceType => &mut self.service_type,
            LabelField::RecipientName => &mut self.recipient_name,
            LabelField::RecipientPhone => &mut self.recipient_phone,
            LabelField::RecipientAddress => &mut self.recipient_address,
            LabelField::SenderName => &mut self.sender_name,
            LabelField::SenderPhone => &mut self.sender_phone,
            LabelField::SenderCity => &mut self.sender_city,
            LabelField::District => &mut self.district,
            LabelField::SubDistrict => &mut self.sub_district,
            LabelField::Village => &mut self.village,
            LabelField::Weight => &mut self.weight,
            LabelField::OrderId => &mut self.order_id,
            LabelField::CodCekDulu => &mut self.cod_cek_dulu,
            LabelField::BatasKirim => &mut self.batas_kirim,
            LabelField::Watermark => &mut self.watermark,
            LabelField::IsCashless => return None,
        };
        Some(slot)
    }
}

// src/claims/evidence.rs
//! Ownership evidence attached to a claim.
//!
//! The questions a claimant must answer depend on the found item's type.
//! Each variant holds exactly the answers for its type and is stored as a
//! camelCase JSON object; keys a client sends beyond those are dropped.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::common::{ItemType, ValidationResult};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MobileEvidence {
    pub imei: String,
    pub sim_name: String,
    pub sim_number: String,
    pub frequent_number1: String,
    pub frequent_number2: String,
    pub model: String,
    pub last_location: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LaptopEvidence {
    pub serial_number: String,
    pub recent_website: String,
    pub signed_up_email: String,
    pub model: String,
    pub installed_apps: String,
    pub last_location: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SmartWatchEvidence {
    pub brand: String,
    pub model: String,
    pub watch_serial_imei: String,
    pub color: String,
    pub unique_features: String,
    pub last_location: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneralEvidence {
    pub unique_features: String,
    pub purchase_date: String,
    pub last_location: String,
    pub serial_number: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ClaimEvidence {
    /// Phones and tablets
    Mobile(MobileEvidence),
    Laptop(LaptopEvidence),
    SmartWatch(SmartWatchEvidence),
    /// ID cards and everything else
    General(GeneralEvidence),
}

/// JSON keys a claimant must answer for `item_type`
pub fn required_fields(item_type: ItemType) -> &'static [&'static str] {
    match item_type {
        ItemType::Phone | ItemType::Tablet => &[
            "imei",
            "simName",
            "simNumber",
            "frequentNumber1",
            "frequentNumber2",
            "model",
            "lastLocation",
        ],
        ItemType::Laptop => &[
            "serialNumber",
            "recentWebsite",
            "signedUpEmail",
            "model",
            "installedApps",
            "lastLocation",
        ],
        ItemType::SmartWatch => &[
            "brand",
            "model",
            "watchSerialImei",
            "color",
            "uniqueFeatures",
            "lastLocation",
        ],
        ItemType::IdCard | ItemType::Other => {
            &["uniqueFeatures", "purchaseDate", "lastLocation", "serialNumber"]
        }
    }
}

/// Pulls required answers out of a JSON object, recording each missing one
struct Answers<'a> {
    object: &'a Map<String, Value>,
    result: ValidationResult,
}

impl<'a> Answers<'a> {
    fn take(&mut self, key: &str) -> String {
        let value = match self.object.get(key) {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        };
        if value.is_empty() {
            self.result
                .add_error(&format!("extra_info.{}", key), &format!("{} is required", key));
        }
        value
    }
}

impl ClaimEvidence {
    /// Parses the `extra_info` form field for a claim on an item of `item_type`.
    /// Every failing field is reported.
    pub fn parse(item_type: ItemType, raw: &str) -> Result<Self, ValidationResult> {
        let value: Value = serde_json::from_str(raw.trim()).map_err(|_| {
            let mut result = ValidationResult::new();
            result.add_error("extra_info", "Extra information must be a JSON object");
            result
        })?;
        Self::from_value(item_type, &value)
    }

    pub fn from_value(item_type: ItemType, value: &Value) -> Result<Self, ValidationResult> {
        let object = value.as_object().ok_or_else(|| {
            let mut result = ValidationResult::new();
            result.add_error("extra_info", "Extra information must be a JSON object");
            result
        })?;

        let mut answers = Answers {
            object,
            result: ValidationResult::new(),
        };

        let evidence = match item_type {
            ItemType::Phone | ItemType::Tablet => ClaimEvidence::Mobile(MobileEvidence {
                imei: answers.take("imei"),
                sim_name: answers.take("simName"),
                sim_number: answers.take("simNumber"),
                frequent_number1: answers.take("frequentNumber1"),
                frequent_number2: answers.take("frequentNumber2"),
                model: answers.take("model"),
                last_location: answers.take("lastLocation"),
            }),
            ItemType::Laptop => ClaimEvidence::Laptop(LaptopEvidence {
                serial_number: answers.take("serialNumber"),
                recent_website: answers.take("recentWebsite"),
                signed_up_email: answers.take("signedUpEmail"),
                model: answers.take("model"),
                installed_apps: answers.take("installedApps"),
                last_location: answers.take("lastLocation"),
            }),
            ItemType::SmartWatch => ClaimEvidence::SmartWatch(SmartWatchEvidence {
                brand: answers.take("brand"),
                model: answers.take("model"),
                watch_serial_imei: answers.take("watchSerialImei"),
                color: answers.take("color"),
                unique_features: answers.take("uniqueFeatures"),
                last_location: answers.take("lastLocation"),
            }),
            ItemType::IdCard | ItemType::Other => ClaimEvidence::General(GeneralEvidence {
                unique_features: answers.take("uniqueFeatures"),
                purchase_date: answers.take("purchaseDate"),
                last_location: answers.take("lastLocation"),
                serial_number: answers.take("serialNumber"),
            }),
        };

        if answers.result.is_valid {
            Ok(evidence)
        } else {
            Err(answers.result)
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

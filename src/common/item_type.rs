// Item categories shared by found items, lost items and claims

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(sqlx::Type, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    #[sqlx(rename = "Phone")]
    #[serde(rename = "Phone")]
    Phone,
    #[sqlx(rename = "Laptop")]
    #[serde(rename = "Laptop")]
    Laptop,
    #[sqlx(rename = "Tablet")]
    #[serde(rename = "Tablet")]
    Tablet,
    #[sqlx(rename = "Smart watch")]
    #[serde(rename = "Smart watch")]
    SmartWatch,
    #[sqlx(rename = "ID card")]
    #[serde(rename = "ID card")]
    IdCard,
    #[sqlx(rename = "Other")]
    #[serde(rename = "Other")]
    Other,
}

impl ItemType {
    pub const ALL: [ItemType; 6] = [
        ItemType::Phone,
        ItemType::Laptop,
        ItemType::Tablet,
        ItemType::SmartWatch,
        ItemType::IdCard,
        ItemType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Phone => "Phone",
            ItemType::Laptop => "Laptop",
            ItemType::Tablet => "Tablet",
            ItemType::SmartWatch => "Smart watch",
            ItemType::IdCard => "ID card",
            ItemType::Other => "Other",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = String;

    /// Case-insensitive match on the display label
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ItemType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                format!(
                    "Unknown item type '{}'. Expected one of: Phone, Laptop, Tablet, Smart watch, ID card, Other",
                    wanted
                )
            })
    }
}

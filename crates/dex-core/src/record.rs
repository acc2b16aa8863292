use serde::{Deserialize, Serialize};

use crate::fields;

/// One creature document as imported from the dataset.
///
/// Every field is kept as the dataset's string: stats are numeric strings and
/// `is_legendary` is `"True"`/`"False"`. Missing fields decode as empty
/// strings; unknown fields (the store's `_id`, egg groups) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Pokemon {
    pub dex_number: String,
    pub name: String,
    #[serde(rename = "type_01")]
    pub primary_type: String,
    #[serde(rename = "type_02")]
    pub secondary_type: String,
    #[serde(rename = "ability_01")]
    pub primary_ability: String,
    #[serde(rename = "ability_02")]
    pub secondary_ability: String,
    pub hidden_ability: String,
    #[serde(rename = "is_legendary")]
    pub legendary: String,
    pub bio: String,
    pub hp: String,
    pub attack: String,
    pub defense: String,
    pub sp_attack: String,
    pub sp_defense: String,
    pub speed: String,
}

impl Pokemon {
    pub fn is_legendary(&self) -> bool {
        self.legendary == fields::LEGENDARY_TRUE
    }

    /// The second type, or `None` for single-typed creatures.
    pub fn secondary_type(&self) -> Option<&str> {
        (!self.secondary_type.is_empty()).then_some(self.secondary_type.as_str())
    }
}

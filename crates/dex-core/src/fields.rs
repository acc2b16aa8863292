//! Stored field names and literal values of the dataset.

pub const DEX_NUMBER: &str = "dex_number";
pub const NAME: &str = "name";
pub const PRIMARY_TYPE: &str = "type_01";
pub const SECONDARY_TYPE: &str = "type_02";
pub const IS_LEGENDARY: &str = "is_legendary";

/// `is_legendary` is stored as a string, not a boolean.
pub const LEGENDARY_TRUE: &str = "True";
pub const LEGENDARY_FALSE: &str = "False";

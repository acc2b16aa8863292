use std::fmt;

use crate::error::DexError;

/// Widest numeric id the dataset's key format can express.
const MAX_DIGITS: usize = 3;

/// A dataset key of the form `#` + three zero-padded digits, e.g. `#007`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DexNumber(String);

impl DexNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DexNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<DexNumber> for String {
    fn from(n: DexNumber) -> Self {
        n.0
    }
}

/// Resolve a decimal id such as `"7"` into its dex number `#007`.
///
/// Leading zeros are not significant (`"007"` is `#007`). Anything other
/// than plain ASCII digits, or more than three significant digits, is an
/// `InvalidArgument`.
pub fn resolve_identifier(input: &str) -> Result<DexNumber, DexError> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DexError::InvalidArgument(format!(
            "{input:?} is not a non-negative integer"
        )));
    }

    let significant = input.trim_start_matches('0');
    if significant.len() > MAX_DIGITS {
        return Err(DexError::InvalidArgument(format!(
            "{input:?} exceeds {MAX_DIGITS} digits"
        )));
    }

    let value: u16 = if significant.is_empty() {
        0
    } else {
        significant
            .parse()
            .map_err(|e| DexError::InvalidArgument(format!("{input:?}: {e}")))?
    };

    Ok(DexNumber(format!("#{value:0width$}", width = MAX_DIGITS)))
}

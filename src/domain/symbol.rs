//! Compact asset / pool symbol codes.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AmmError;

/// Maximum symbol length in characters.
const MAX_LEN: usize = 7;

/// A short uppercase asset or pool identifier, packed into a `u64`.
///
/// Symbols are 1–7 characters drawn from `A`–`Z`, stored one byte per
/// character. The packed representation is `Ord`/`Hash`-friendly and
/// doubles as a table key; serde round-trips through the string form.
///
/// Pools are identified by a `SymbolCode` as well: the pool id is also
/// the symbol of its liquidity-share asset.
///
/// # Examples
///
/// ```
/// use stableswap_amm::domain::SymbolCode;
///
/// let usdt: SymbolCode = "USDT".parse().expect("valid symbol");
/// assert_eq!(usdt.to_string(), "USDT");
/// assert!(usdt.raw() > 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SymbolCode(u64);

impl SymbolCode {
    /// Creates a symbol code from its string form.
    ///
    /// # Errors
    ///
    /// Returns [`AmmError::InvalidSymbol`] if the input is empty, longer
    /// than 7 characters, or contains anything but `A`–`Z`.
    pub fn new(text: &str) -> Result<Self, AmmError> {
        let bytes = text.as_bytes();
        if bytes.is_empty() {
            return Err(AmmError::InvalidSymbol("symbol must not be empty"));
        }
        if bytes.len() > MAX_LEN {
            return Err(AmmError::InvalidSymbol("symbol exceeds 7 characters"));
        }
        let mut raw = 0u64;
        let mut i = bytes.len();
        while i > 0 {
            i -= 1;
            let c = bytes[i];
            if !c.is_ascii_uppercase() {
                return Err(AmmError::InvalidSymbol("symbol must be A-Z only"));
            }
            raw = (raw << 8) | c as u64;
        }
        Ok(Self(raw))
    }

    /// Returns the packed representation.
    #[must_use]
    pub const fn raw(&self) -> u64 {
        self.0
    }

    /// Length of the symbol in characters.
    #[must_use]
    pub const fn len(&self) -> usize {
        let mut raw = self.0;
        let mut n = 0;
        while raw > 0 {
            n += 1;
            raw >>= 8;
        }
        n
    }

    /// Returns `true` if the symbol is the empty (invalid) code.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for SymbolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut raw = self.0;
        while raw > 0 {
            let c = (raw & 0xFF) as u8;
            write!(f, "{}", c as char)?;
            raw >>= 8;
        }
        Ok(())
    }
}

impl FromStr for SymbolCode {
    type Err = AmmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl From<SymbolCode> for String {
    fn from(code: SymbolCode) -> Self {
        code.to_string()
    }
}

impl TryFrom<String> for SymbolCode {
    type Error = AmmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

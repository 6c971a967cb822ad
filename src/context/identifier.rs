use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::str::FromStr;

use rand::random;
use serde::Serialize;
use serde::Serializer;

use super::super::Error;
use super::super::Result;


/// How an `Identifier` came to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    /// Generated locally by this process.
    Generated,

    /// Parsed from an external representation, usually a B3 header.
    Imported,
}


/// A Zipkin trace or span identifier.
///
/// Span and parent identifiers are 64 bits wide and render as 16 lowercase
/// hex characters. Trace identifiers may also be 128 bits wide, in which case
/// they render as 32 lowercase hex characters.
///
/// Identifiers compare and hash by numeric value and width: a 64-bit id and
/// the 128-bit id with the same value render differently and are not equal.
/// Whether an id was generated or imported does not matter.
///
/// # Examples
///
/// ```
/// extern crate zipkin_b3;
///
/// use zipkin_b3::Identifier;
///
///
/// fn main() {
///     let id = Identifier::import("00f067aa0ba902b7").unwrap();
///     assert_eq!(id.to_string(), "00f067aa0ba902b7");
///     assert_eq!(id.low(), 0x00f0_67aa_0ba9_02b7);
/// }
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Identifier {
    origin: Origin,
    value: u128,
    wide: bool,
}

impl Identifier {
    /// Generates a fresh, non-zero, 64-bit identifier.
    pub fn generate() -> Identifier {
        Identifier {
            origin: Origin::Generated,
            value: u128::from(non_zero_u64()),
            wide: false,
        }
    }

    /// Generates a fresh 128-bit identifier, only meaningful as a trace id.
    pub fn generate_wide() -> Identifier {
        let high = u128::from(random::<u64>());
        let low = u128::from(non_zero_u64());
        Identifier {
            origin: Origin::Generated,
            value: (high << 64) | low,
            wide: true,
        }
    }

    /// Parses a 16 or 32 character hex string.
    ///
    /// Upper case digits are accepted and normalised to lower case.
    /// All-zero identifiers are rejected as B3 treats them as absent.
    pub fn import(hex: &str) -> Result<Identifier> {
        let wide = match hex.len() {
            16 => false,
            32 => true,
            len => return Err(Error::InvalidIdentifier(format!(
                "expected 16 or 32 hex characters in {:?}, found {}", hex, len
            )))
        };
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidIdentifier(format!(
                "{:?} is not a hex string", hex
            )));
        }
        let value = u128::from_str_radix(hex, 16).map_err(|_| {
            Error::InvalidIdentifier(format!("{:?} is not a hex string", hex))
        })?;
        if value == 0 {
            return Err(Error::InvalidIdentifier(format!(
                "{:?} is all zeros", hex
            )));
        }
        Ok(Identifier {
            origin: Origin::Imported,
            value,
            wide,
        })
    }
}

impl Identifier {
    /// Returns true for 128-bit identifiers.
    pub fn is_wide(&self) -> bool {
        self.wide
    }

    /// The lower 64 bits of the identifier.
    pub fn low(&self) -> u64 {
        self.value as u64
    }

    /// Whether the identifier was generated or imported.
    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// The full numeric value of the identifier.
    pub fn value(&self) -> u128 {
        self.value
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.wide {
            write!(f, "{:032x}", self.value)
        } else {
            write!(f, "{:016x}", self.value)
        }
    }
}

impl FromStr for Identifier {
    type Err = Error;

    fn from_str(hex: &str) -> Result<Identifier> {
        Identifier::import(hex)
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Identifier) -> bool {
        self.value == other.value && self.wide == other.wide
    }
}

impl Eq for Identifier {}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
        self.wide.hash(state);
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}


fn non_zero_u64() -> u64 {
    loop {
        let value = random::<u64>();
        if value != 0 {
            return value;
        }
    }
}

//! Vehicle identification numbers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A 17-character vehicle identification number.
///
/// Construction validates length only; vendors own the deeper checksum
/// rules and reject VINs they cannot decode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vin(String);

impl Vin {
    pub const LENGTH: usize = 17;

    pub fn try_new(raw: impl Into<String>) -> Result<Self, Error> {
        let raw = raw.into();
        if raw.len() != Self::LENGTH {
            return Err(Error::InvalidVin { vin: raw });
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Vin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_seventeen_characters() {
        let vin = Vin::try_new("1GAHG35R141233251").expect("valid VIN");
        assert_eq!(vin.as_str(), "1GAHG35R141233251");
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(
            Vin::try_new("SHORT"),
            Err(Error::InvalidVin { .. })
        ));
        assert!(matches!(
            Vin::try_new("1GAHG35R141233251X"),
            Err(Error::InvalidVin { .. })
        ));
    }
}

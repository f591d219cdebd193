//! Geography-based vendor routing.
//!
//! One shared country set owns the routing decision; every caller that needs
//! to pick a vendor goes through [`Vendor::for_country`] rather than keeping
//! its own copy of the list.

use std::fmt;

/// ISO-3166 alpha-3 codes where the Drivly-style vendor is authoritative.
pub const NORTH_AMERICA: [&str; 4] = ["USA", "CAN", "MEX", "PRI"];

/// The two vendor families the pipeline can pull from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vendor {
    /// North America: valuation and instant offers.
    Drivly,
    /// Rest of world: aggregate market valuation only.
    Vincario,
}

impl Vendor {
    /// Vendor authoritative for the given ISO-3166 alpha-3 country code.
    pub fn for_country(country: &str) -> Self {
        if NORTH_AMERICA.contains(&country) {
            Vendor::Drivly
        } else {
            Vendor::Vincario
        }
    }

    /// The other vendor family, used by the facade's fallback path.
    pub fn secondary(self) -> Self {
        match self {
            Vendor::Drivly => Vendor::Vincario,
            Vendor::Vincario => Vendor::Drivly,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Vendor::Drivly => "drivly",
            Vendor::Vincario => "vincario",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn north_america_routes_to_drivly() {
        for country in ["USA", "CAN", "MEX", "PRI"] {
            assert_eq!(Vendor::for_country(country), Vendor::Drivly, "{country}");
        }
    }

    #[test]
    fn everything_else_routes_to_vincario() {
        for country in ["DEU", "FRA", "GBR", "JPN", "ZAF"] {
            assert_eq!(Vendor::for_country(country), Vendor::Vincario, "{country}");
        }
    }

    #[test]
    fn secondary_flips_the_vendor() {
        assert_eq!(Vendor::Drivly.secondary(), Vendor::Vincario);
        assert_eq!(Vendor::Vincario.secondary(), Vendor::Drivly);
    }
}

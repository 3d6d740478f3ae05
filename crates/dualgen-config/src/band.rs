use std::fmt;

use serde::{Deserialize, Serialize};

/// The named bands a score falls into, lowest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyBand {
    Critical,
    Low,
    Nominal,
    Optimal,
    Peak,
}

impl FrequencyBand {
    /// All bands from lowest to highest.
    pub const ALL: [FrequencyBand; 5] = [
        Self::Critical,
        Self::Low,
        Self::Nominal,
        Self::Optimal,
        Self::Peak,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Low => "low",
            Self::Nominal => "nominal",
            Self::Optimal => "optimal",
            Self::Peak => "peak",
        }
    }
}

impl fmt::Display for FrequencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_low_to_high() {
        let mut sorted = FrequencyBand::ALL;
        sorted.sort();
        assert_eq!(sorted, FrequencyBand::ALL);
    }

    #[test]
    fn serde_matches_as_str() {
        for band in FrequencyBand::ALL {
            let json = serde_json::to_string(&band).unwrap();
            assert_eq!(json, format!("\"{}\"", band.as_str()));
        }
    }
}

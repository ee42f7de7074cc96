//! Self-reported confidence of a field answer

use std::fmt;

/// Confidence the model attached to an answer
///
/// Advisory only: the pipeline never accepts or rejects a value because of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Confidence {
    /// The value is stated explicitly in the document
    High,

    /// The value is inferred from strong hints
    Medium,

    /// The value is a guess
    Low,
}

impl Confidence {
    /// All levels, in the order they are offered to the model
    pub const ALL: [Confidence; 3] = [Confidence::High, Confidence::Medium, Confidence::Low];

    /// Wire name of the level
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }

    /// Parse a wire name; matching is exact
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "high" => Some(Confidence::High),
            "medium" => Some(Confidence::Medium),
            "low" => Some(Confidence::Low),
            _ => None,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid confidence level: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names() {
        for level in Confidence::ALL {
            assert_eq!(Confidence::parse(level.as_str()), Some(level));
        }
    }

    #[test]
    fn test_parse_is_exact() {
        assert_eq!(Confidence::parse("High"), None);
        assert_eq!(Confidence::parse(" low"), None);
        assert!("certain".parse::<Confidence>().is_err());
    }
}

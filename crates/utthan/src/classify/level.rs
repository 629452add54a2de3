//! Learning levels and their performance categories.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordinal assessment band, L0 lowest to L5 highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    L0,
    L1,
    L2,
    L3,
    L4,
    L5,
}

impl Level {
    pub const ALL: [Level; 6] = [
        Level::L0,
        Level::L1,
        Level::L2,
        Level::L3,
        Level::L4,
        Level::L5,
    ];

    /// Parse a normalized level value. Anything other than `L0`..`L5` is `None`.
    pub fn parse(value: &str) -> Option<Level> {
        match value {
            "L0" => Some(Level::L0),
            "L1" => Some(Level::L1),
            "L2" => Some(Level::L2),
            "L3" => Some(Level::L3),
            "L4" => Some(Level::L4),
            "L5" => Some(Level::L5),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Level::L0 => "L0",
            Level::L1 => "L1",
            Level::L2 => "L2",
            Level::L3 => "L3",
            Level::L4 => "L4",
            Level::L5 => "L5",
        }
    }

    /// Numeric score, 0 for L0 through 5 for L5.
    pub fn score(&self) -> u8 {
        match self {
            Level::L0 => 0,
            Level::L1 => 1,
            Level::L2 => 2,
            Level::L3 => 3,
            Level::L4 => 4,
            Level::L5 => 5,
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Level::L0 | Level::L1 => Category::NeedsImprovement,
            Level::L2 | Level::L3 => Category::DevelopingStage,
            Level::L4 | Level::L5 => Category::Progressive,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Performance band grouping two adjacent levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Needs improvement")]
    NeedsImprovement,
    #[serde(rename = "Developing stage")]
    DevelopingStage,
    #[serde(rename = "Progressive")]
    Progressive,
}

impl Category {
    pub const ALL: [Category; 3] = [
        Category::NeedsImprovement,
        Category::DevelopingStage,
        Category::Progressive,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::NeedsImprovement => "Needs improvement",
            Category::DevelopingStage => "Developing stage",
            Category::Progressive => "Progressive",
        }
    }

    /// Display color for charts (red / amber / green).
    pub fn color(&self) -> &'static str {
        match self {
            Category::NeedsImprovement => "red",
            Category::DevelopingStage => "#b58900",
            Category::Progressive => "green",
        }
    }

    /// Level range covered, for legends.
    pub fn levels(&self) -> (Level, Level) {
        match self {
            Category::NeedsImprovement => (Level::L0, Level::L1),
            Category::DevelopingStage => (Level::L2, Level::L3),
            Category::Progressive => (Level::L4, Level::L5),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_to_category() {
        assert_eq!(Level::L0.category(), Category::NeedsImprovement);
        assert_eq!(Level::L1.category(), Category::NeedsImprovement);
        assert_eq!(Level::L2.category(), Category::DevelopingStage);
        assert_eq!(Level::L3.category(), Category::DevelopingStage);
        assert_eq!(Level::L4.category(), Category::Progressive);
        assert_eq!(Level::L5.category(), Category::Progressive);
    }

    #[test]
    fn test_scores_follow_ordinal() {
        let scores: Vec<u8> = Level::ALL.iter().map(Level::score).collect();
        assert_eq!(scores, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_parse_rejects_non_levels() {
        for raw in ["NA", "LONGABSENT", "L6", "l2", "", "A", "2"] {
            assert_eq!(Level::parse(raw), None, "input {raw:?}");
        }
        assert_eq!(Level::parse("L3"), Some(Level::L3));
    }

    #[test]
    fn test_category_legend() {
        assert_eq!(Category::Progressive.levels(), (Level::L4, Level::L5));
        assert_eq!(Category::NeedsImprovement.color(), "red");
        assert_eq!(
            serde_json::to_string(&Category::DevelopingStage).unwrap(),
            "\"Developing stage\""
        );
    }
}

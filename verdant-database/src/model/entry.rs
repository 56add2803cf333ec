use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One of the three resource-usage areas an entry belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    Energy,
    Water,
    Waste,
}

impl Domain {
    /// Categories that belong to this domain, matching how the pages group them.
    pub fn categories(self) -> &'static [Category] {
        match self {
            Domain::Energy => &[Category::Grid, Category::Solar, Category::Battery],
            Domain::Water => &[
                Category::Domestic,
                Category::Industrial,
                Category::Irrigation,
            ],
            Domain::Waste => &[
                Category::Recycling,
                Category::Composting,
                Category::Landfill,
            ],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Energy => "energy",
            Domain::Water => "water",
            Domain::Waste => "waste",
        }
    }
}

impl FromStr for Domain {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "energy" => Ok(Domain::Energy),
            "water" => Ok(Domain::Water),
            "waste" => Ok(Domain::Waste),
            other => Err(anyhow::anyhow!("unknown domain `{other}`")),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The fixed entry categories, stored as lowercase text in the `entries` table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Grid,
    Solar,
    Battery,
    Domestic,
    Industrial,
    Irrigation,
    Recycling,
    Composting,
    Landfill,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Grid => "grid",
            Category::Solar => "solar",
            Category::Battery => "battery",
            Category::Domestic => "domestic",
            Category::Industrial => "industrial",
            Category::Irrigation => "irrigation",
            Category::Recycling => "recycling",
            Category::Composting => "composting",
            Category::Landfill => "landfill",
        }
    }

    pub fn domain(self) -> Domain {
        match self {
            Category::Grid | Category::Solar | Category::Battery => Domain::Energy,
            Category::Domestic | Category::Industrial | Category::Irrigation => Domain::Water,
            Category::Recycling | Category::Composting | Category::Landfill => Domain::Waste,
        }
    }
}

impl FromStr for Category {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "grid" => Ok(Category::Grid),
            "solar" => Ok(Category::Solar),
            "battery" => Ok(Category::Battery),
            "domestic" => Ok(Category::Domestic),
            "industrial" => Ok(Category::Industrial),
            "irrigation" => Ok(Category::Irrigation),
            "recycling" => Ok(Category::Recycling),
            "composting" => Ok(Category::Composting),
            "landfill" => Ok(Category::Landfill),
            other => Err(anyhow::anyhow!("unknown category `{other}`")),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted resource-usage entry. Immutable once written, except for the
/// single null-to-value transition of `feedback`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Entry {
    pub id: Uuid,
    pub user_id: String,
    pub category: Category,
    pub entry_text: String,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied by the caller when recording a new entry.
#[derive(Clone, Debug)]
pub struct NewEntry {
    pub user_id: String,
    pub category: Category,
    pub entry_text: String,
}

/// Per-domain aggregate counts for one user.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct UsageCounts {
    pub total: i64,
    pub energy: i64,
    pub water: i64,
    pub waste: i64,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::{Category, Domain};

    #[test]
    fn categories_parse_and_round_trip() {
        for raw in [
            "grid",
            "solar",
            "battery",
            "domestic",
            "industrial",
            "irrigation",
            "recycling",
            "composting",
            "landfill",
        ] {
            let category = Category::from_str(raw).unwrap();
            assert_eq!(category.as_str(), raw);
        }

        assert_eq!(Category::from_str("  Solar  ").unwrap(), Category::Solar);
        assert!(Category::from_str("plutonium").is_err());
        assert!(Category::from_str("").is_err());
    }

    #[test]
    fn categories_group_into_domains() {
        assert_eq!(Category::Solar.domain(), Domain::Energy);
        assert_eq!(Category::Irrigation.domain(), Domain::Water);
        assert_eq!(Category::Landfill.domain(), Domain::Waste);

        for domain in [Domain::Energy, Domain::Water, Domain::Waste] {
            assert_eq!(domain.categories().len(), 3);
            for category in domain.categories() {
                assert_eq!(category.domain(), domain);
            }
        }
    }

    #[test]
    fn domains_parse() {
        assert_eq!(Domain::from_str("energy").unwrap(), Domain::Energy);
        assert_eq!(Domain::from_str("WATER").unwrap(), Domain::Water);
        assert!(Domain::from_str("soil").is_err());
    }
}

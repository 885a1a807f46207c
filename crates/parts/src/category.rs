use core::str::FromStr;

use serde::{Deserialize, Serialize};

use partshop_core::{FieldViolation, Rule};

/// Closed set of component categories a part may belong to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "CPU")]
    Cpu,
    #[serde(rename = "GPU")]
    Gpu,
    #[serde(rename = "RAM")]
    Ram,
    Motherboard,
    Storage,
    #[serde(rename = "Power Supply")]
    PowerSupply,
    Case,
    Cooling,
    Peripherals,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Cpu,
        Category::Gpu,
        Category::Ram,
        Category::Motherboard,
        Category::Storage,
        Category::PowerSupply,
        Category::Case,
        Category::Cooling,
        Category::Peripherals,
    ];

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cpu => "CPU",
            Category::Gpu => "GPU",
            Category::Ram => "RAM",
            Category::Motherboard => "Motherboard",
            Category::Storage => "Storage",
            Category::PowerSupply => "Power Supply",
            Category::Case => "Case",
            Category::Cooling => "Cooling",
            Category::Peripherals => "Peripherals",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = FieldViolation;

    /// Exact, case-sensitive match against the wire values.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                FieldViolation::new(
                    "category",
                    Rule::Enumeration,
                    format!("`{s}` is not a valid enum value for path `category`"),
                )
            })
    }
}

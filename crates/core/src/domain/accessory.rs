use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::manufacturer::Manufacturer;

catalog_id!(FloorStandId);
catalog_id!(TableMountId);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessoryKind {
    FloorStand,
    TableMount,
}

impl std::str::FromStr for AccessoryKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "floor-stand" | "floorstand" => Ok(Self::FloorStand),
            "table-mount" | "tablemount" => Ok(Self::TableMount),
            other => Err(format!(
                "unsupported accessory kind `{other}` (expected floor-stand|table-mount)"
            )),
        }
    }
}

/// Free-standing stand, independent of any wheelchair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FloorStand {
    pub id: FloorStandId,
    pub name: String,
    pub manufacturer: Manufacturer,
    pub description: String,
    pub url: Option<String>,
    pub weight_capacity_kg: f64,
    pub max_height_cm: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TableMountStyle {
    ClampOn,
    WeightedBase,
    Other(String),
}

impl TableMountStyle {
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "clamp-on" | "clamp" => Self::ClampOn,
            "weighted-base" | "weighted" => Self::WeightedBase,
            _ => Self::Other(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::ClampOn => "clamp-on",
            Self::WeightedBase => "weighted-base",
            Self::Other(style) => style,
        }
    }
}

impl fmt::Display for TableMountStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for TableMountStyle {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<TableMountStyle> for String {
    fn from(value: TableMountStyle) -> Self {
        value.as_str().to_string()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableMount {
    pub id: TableMountId,
    pub name: String,
    pub manufacturer: Manufacturer,
    pub description: String,
    pub url: Option<String>,
    pub max_weight_kg: f64,
    pub style: TableMountStyle,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Accessory {
    FloorStand(FloorStand),
    TableMount(TableMount),
}

impl Accessory {
    pub fn kind(&self) -> AccessoryKind {
        match self {
            Self::FloorStand(_) => AccessoryKind::FloorStand,
            Self::TableMount(_) => AccessoryKind::TableMount,
        }
    }

    pub fn capacity_kg(&self) -> f64 {
        match self {
            Self::FloorStand(stand) => stand.weight_capacity_kg,
            Self::TableMount(mount) => mount.max_weight_kg,
        }
    }

    pub fn manufacturer(&self) -> &Manufacturer {
        match self {
            Self::FloorStand(stand) => &stand.manufacturer,
            Self::TableMount(mount) => &mount.manufacturer,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::FloorStand(stand) => &stand.name,
            Self::TableMount(mount) => &mount.name,
        }
    }
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// One constituent of an oil, as a share of that oil's volume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChemicalComponent {
    pub name: String,
    /// 0-100, not validated. Reference data may not sum to 100.
    pub percentage: Decimal,
}

/// A catalog oil and its fixed composition profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EssentialOil {
    pub id: String,
    pub name: String,
    pub composition: Vec<ChemicalComponent>,
}

/// One line of the working blend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlendItem {
    pub oil: Arc<EssentialOil>,
    pub drops: u32,
}

/// A chemical component's drop-weighted share of the whole blend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositionResult {
    pub name: String,
    /// Percentage of the blend, rounded to 2 decimal places.
    pub value: Decimal,
}

impl fmt::Display for CompositionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}%", self.name, self.value)
    }
}

/// A named snapshot of a blend, its composition and its analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedBlend {
    pub id: String,
    pub name: String,
    pub blend: Vec<BlendItem>,
    #[serde(default)]
    pub composition: Vec<CompositionResult>,
    pub analysis: String,
}

impl SavedBlend {
    pub fn total_drops(&self) -> u64 {
        self.blend.iter().map(|item| u64::from(item.drops)).sum()
    }

    /// Creation time, recovered from the millisecond id. `None` for foreign ids.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.id
            .parse::<i64>()
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
    }
}

/// Persisted form of the blend under construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingState {
    pub blend: Vec<BlendItem>,
    #[serde(default)]
    pub analysis: String,
}

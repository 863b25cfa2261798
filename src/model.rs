use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Site category, one per supply-chain stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    MineralExtraction,
    DigitalLabor,
    AiResearch,
    DataCenters,
    EnvironmentalImpact,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::MineralExtraction => "mineral_extraction",
            Category::DigitalLabor => "digital_labor",
            Category::AiResearch => "ai_research",
            Category::DataCenters => "data_centers",
            Category::EnvironmentalImpact => "environmental_impact",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Category::MineralExtraction => "#d32f2f",   // Deep red - extraction
            Category::DigitalLabor => "#1976d2",        // Blue - labor
            Category::AiResearch => "#388e3c",          // Green - research
            Category::DataCenters => "#f57c00",         // Orange - infrastructure
            Category::EnvironmentalImpact => "#795548", // Brown - environmental
        }
    }

    /// Layer group the category's markers are drawn into, if any.
    pub fn layer(&self) -> Option<LayerKind> {
        match self {
            Category::MineralExtraction => Some(LayerKind::MineralExtraction),
            Category::DigitalLabor => Some(LayerKind::DigitalLabor),
            Category::AiResearch => Some(LayerKind::AiResearch),
            Category::DataCenters => Some(LayerKind::DataCenters),
            Category::EnvironmentalImpact => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Toggleable overlay on the map. Four site layers plus two flow layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    MineralExtraction,
    DigitalLabor,
    AiResearch,
    DataCenters,
    ResourceFlows,
    LaborFlows,
}

impl LayerKind {
    pub const ALL: [LayerKind; 6] = [
        LayerKind::MineralExtraction,
        LayerKind::DigitalLabor,
        LayerKind::AiResearch,
        LayerKind::DataCenters,
        LayerKind::ResourceFlows,
        LayerKind::LaborFlows,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LayerKind::MineralExtraction => "mineral_extraction",
            LayerKind::DigitalLabor => "digital_labor",
            LayerKind::AiResearch => "ai_research",
            LayerKind::DataCenters => "data_centers",
            LayerKind::ResourceFlows => "resource_flows",
            LayerKind::LaborFlows => "labor_flows",
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LayerKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LayerKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Unknown layer: {}", s))
    }
}

/// Map position in Leaflet order. Serialized as `[lat, lng]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "[f64; 2]")]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Converts a `[longitude, latitude]` pair as used by flow definitions.
    pub fn from_lng_lat(pair: [f64; 2]) -> Self {
        Self { lat: pair[1], lng: pair[0] }
    }
}

impl From<LatLng> for [f64; 2] {
    fn from(p: LatLng) -> Self {
        [p.lat, p.lng]
    }
}

// One site record of the AI value chain dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    pub site_id: u32,
    pub site_name: String,
    pub country: String,
    pub region: String,
    pub category: Category,
    #[serde(default)]
    pub subcategory: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub production_volume: Option<f64>,
    #[serde(default)]
    pub production_unit: Option<String>,
    #[serde(default)]
    pub workforce_size: Option<f64>,
    #[serde(default)]
    pub avg_wage_usd_monthly: Option<f64>,
    #[serde(default)]
    pub environmental_impact_score: Option<f64>,
    #[serde(default)]
    pub human_rights_violations: Option<String>,
    #[serde(default)]
    pub key_companies: Option<String>,
    pub source_authors: String,
    pub data_year: u16,
}

impl Site {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    /// Aggregate records (country "Global") and environmental entries carry no map position.
    pub fn is_mappable(&self) -> bool {
        self.category != Category::EnvironmentalImpact && self.country != "Global"
    }
}

/// Which flow layer a flow belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    Resource,
    Labor,
}

impl FlowKind {
    pub fn layer(&self) -> LayerKind {
        match self {
            FlowKind::Resource => LayerKind::ResourceFlows,
            FlowKind::Labor => LayerKind::LaborFlows,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            FlowKind::Resource => Category::MineralExtraction.color(),
            FlowKind::Labor => Category::DigitalLabor.color(),
        }
    }
}

/// A directed flow between two places. Endpoints are `[longitude, latitude]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowDefinition {
    pub kind: FlowKind,
    pub start: [f64; 2],
    pub end: [f64; 2],
    pub weight: u32,
    pub label: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_round_trips_through_snake_case_names() {
        let parsed: Category = serde_json::from_str("\"data_centers\"").unwrap();
        assert_eq!(parsed, Category::DataCenters);
        assert_eq!(serde_json::to_string(&Category::AiResearch).unwrap(), "\"ai_research\"");
    }

    #[test]
    fn layer_kind_parses_from_legend_names() {
        assert_eq!("labor_flows".parse::<LayerKind>().unwrap(), LayerKind::LaborFlows);
        assert!("environmental_impact".parse::<LayerKind>().is_err());
    }

    #[test]
    fn lat_lng_serializes_in_leaflet_order() {
        let p = LatLng::from_lng_lat([-122.1, 37.4]);
        assert_eq!(serde_json::to_string(&p).unwrap(), "[37.4,-122.1]");
    }

    #[test]
    fn environmental_and_global_sites_are_not_mappable() {
        let mut site: Site = serde_json::from_value(serde_json::json!({
            "site_id": 99,
            "site_name": "Global emissions",
            "country": "Global",
            "region": "World",
            "category": "data_centers",
            "latitude": 0.0,
            "longitude": 0.0,
            "source_authors": "IEA",
            "data_year": 2024
        }))
        .unwrap();
        assert!(!site.is_mappable());

        site.country = "Ireland".to_string();
        assert!(site.is_mappable());

        site.category = Category::EnvironmentalImpact;
        assert!(!site.is_mappable());
    }
}

use serde::Serialize;

use crate::constants::{
    BASE_MARKER_SIZE, CRITICAL_MINERALS, DEFAULT_ENVIRONMENTAL_SCORE, GLOBAL_SOUTH_COUNTRIES,
};
use crate::model::{Category, LatLng, Site};
use crate::popup::site_popup;

/// Leaflet `circleMarker` path options.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleStyle {
    pub radius: f64,
    pub fill_color: String,
    pub color: String,
    pub weight: u32,
    pub opacity: f64,
    pub fill_opacity: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopupOptions {
    pub max_width: u32,
    pub class_name: &'static str,
}

impl Default for PopupOptions {
    fn default() -> Self {
        Self {
            max_width: 300,
            class_name: "custom-popup",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CircleMarker {
    pub position: LatLng,
    pub style: CircleStyle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup_options: Option<PopupOptions>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RegionType {
    #[serde(rename = "Global South")]
    GlobalSouth,
    #[serde(rename = "Global North")]
    GlobalNorth,
}

impl RegionType {
    pub fn of_country(country: &str) -> Self {
        if GLOBAL_SOUTH_COUNTRIES.contains(&country) {
            RegionType::GlobalSouth
        } else {
            RegionType::GlobalNorth
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RegionType::GlobalSouth => "Global South",
            RegionType::GlobalNorth => "Global North",
        }
    }
}

// Zero counts as missing, matching how the dataset treats empty numeric cells.
fn present(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v != 0.0)
}

/// Marker radius for a site.
///
/// Mineral sites grow with their environmental impact score (critical battery and
/// magnet minerals get a fixed bonus), labor hubs with workforce size, research
/// hubs with average wage as a proxy for value concentration.
pub fn marker_size(site: &Site) -> f64 {
    match site.category {
        Category::MineralExtraction => {
            let env_score =
                present(site.environmental_impact_score).unwrap_or(DEFAULT_ENVIRONMENTAL_SCORE);
            let material_bonus = match site.subcategory.as_deref() {
                Some(sub) if CRITICAL_MINERALS.contains(&sub) => 3.0,
                _ => 0.0,
            };
            BASE_MARKER_SIZE + env_score * 1.5 + material_bonus
        }
        Category::DigitalLabor => match present(site.workforce_size) {
            Some(workforce) => BASE_MARKER_SIZE + (workforce / 20000.0).min(8.0),
            None => BASE_MARKER_SIZE + 3.0,
        },
        Category::AiResearch => match present(site.avg_wage_usd_monthly) {
            Some(wage) => BASE_MARKER_SIZE + (wage / 2000.0).min(10.0),
            None => BASE_MARKER_SIZE + 6.0,
        },
        Category::DataCenters => BASE_MARKER_SIZE + 5.0,
        Category::EnvironmentalImpact => BASE_MARKER_SIZE,
    }
}

pub fn site_marker(site: &Site) -> CircleMarker {
    let region = RegionType::of_country(&site.country);

    CircleMarker {
        position: site.position(),
        style: CircleStyle {
            radius: marker_size(site),
            fill_color: site.category.color().to_string(),
            color: "white".to_string(),
            weight: 2,
            opacity: 1.0,
            fill_opacity: 0.8,
        },
        popup: Some(site_popup(site, region)),
        popup_options: Some(PopupOptions::default()),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn site(category: Category) -> Site {
        Site {
            site_id: 1,
            site_name: "Test Site".to_string(),
            country: "Testland".to_string(),
            region: "Nowhere".to_string(),
            category,
            subcategory: None,
            latitude: 1.0,
            longitude: 2.0,
            production_volume: None,
            production_unit: None,
            workforce_size: None,
            avg_wage_usd_monthly: None,
            environmental_impact_score: None,
            human_rights_violations: None,
            key_companies: None,
            source_authors: "Nobody".to_string(),
            data_year: 2024,
        }
    }

    #[test]
    fn cobalt_mine_with_max_impact() {
        let mut s = site(Category::MineralExtraction);
        s.environmental_impact_score = Some(10.0);
        s.subcategory = Some("cobalt".to_string());
        assert_eq!(marker_size(&s), 26.0);
    }

    #[test]
    fn mineral_without_score_uses_default_and_no_bonus_for_copper() {
        let mut s = site(Category::MineralExtraction);
        s.subcategory = Some("copper".to_string());
        assert_eq!(marker_size(&s), 8.0 + 7.5);

        s.environmental_impact_score = Some(0.0);
        assert_eq!(marker_size(&s), 8.0 + 7.5);
    }

    #[test]
    fn digital_labor_workforce_is_capped() {
        let mut s = site(Category::DigitalLabor);
        s.workforce_size = Some(250_000.0);
        assert_eq!(marker_size(&s), 16.0);

        s.workforce_size = Some(40_000.0);
        assert_eq!(marker_size(&s), 10.0);

        s.workforce_size = None;
        assert_eq!(marker_size(&s), 11.0);
    }

    #[test]
    fn research_hub_without_wage() {
        assert_eq!(marker_size(&site(Category::AiResearch)), 14.0);

        let mut s = site(Category::AiResearch);
        s.avg_wage_usd_monthly = Some(18_000.0);
        assert_eq!(marker_size(&s), 17.0);
        s.avg_wage_usd_monthly = Some(40_000.0);
        assert_eq!(marker_size(&s), 18.0);
    }

    #[test]
    fn constant_sizes() {
        assert_eq!(marker_size(&site(Category::DataCenters)), 13.0);
        assert_eq!(marker_size(&site(Category::EnvironmentalImpact)), 8.0);
    }

    #[test]
    fn region_type_from_country_list() {
        assert_eq!(RegionType::of_country("Kenya"), RegionType::GlobalSouth);
        assert_eq!(RegionType::of_country("United Kingdom"), RegionType::GlobalNorth);
    }

    #[test]
    fn site_marker_uses_category_color_and_white_outline() {
        let marker = site_marker(&site(Category::DataCenters));
        assert_eq!(marker.style.fill_color, "#f57c00");
        assert_eq!(marker.style.color, "white");
        assert_eq!(marker.style.radius, 13.0);
        assert_eq!(marker.position, LatLng::new(1.0, 2.0));
        assert!(marker.popup.is_some());
    }
}

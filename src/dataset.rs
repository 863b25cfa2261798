use std::future::Future;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::{FlowDefinition, FlowKind, Site};

// AI value chain dataset compiled into the binary
const EMBEDDED_SITES: &str = include_str!("../data/sites.json");

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed dataset: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid site {site_id}: {reason}")]
    InvalidSite { site_id: u32, reason: String },
}

/// Delivers the ordered site list once, or fails.
pub trait SiteSource {
    fn load(&self) -> impl Future<Output = Result<Vec<Site>, DatasetError>> + Send;
}

/// Sites compiled in from `data/sites.json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedSource;

impl SiteSource for EmbeddedSource {
    async fn load(&self) -> Result<Vec<Site>, DatasetError> {
        parse_sites(EMBEDDED_SITES)
    }
}

/// Sites read from a JSON file on disk, same schema as the embedded data.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SiteSource for FileSource {
    async fn load(&self) -> Result<Vec<Site>, DatasetError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| DatasetError::Io {
                path: self.path.clone(),
                source,
            })?;
        parse_sites(&raw)
    }
}

/// Either source, picked from settings at startup.
#[derive(Debug, Clone)]
pub enum DataSource {
    Embedded(EmbeddedSource),
    File(FileSource),
}

impl DataSource {
    pub fn from_settings(data_file: Option<&str>) -> Self {
        match data_file {
            Some(path) if !path.is_empty() => DataSource::File(FileSource::new(path)),
            _ => DataSource::Embedded(EmbeddedSource),
        }
    }
}

impl SiteSource for DataSource {
    async fn load(&self) -> Result<Vec<Site>, DatasetError> {
        match self {
            DataSource::Embedded(source) => source.load().await,
            DataSource::File(source) => source.load().await,
        }
    }
}

pub fn parse_sites(raw: &str) -> Result<Vec<Site>, DatasetError> {
    let sites: Vec<Site> = serde_json::from_str(raw)?;
    for site in &sites {
        validate(site)?;
    }
    Ok(sites)
}

fn validate(site: &Site) -> Result<(), DatasetError> {
    let invalid = |reason: String| DatasetError::InvalidSite {
        site_id: site.site_id,
        reason,
    };

    if !(-90.0..=90.0).contains(&site.latitude) || !(-180.0..=180.0).contains(&site.longitude) {
        return Err(invalid(format!(
            "position ({}, {}) out of range",
            site.latitude, site.longitude
        )));
    }

    let numeric = [
        ("environmental_impact_score", site.environmental_impact_score),
        ("workforce_size", site.workforce_size),
        ("avg_wage_usd_monthly", site.avg_wage_usd_monthly),
        ("production_volume", site.production_volume),
    ];
    for (field, value) in numeric {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                return Err(invalid(format!("{} must be non-negative, got {}", field, v)));
            }
        }
    }

    Ok(())
}

const RESOURCE_FLOWS: &[FlowDefinition] = &[
    flow(FlowKind::Resource, [25.5, -10.7], [-122.1, 37.4], 3, "Cobalt"),
    flow(FlowKind::Resource, [-67.49, -20.13], [-122.1, 37.4], 3, "Lithium"),
    flow(FlowKind::Resource, [-69.1, -24.3], [-71.1, 42.4], 2, "Copper"),
    flow(FlowKind::Resource, [121.3742, -2.5736], [116.4, 39.9], 2, "Nickel"),
    flow(FlowKind::Resource, [117.4189, 8.57], [-122.1, 37.4], 2, "Nickel"),
    flow(FlowKind::Resource, [88.2167, 69.3333], [-0.1, 51.5], 2, "Nickel"),
    flow(FlowKind::Resource, [109.9, 41.8], [116.4, 39.9], 5, "Rare Earth Hub"),
    flow(FlowKind::Resource, [109.9, 41.8], [-122.1, 37.4], 5, "Rare Earth Hub"),
    flow(FlowKind::Resource, [109.9, 41.8], [-0.1, 51.5], 5, "Rare Earth Hub"),
    flow(FlowKind::Resource, [98.0, 25.0], [116.4, 39.9], 3, "Rare Earth"),
];

const LABOR_FLOWS: &[FlowDefinition] = &[
    flow(FlowKind::Labor, [77.6, 12.97], [-122.1, 37.4], 2, "Data Annotation"),
    flow(FlowKind::Labor, [121.0, 14.6], [-122.1, 37.4], 2, "Content Moderation"),
    flow(FlowKind::Labor, [36.82, -1.29], [-0.1, 51.5], 2, "Content Moderation"),
    flow(FlowKind::Labor, [-46.6, -23.5], [-79.4, 43.7], 1, "BPO Services"),
    flow(FlowKind::Labor, [18.4, -33.9], [-0.1, 51.5], 1, "BPO Services"),
    flow(FlowKind::Labor, [-66.9, 10.5], [-122.1, 37.4], 1, "Platform Work"),
];

const fn flow(
    kind: FlowKind,
    start: [f64; 2],
    end: [f64; 2],
    weight: u32,
    label: &'static str,
) -> FlowDefinition {
    FlowDefinition { kind, start, end, weight, label }
}

/// All declared flows, resource flows first.
pub fn flow_definitions() -> impl Iterator<Item = &'static FlowDefinition> {
    RESOURCE_FLOWS.iter().chain(LABOR_FLOWS.iter())
}

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constants::{
    MAP_CENTER, MAP_MAX_ZOOM, MAP_MIN_ZOOM, MAP_ZOOM, TILE_ATTRIBUTION, TILE_MAX_ZOOM,
    TILE_SUBDOMAINS, TILE_URL,
};
use crate::curve::{flow_arrow, CurveSettings, FlowArrow};
use crate::dataset::{flow_definitions, SiteSource};
use crate::marker::{site_marker, CircleMarker};
use crate::model::{LatLng, LayerKind, Site};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayer {
    pub url: &'static str,
    pub attribution: &'static str,
    pub subdomains: &'static str,
    pub max_zoom: u8,
}

/// Initial Leaflet map options.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub world_copy_jump: bool,
    pub tiles: TileLayer,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: LatLng::new(MAP_CENTER[0], MAP_CENTER[1]),
            zoom: MAP_ZOOM,
            min_zoom: MAP_MIN_ZOOM,
            max_zoom: MAP_MAX_ZOOM,
            world_copy_jump: true,
            tiles: TileLayer {
                url: TILE_URL,
                attribution: TILE_ATTRIBUTION,
                subdomains: TILE_SUBDOMAINS,
                max_zoom: TILE_MAX_ZOOM,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LayerGroup {
    pub visible: bool,
    pub markers: Vec<CircleMarker>,
    pub flows: Vec<FlowArrow>,
}

impl Default for LayerGroup {
    fn default() -> Self {
        Self {
            visible: true,
            markers: Vec::new(),
            flows: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct LayerStatus {
    pub layer: LayerKind,
    pub visible: bool,
    pub markers: usize,
    pub flows: usize,
}

/// Map instance plus the layer-group registry. Owned by the entry point and
/// handed to whatever renders into or toggles it.
#[derive(Debug, Clone, Serialize)]
pub struct MapContext {
    pub view: MapView,
    pub layers: BTreeMap<LayerKind, LayerGroup>,
    pub rendered_at: Option<DateTime<Utc>>,
}

impl MapContext {
    pub fn new(view: MapView) -> Self {
        let layers = LayerKind::ALL
            .into_iter()
            .map(|kind| (kind, LayerGroup::default()))
            .collect();
        Self {
            view,
            layers,
            rendered_at: None,
        }
    }

    fn layer_mut(&mut self, kind: LayerKind) -> &mut LayerGroup {
        self.layers.entry(kind).or_default()
    }

    /// Adds a circle marker for every mappable site, in dataset order.
    pub fn render_sites(&mut self, sites: &[Site]) -> usize {
        let mut drawn = 0;
        for site in sites.iter().filter(|s| s.is_mappable()) {
            if let Some(kind) = site.category.layer() {
                self.layer_mut(kind).markers.push(site_marker(site));
                drawn += 1;
            }
        }
        drawn
    }

    pub fn render_flows(&mut self, settings: &CurveSettings) -> usize {
        let mut drawn = 0;
        for flow in flow_definitions() {
            let arrow = flow_arrow(flow, settings);
            self.layer_mut(flow.kind.layer()).flows.push(arrow);
            drawn += 1;
        }
        drawn
    }

    pub fn set_visible(&mut self, kind: LayerKind, visible: bool) -> bool {
        let group = self.layer_mut(kind);
        let changed = group.visible != visible;
        group.visible = visible;
        changed
    }

    pub fn layer_statuses(&self) -> Vec<LayerStatus> {
        self.layers
            .iter()
            .map(|(kind, group)| LayerStatus {
                layer: *kind,
                visible: group.visible,
                markers: group.markers.len(),
                flows: group.flows.len(),
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.layers
            .values()
            .all(|g| g.markers.is_empty() && g.flows.is_empty())
    }
}

/// Loads sites and draws markers then flows into `ctx`.
///
/// A failed load is logged and leaves the map empty; the returned list holds
/// the sites that were drawn from.
pub async fn load_and_render<S: SiteSource>(
    ctx: &mut MapContext,
    source: &S,
    curve: &CurveSettings,
) -> Vec<Site> {
    let sites = match source.load().await {
        Ok(sites) => sites,
        Err(e) => {
            tracing::error!("Error loading data: {}", e);
            return Vec::new();
        }
    };

    let markers = ctx.render_sites(&sites);
    let flows = ctx.render_flows(curve);
    ctx.rendered_at = Some(Utc::now());

    tracing::info!(
        sites = sites.len(),
        markers,
        flows,
        "Data loaded successfully"
    );
    sites
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{DatasetError, EmbeddedSource};
    use crate::model::Category;

    struct FailingSource;

    impl SiteSource for FailingSource {
        async fn load(&self) -> Result<Vec<Site>, DatasetError> {
            Err(DatasetError::InvalidSite {
                site_id: 0,
                reason: "unavailable".to_string(),
            })
        }
    }

    #[test]
    fn new_context_has_every_layer_visible_and_empty() {
        let ctx = MapContext::new(MapView::default());
        assert_eq!(ctx.layers.len(), 6);
        assert!(ctx.layers.values().all(|g| g.visible));
        assert!(ctx.is_empty());
        assert!(ctx.rendered_at.is_none());
    }

    #[tokio::test]
    async fn embedded_data_fills_site_and_flow_layers() {
        let mut ctx = MapContext::new(MapView::default());
        let sites = load_and_render(&mut ctx, &EmbeddedSource, &CurveSettings::default()).await;

        assert_eq!(sites.len(), 14);
        assert_eq!(ctx.layers[&LayerKind::MineralExtraction].markers.len(), 5);
        assert_eq!(ctx.layers[&LayerKind::DigitalLabor].markers.len(), 3);
        assert_eq!(ctx.layers[&LayerKind::AiResearch].markers.len(), 4);
        assert_eq!(ctx.layers[&LayerKind::DataCenters].markers.len(), 2);
        assert_eq!(ctx.layers[&LayerKind::ResourceFlows].flows.len(), 10);
        assert_eq!(ctx.layers[&LayerKind::LaborFlows].flows.len(), 6);
        assert!(ctx.rendered_at.is_some());

        let bangalore = &ctx.layers[&LayerKind::DigitalLabor].markers[0];
        assert_eq!(bangalore.style.radius, 16.0);
    }

    #[tokio::test]
    async fn failed_load_aborts_rendering() {
        let mut ctx = MapContext::new(MapView::default());
        let sites = load_and_render(&mut ctx, &FailingSource, &CurveSettings::default()).await;

        assert!(sites.is_empty());
        assert!(ctx.is_empty());
        assert!(ctx.rendered_at.is_none());
    }

    #[test]
    fn environmental_sites_are_skipped() {
        let mut ctx = MapContext::new(MapView::default());
        let mut site = crate::marker::tests::site(Category::EnvironmentalImpact);
        assert_eq!(ctx.render_sites(std::slice::from_ref(&site)), 0);

        site.category = Category::DataCenters;
        assert_eq!(ctx.render_sites(&[site]), 1);
    }

    #[test]
    fn toggling_reports_changes_only() {
        let mut ctx = MapContext::new(MapView::default());
        assert!(ctx.set_visible(LayerKind::LaborFlows, false));
        assert!(!ctx.set_visible(LayerKind::LaborFlows, false));
        assert!(!ctx.layers[&LayerKind::LaborFlows].visible);

        let status = ctx
            .layer_statuses()
            .into_iter()
            .find(|s| s.layer == LayerKind::LaborFlows)
            .unwrap();
        assert!(!status.visible);
    }

    #[test]
    fn scene_serializes_layers_by_name() {
        let ctx = MapContext::new(MapView::default());
        let json = serde_json::to_value(&ctx).unwrap();
        assert!(json["layers"]["resource_flows"]["visible"].as_bool().unwrap());
        assert_eq!(json["view"]["center"], serde_json::json!([20.0, 0.0]));
        assert_eq!(json["view"]["worldCopyJump"], serde_json::json!(true));
    }
}

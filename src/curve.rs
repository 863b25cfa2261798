use serde::Serialize;

use crate::constants::{
    ARROW_HEAD_RADIUS, DEFAULT_CURVE_OFFSET_FACTOR, DEFAULT_CURVE_SAMPLES, MIN_FLOW_WEIGHT,
};
use crate::marker::{CircleMarker, CircleStyle};
use crate::model::{FlowDefinition, LatLng};
use crate::popup::flow_popup;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSettings {
    pub samples: usize,
    pub offset_factor: f64,
}

impl Default for CurveSettings {
    fn default() -> Self {
        Self {
            samples: DEFAULT_CURVE_SAMPLES,
            offset_factor: DEFAULT_CURVE_OFFSET_FACTOR,
        }
    }
}

/// Control point bowed sideways from the chord midpoint by `offset_factor` of the chord length.
///
/// Returns `None` when both ends coincide, since there is no direction to bow towards.
pub fn control_point(start: LatLng, end: LatLng, offset_factor: f64) -> Option<LatLng> {
    let mid = LatLng::new((start.lat + end.lat) / 2.0, (start.lng + end.lng) / 2.0);

    let dx = end.lng - start.lng;
    let dy = end.lat - start.lat;
    let distance = (dx * dx + dy * dy).sqrt();
    if distance == 0.0 || !distance.is_finite() {
        return None;
    }

    // Unit normal scaled back up by the chord length, so the bow grows with the flow.
    let bow = distance * offset_factor;
    let normal_lng = -dy / distance;
    let normal_lat = dx / distance;

    Some(LatLng::new(mid.lat + normal_lat * bow, mid.lng + normal_lng * bow))
}

/// Samples the quadratic bezier through `start`, `control`, `end` at `samples + 1` evenly spaced t.
pub fn bezier_points(start: LatLng, control: LatLng, end: LatLng, samples: usize) -> Vec<LatLng> {
    let samples = samples.max(1);
    (0..=samples)
        .map(|i| {
            let t = i as f64 / samples as f64;
            let a = (1.0 - t).powi(2);
            let b = 2.0 * (1.0 - t) * t;
            let c = t.powi(2);
            LatLng::new(
                a * start.lat + b * control.lat + c * end.lat,
                a * start.lng + b * control.lng + c * end.lng,
            )
        })
        .collect()
}

/// Curved path between two `[longitude, latitude]` endpoints.
///
/// A flow whose endpoints coincide collapses to the single start point.
pub fn flow_curve(start: [f64; 2], end: [f64; 2], settings: &CurveSettings) -> Vec<LatLng> {
    let start = LatLng::from_lng_lat(start);
    let end = LatLng::from_lng_lat(end);

    match control_point(start, end, settings.offset_factor) {
        Some(control) => bezier_points(start, control, end, settings.samples),
        None => vec![start],
    }
}

/// Leaflet `polyline` options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolylineStyle {
    pub color: String,
    pub weight: u32,
    pub opacity: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FlowArrow {
    pub label: String,
    pub points: Vec<LatLng>,
    pub style: PolylineStyle,
    pub popup: String,
    pub head: CircleMarker,
    /// Direction of travel at the head, radians, `atan2(dlat, dlng)`.
    pub bearing: f64,
}

pub fn flow_arrow(flow: &FlowDefinition, settings: &CurveSettings) -> FlowArrow {
    let color = flow.kind.color();
    let start = LatLng::from_lng_lat(flow.start);
    let end = LatLng::from_lng_lat(flow.end);

    FlowArrow {
        label: flow.label.to_string(),
        points: flow_curve(flow.start, flow.end, settings),
        style: PolylineStyle {
            color: color.to_string(),
            weight: flow.weight.max(MIN_FLOW_WEIGHT),
            opacity: 0.7,
        },
        popup: flow_popup(flow),
        head: arrow_head(end, color),
        bearing: (end.lat - start.lat).atan2(end.lng - start.lng),
    }
}

fn arrow_head(at: LatLng, color: &str) -> CircleMarker {
    CircleMarker {
        position: at,
        style: CircleStyle {
            radius: ARROW_HEAD_RADIUS,
            fill_color: color.to_string(),
            color: color.to_string(),
            weight: 2,
            opacity: 0.8,
            fill_opacity: 0.8,
        },
        popup: None,
        popup_options: None,
    }
}

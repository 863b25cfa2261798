use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::LayerKind;

// SSE Event types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerEvent {
    pub event_type: String,
    pub data: LayerEventData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerEventData {
    pub layer: Option<LayerKind>,
    pub visible: Option<bool>,
    pub message: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl LayerEvent {
    pub fn visibility_changed(layer: LayerKind, visible: bool) -> Self {
        Self {
            event_type: "layer_visibility".to_string(),
            data: LayerEventData {
                layer: Some(layer),
                visible: Some(visible),
                message: Some(format!(
                    "Layer {} {}",
                    layer,
                    if visible { "shown" } else { "hidden" }
                )),
                timestamp: Utc::now(),
            },
        }
    }

    pub fn heartbeat() -> Self {
        Self {
            event_type: "heartbeat".to_string(),
            data: LayerEventData {
                layer: None,
                visible: None,
                message: Some("SSE connection alive".to_string()),
                timestamp: Utc::now(),
            },
        }
    }
}

use std::sync::{Arc, Mutex, RwLock};
use tokio::sync::broadcast;

use super::events::LayerEvent;
use crate::map_context::MapContext;
use crate::model::Site;
use crate::settings::Settings;

// Application state: the rendered map context plus what the handlers need around it
#[derive(Clone)]
pub struct AppState {
    pub map: Arc<RwLock<MapContext>>,
    pub sites: Arc<Vec<Site>>,
    pub settings: Arc<Mutex<Settings>>,
    pub event_sender: broadcast::Sender<LayerEvent>,
}

impl AppState {
    pub fn new(map: MapContext, sites: Vec<Site>, settings: Settings) -> Self {
        let (event_sender, _) = broadcast::channel(100);
        Self {
            map: Arc::new(RwLock::new(map)),
            sites: Arc::new(sites),
            settings: Arc::new(Mutex::new(settings)),
            event_sender,
        }
    }
}

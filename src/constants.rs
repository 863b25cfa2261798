// Port configuration
pub const DEFAULT_PORT: u16 = 3001;

// Marker sizing
pub const BASE_MARKER_SIZE: f64 = 8.0;
pub const DEFAULT_ENVIRONMENTAL_SCORE: f64 = 5.0;
pub const CRITICAL_MINERALS: &[&str] = &["nickel", "lithium", "rare_earth", "cobalt"];

// Flow curves
pub const DEFAULT_CURVE_SAMPLES: usize = 50;
pub const DEFAULT_CURVE_OFFSET_FACTOR: f64 = 0.2;
pub const MIN_FLOW_WEIGHT: u32 = 2;
pub const ARROW_HEAD_RADIUS: f64 = 4.0;

// Map view
pub const MAP_CENTER: [f64; 2] = [20.0, 0.0];
pub const MAP_ZOOM: u8 = 2;
pub const MAP_MIN_ZOOM: u8 = 2;
pub const MAP_MAX_ZOOM: u8 = 18;

pub const TILE_URL: &str = "https://{s}.basemaps.cartocdn.com/light_all/{z}/{x}/{y}{r}.png";
pub const TILE_ATTRIBUTION: &str = "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors &copy; <a href=\"https://carto.com/attributions\">CARTO</a>";
pub const TILE_SUBDOMAINS: &str = "abcd";
pub const TILE_MAX_ZOOM: u8 = 19;

// Countries drawn as "Global South" in site popups
pub const GLOBAL_SOUTH_COUNTRIES: &[&str] = &[
    "Democratic Republic of Congo",
    "Bolivia",
    "Chile",
    "Myanmar",
    "Indonesia",
    "India",
    "Philippines",
    "Kenya",
    "Venezuela",
    "Brazil",
    "South Africa",
    "Argentina",
    "Peru",
    "Madagascar",
    "Papua New Guinea",
    "Guinea",
];

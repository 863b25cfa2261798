// Named flow endpoints, keyed by the exact `[longitude, latitude]` used in flow definitions
const KNOWN_LOCATIONS: &[([f64; 2], &str)] = &[
    ([25.5, -10.7], "DRC (Kolwezi)"),
    ([-67.49, -20.13], "Bolivia (Salar de Uyuni)"),
    ([-122.1, 37.4], "Silicon Valley"),
    ([77.6, 12.97], "Bangalore"),
    ([36.82, -1.29], "Nairobi"),
    ([-0.1, 51.5], "London"),
];

pub const UNKNOWN_LOCATION: &str = "Unknown Location";

pub fn lookup(coords: [f64; 2]) -> Option<&'static str> {
    KNOWN_LOCATIONS
        .iter()
        .find(|(known, _)| *known == coords)
        .map(|(_, name)| *name)
}

// Public helper for popups
pub fn location_name(coords: [f64; 2]) -> &'static str {
    lookup(coords).unwrap_or(UNKNOWN_LOCATION)
}

//! Static registry of named cities, each tagged as a threat origin or a target

use std::sync::LazyLock;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub lat: f32,
    pub lng: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    ThreatOrigin,
    Target,
}

#[derive(Debug, PartialEq)]
pub struct City {
    pub name: &'static str,
    pub location: GeoPoint,
    pub role: Role,
}

const fn city(name: &'static str, lat: f32, lng: f32, role: Role) -> City {
    City { name, location: GeoPoint { lat, lng }, role }
}

use Role::{Target, ThreatOrigin};

pub static CITIES: [City; 30] = [
    // Threat origins
    city("Moscow", 55.75, 37.62, ThreatOrigin),
    city("Saint Petersburg", 59.93, 30.34, ThreatOrigin),
    city("Beijing", 39.90, 116.40, ThreatOrigin),
    city("Shanghai", 31.23, 121.47, ThreatOrigin),
    city("Pyongyang", 39.04, 125.76, ThreatOrigin),
    city("Tehran", 35.69, 51.39, ThreatOrigin),
    city("Lagos", 6.52, 3.38, ThreatOrigin),
    city("Sao Paulo", -23.55, -46.63, ThreatOrigin),
    city("Bucharest", 44.43, 26.10, ThreatOrigin),
    city("Kyiv", 50.45, 30.52, ThreatOrigin),
    city("Hanoi", 21.03, 105.85, ThreatOrigin),
    city("Jakarta", -6.21, 106.85, ThreatOrigin),
    // Targets
    city("New York", 40.71, -74.01, Target),
    city("Washington", 38.91, -77.04, Target),
    city("San Francisco", 37.77, -122.42, Target),
    city("Chicago", 41.88, -87.63, Target),
    city("Toronto", 43.65, -79.38, Target),
    city("London", 51.51, -0.13, Target),
    city("Paris", 48.86, 2.35, Target),
    city("Frankfurt", 50.11, 8.68, Target),
    city("Amsterdam", 52.37, 4.90, Target),
    city("Stockholm", 59.33, 18.07, Target),
    city("Tel Aviv", 32.09, 34.78, Target),
    city("Dubai", 25.20, 55.27, Target),
    city("Mumbai", 19.08, 72.88, Target),
    city("Singapore", 1.35, 103.82, Target),
    city("Tokyo", 35.68, 139.69, Target),
    city("Seoul", 37.57, 126.98, Target),
    city("Sydney", -33.87, 151.21, Target),
    city("Johannesburg", -26.20, 28.05, Target),
];

static THREAT_ORIGINS: LazyLock<Vec<&'static City>> =
    LazyLock::new(|| CITIES.iter().filter(|c| c.role == ThreatOrigin).collect());

static TARGETS: LazyLock<Vec<&'static City>> =
    LazyLock::new(|| CITIES.iter().filter(|c| c.role == Target).collect());

pub fn all() -> &'static [City] {
    &CITIES
}

pub fn threat_origins() -> &'static [&'static City] {
    &THREAT_ORIGINS
}

pub fn targets() -> &'static [&'static City] {
    &TARGETS
}

#[cfg(test)]
pub fn by_name(name: &str) -> Option<&'static City> {
    CITIES.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}

//! Catalog of named test areas.

use serde::{Deserialize, Serialize};

use crate::types::Coordinates;

/// Coordinates offered when the user enters a custom location.
pub const DEFAULT_COORDINATES: Coordinates = Coordinates {
    lat: 48.36964,
    lon: 14.5128,
};

const TEST_AREAS: &[(&str, f64, f64)] = &[
    ("P1 - Valle di Sole - Caldes", 46.3732, 10.9279),
    ("P1 - Valle di Sole - Cavizzana", 46.3555, 10.9396),
    ("P1 - Valle di Sole - Terzolas", 46.3489, 10.9353),
    ("P1 - Valle di Sole - Male", 46.3546, 10.9055),
];

/// First of the partner villages and the one offered by default.
pub const DEFAULT_VILLAGE: &str = "Ossana";

const VILLAGES: &[(&str, f64, f64)] = &[
    ("Ossana", 46.3069, 10.7378),
    ("Vermiglio", 46.2975, 10.6911),
    ("Sóller", 39.7667, 2.7152),
    ("Port of Sóller", 39.7956, 2.6940),
    ("Bileća", 42.8722, 18.4281),
    ("Padna", 45.4678, 13.6789),
    ("Šmarje", 45.4989, 13.7164),
    ("Agatovo", 43.0372, 25.0489),
    ("Alexandrovo", 43.2600, 24.9300),
    ("Brestovo", 43.0000, 24.7833),
    ("Gorsko Slivovo", 43.1167, 25.1167),
    ("Kakrina", 43.0833, 24.7667),
    ("Karpachevo", 43.3600, 25.0300),
    ("Krushuna", 43.2333, 25.0333),
    ("Kramolin", 43.0167, 25.2000),
    ("Tepava", 43.1500, 24.9500),
    ("Alavieska", 64.1667, 24.3000),
    ("Kalajoki", 64.2597, 23.9486),
    ("Nivala", 63.9292, 24.9778),
];

/// A named location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    #[serde(flatten)]
    pub location: Coordinates,
}

impl Place {
    pub fn new(name: impl Into<String>, lat: f64, lon: f64) -> Self {
        Self {
            name: name.into(),
            location: Coordinates::new(lat, lon),
        }
    }

    /// Village part of a `"P1 - Valley - Village"` style name.
    pub fn short_name(&self) -> &str {
        self.name
            .rsplit(" - ")
            .next()
            .map(str::trim)
            .unwrap_or(&self.name)
    }
}

/// Ordered set of places, unique by case-insensitive name.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceCatalog {
    places: Vec<Place>,
}

impl Default for PlaceCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PlaceCatalog {
    pub fn empty() -> Self {
        Self { places: Vec::new() }
    }

    /// The Valle di Sole test areas followed by the partner villages.
    ///
    /// Village names double as administrative area names for
    /// [`GeoSource::fetch_area`](crate::traits::GeoSource::fetch_area);
    /// their coordinates are approximate village centres.
    pub fn builtin() -> Self {
        let places = TEST_AREAS
            .iter()
            .chain(VILLAGES)
            .map(|&(name, lat, lon)| Place::new(name, lat, lon))
            .collect();
        Self { places }
    }

    /// Add a place, replacing one with the same name.
    pub fn insert(&mut self, place: Place) {
        match self
            .places
            .iter_mut()
            .find(|p| same_name(&p.name, &place.name))
        {
            Some(existing) => *existing = place,
            None => self.places.push(place),
        }
    }

    pub fn extend(&mut self, places: impl IntoIterator<Item = Place>) {
        for place in places {
            self.insert(place);
        }
    }

    /// Look up by full or short name, ignoring case.
    pub fn find(&self, name: &str) -> Option<&Place> {
        let name = name.trim();
        self.places
            .iter()
            .find(|p| same_name(&p.name, name))
            .or_else(|| self.places.iter().find(|p| same_name(p.short_name(), name)))
    }

    /// [`DEFAULT_VILLAGE`] when present, else the first place.
    pub fn default_village(&self) -> Option<&Place> {
        self.find(DEFAULT_VILLAGE).or_else(|| self.places.first())
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn names(&self) -> Vec<&str> {
        self.places.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

/// Case-insensitive name comparison, including non-ASCII letters.
fn same_name(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

//! Civilizations.

use serde::{Deserialize, Serialize};

/// Unique identifier for a civilization.
///
/// Must be below [`crate::game::CivMask::CAPACITY`] to take part in discovery.
pub type CivId = u8;

/// A 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// How a civilization's units and territory are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CivStyle {
    /// Text color.
    pub foreground: Rgb,
    /// Background color.
    pub background: Rgb,
}

impl Default for CivStyle {
    fn default() -> Self {
        Self {
            foreground: Rgb(0xdf, 0xdf, 0xdf),
            background: Rgb(0x6f, 0x00, 0x00),
        }
    }
}

/// A civilization. Owns units and cities by id, never by containment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Civilization {
    /// Unique identifier.
    pub id: CivId,
    /// Display name.
    pub name: String,
    /// Display style.
    pub style: CivStyle,
    /// Names handed out to founded cities, in order.
    pub city_names: Vec<String>,
}

impl Civilization {
    /// Create a civilization with no city names of its own.
    #[must_use]
    pub fn new(id: CivId, name: impl Into<String>, style: CivStyle) -> Self {
        Self {
            id,
            name: name.into(),
            style,
            city_names: Vec::new(),
        }
    }

    /// Builder-style: set the city name list.
    #[must_use]
    pub fn with_city_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.city_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Name for this civilization's `founded`-th city (0-based).
    ///
    /// Falls back to `"<civ name> <n>"` once the list runs out.
    #[must_use]
    pub fn city_name(&self, founded: usize) -> String {
        self.city_names
            .get(founded)
            .cloned()
            .unwrap_or_else(|| format!("{} {}", self.name, founded + 1))
    }
}

//! Region catalog.
//!
//! The catalog is the fixed lookup table from region name to circle. It is
//! handed to the tracker at construction; the tracker never validates
//! coordinate plausibility beyond using them as given.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error_handling::CatalogError;

/// Center and radius of a named circular region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionSpec {
    pub latitude: f64,
    pub longitude: f64,
    /// Meters
    pub radius: f64,
}

impl RegionSpec {
    pub fn new(latitude: f64, longitude: f64, radius: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius,
        }
    }
}

/// Name -> region table.
///
/// JSON form is an object keyed by name:
///
/// ```json
/// { "Park": { "latitude": 28.6139, "longitude": 77.2090, "radius": 200 } }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionCatalog {
    regions: BTreeMap<String, RegionSpec>,
}

impl RegionCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in catalog: India Gate park and the National Museum, New Delhi.
    pub fn builtin() -> Self {
        let mut regions = BTreeMap::new();
        regions.insert("Park".to_string(), RegionSpec::new(28.6139, 77.2090, 200.0));
        regions.insert(
            "Museum".to_string(),
            RegionSpec::new(28.6129, 77.2295, 150.0),
        );
        Self { regions }
    }

    /// Adds or replaces an entry, returning the previous one.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidRadius` for a negative or non-finite radius.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        spec: RegionSpec,
    ) -> Result<Option<RegionSpec>, CatalogError> {
        let name = name.into();
        validate_radius(&name, spec.radius)?;
        Ok(self.regions.insert(name, spec))
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with_region(
        mut self,
        name: impl Into<String>,
        spec: RegionSpec,
    ) -> Result<Self, CatalogError> {
        self.insert(name, spec)?;
        Ok(self)
    }

    /// Exact, case-sensitive lookup.
    pub fn lookup(&self, name: &str) -> Option<&RegionSpec> {
        self.regions.get(name)
    }

    /// Names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.regions.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Parses the JSON form.
    ///
    /// # Errors
    ///
    /// `CatalogError::Parse` for malformed JSON, `CatalogError::InvalidRadius`
    /// for a negative or non-finite radius.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let catalog: RegionCatalog = serde_json::from_str(json)?;
        for (name, spec) in &catalog.regions {
            validate_radius(name, spec.radius)?;
        }
        Ok(catalog)
    }

    /// Reads and parses a JSON catalog file.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&json)?;
        log::debug!(
            "Loaded {} region(s) from {}",
            catalog.len(),
            path.display()
        );
        Ok(catalog)
    }
}

fn validate_radius(name: &str, radius: f64) -> Result<(), CatalogError> {
    if radius.is_finite() && radius >= 0.0 {
        Ok(())
    } else {
        Err(CatalogError::InvalidRadius {
            name: name.to_string(),
            radius,
        })
    }
}

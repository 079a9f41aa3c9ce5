//! `.folio` file codec.
//!
//! A file is one JSON object holding the element list, the assets the
//! elements reference, and the document background and grid flag. Schema
//! migration of older versions is the caller's job; this module only checks
//! the type marker.

#[cfg(test)]
#[path = "file_test.rs"]
mod file_test;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_BACKGROUND, FILE_TYPE, FILE_VERSION};
use crate::element::Element;
use crate::scene::Scene;

/// Error returned by [`FolioFile::from_json`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The input is not valid JSON or does not match the file schema.
    #[error("malformed folio file: {0}")]
    Parse(#[from] serde_json::Error),
    /// The `type` marker names some other format.
    #[error("not a folio file (type {0:?})")]
    WrongType(String),
}

/// An embedded asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub data_url: String,
}

/// On-disk document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FolioFile {
    #[serde(rename = "type")]
    pub file_type: String,
    pub version: String,
    pub elements: Vec<Element>,
    #[serde(default)]
    pub assets: BTreeMap<String, Asset>,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default)]
    pub grid: bool,
}

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_owned()
}

impl Default for FolioFile {
    fn default() -> Self {
        Self {
            file_type: FILE_TYPE.to_owned(),
            version: FILE_VERSION.to_owned(),
            elements: Vec::new(),
            assets: BTreeMap::new(),
            background: default_background(),
            grid: false,
        }
    }
}

impl FolioFile {
    /// Parse a file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Parse`] for malformed input and
    /// [`LoadError::WrongType`] when the type marker is not `"folio"`.
    pub fn from_json(raw: &str) -> Result<Self, LoadError> {
        let file: Self = serde_json::from_str(raw)?;
        if file.file_type != FILE_TYPE {
            return Err(LoadError::WrongType(file.file_type));
        }
        Ok(file)
    }

    /// Serialize as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if an element prop cannot be serialized.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Assets as the scene stores them: asset id to data URL.
    #[must_use]
    pub fn asset_urls(&self) -> BTreeMap<String, String> {
        self.assets
            .iter()
            .map(|(id, asset)| (id.clone(), asset.data_url.clone()))
            .collect()
    }
}

/// Snapshot `scene` as a file: current version, elements in stacking order
/// with selection stripped, and only the assets some element references.
#[must_use]
pub fn export(scene: &Scene) -> FolioFile {
    let elements: Vec<Element> = scene
        .elements()
        .iter()
        .map(|el| Element { selected: false, ..el.clone() })
        .collect();
    let referenced: BTreeSet<&str> = elements
        .iter()
        .map(|el| el.props().asset_id())
        .filter(|id| !id.is_empty())
        .collect();
    let assets = scene
        .assets
        .iter()
        .filter(|(id, _)| referenced.contains(id.as_str()))
        .map(|(id, url)| (id.clone(), Asset { data_url: url.clone() }))
        .collect();
    FolioFile {
        elements,
        assets,
        background: scene.background.clone(),
        grid: scene.grid,
        ..FolioFile::default()
    }
}

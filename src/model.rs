use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque reference to an image: a path relative to the photos directory.
///
/// The core never interprets it; it is compared, cloned and handed back to the
/// collaborator untouched.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl ImageRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageRef {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ImageRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

pub const DEFAULT_SAVE_FOLDER: &str = "saved";
pub const DEFAULT_THUMBNAIL_SIZE: u32 = 200;

fn default_save_folder() -> String {
    DEFAULT_SAVE_FOLDER.to_string()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    pub name: String,
    pub path: String,

    #[serde(default)]
    pub size: u64,

    // RFC 3339; empty when only the directory listing was read.
    #[serde(default)]
    pub mod_time: String,

    #[serde(default)]
    pub thumbnail_url: String,
}

impl ImageInfo {
    pub fn image_ref(&self) -> ImageRef {
        ImageRef::new(self.path.clone())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderInfo {
    pub name: String,
    pub path: String,

    #[serde(default)]
    pub images: Vec<ImageInfo>,

    #[serde(default)]
    pub subfolders: Vec<FolderInfo>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRequest {
    pub image_paths: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub id: String,
    pub images: Vec<ImageInfo>,
}

impl BatchResponse {
    /// The batch as the ordered image references the comparison engine consumes.
    pub fn image_refs(&self) -> Vec<ImageRef> {
        self.images.iter().map(ImageInfo::image_ref).collect()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub batch_id: String,
    pub selected_paths: Vec<String>,

    #[serde(default = "default_save_folder")]
    pub target_folder: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub success: Vec<String>,
    pub failed: Vec<String>,
    pub conflicts: Vec<String>,
    pub target_folder: String,
}

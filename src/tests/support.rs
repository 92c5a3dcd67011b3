//! In-memory stand-in for the photo server.

use std::sync::Mutex;

use crate::model::{BatchResponse, FolderInfo, ImageInfo, SaveResponse};
use crate::remote::{ImageService, RemoteError};

#[derive(Default)]
pub(crate) struct FakeService {
    pub(crate) root: FolderInfo,
    pub(crate) fail_batches: bool,
    pub(crate) fail_saves: bool,
    pub(crate) saves: Mutex<Vec<(String, Vec<String>, String)>>,
    pub(crate) batches: Mutex<usize>,
}

pub(crate) fn image(path: &str) -> ImageInfo {
    ImageInfo {
        name: path.rsplit('/').next().unwrap_or(path).to_string(),
        path: path.to_string(),
        size: 1,
        mod_time: String::new(),
        thumbnail_url: String::new(),
    }
}

impl FakeService {
    /// Root with one image and a `trip` folder holding `a.jpg`, `b.jpg`, `c.jpg`.
    pub(crate) fn with_trip() -> Self {
        let trip = FolderInfo {
            name: "trip".to_string(),
            path: "trip".to_string(),
            images: vec![image("trip/a.jpg"), image("trip/b.jpg"), image("trip/c.jpg")],
            subfolders: Vec::new(),
        };
        let root = FolderInfo {
            name: "Root".to_string(),
            path: String::new(),
            images: vec![image("cover.jpg")],
            subfolders: vec![trip],
        };
        Self {
            root,
            ..Self::default()
        }
    }

    fn find(&self, path: &str) -> Option<&FolderInfo> {
        if path.is_empty() {
            return Some(&self.root);
        }
        fn walk<'a>(f: &'a FolderInfo, path: &str) -> Option<&'a FolderInfo> {
            if f.path == path {
                return Some(f);
            }
            f.subfolders.iter().find_map(|s| walk(s, path))
        }
        walk(&self.root, path)
    }

    pub(crate) fn recorded_saves(&self) -> Vec<(String, Vec<String>, String)> {
        self.saves.lock().unwrap().clone()
    }
}

impl ImageService for FakeService {
    fn list_folders(&self) -> Result<Vec<FolderInfo>, RemoteError> {
        Ok(vec![self.root.clone()])
    }

    fn list_folder_contents(&self, path: &str) -> Result<FolderInfo, RemoteError> {
        self.find(path)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("not found: {}", path).into())
    }

    fn list_images(&self, folder: &str) -> Result<Vec<ImageInfo>, RemoteError> {
        Ok(self.list_folder_contents(folder)?.images)
    }

    fn create_batch(&self, image_paths: &[String]) -> Result<BatchResponse, RemoteError> {
        if self.fail_batches {
            return Err(RemoteError::BatchCreation(anyhow::anyhow!("server said no")));
        }
        let mut n = self.batches.lock().unwrap();
        let id = format!("batch_{}", *n);
        *n += 1;
        Ok(BatchResponse {
            id,
            images: image_paths.iter().map(|p| image(p)).collect(),
        })
    }

    fn save_selected(
        &self,
        batch_id: &str,
        selected_paths: &[String],
        target_folder: &str,
    ) -> Result<SaveResponse, RemoteError> {
        self.saves.lock().unwrap().push((
            batch_id.to_string(),
            selected_paths.to_vec(),
            target_folder.to_string(),
        ));
        if self.fail_saves {
            return Err(RemoteError::Persistence(anyhow::anyhow!("disk full")));
        }
        Ok(SaveResponse {
            success: selected_paths.to_vec(),
            target_folder: target_folder.to_string(),
            ..SaveResponse::default()
        })
    }

    fn thumbnail_url(&self, image_path: &str, size: u32) -> String {
        format!("fake://{image_path}?size={size}")
    }
}

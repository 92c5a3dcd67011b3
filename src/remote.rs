use anyhow::{Context, Result};

use crate::model::{
    BatchRequest, BatchResponse, DEFAULT_THUMBNAIL_SIZE, FolderInfo, ImageInfo, SaveRequest,
    SaveResponse,
};

mod http_client;
use self::http_client::with_retries;

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("batch creation failed: {0:#}")]
    BatchCreation(anyhow::Error),

    #[error("saving images failed: {0:#}")]
    Persistence(anyhow::Error),

    #[error(transparent)]
    Request(#[from] anyhow::Error),
}

/// What the comparison UI needs from the photo server.
pub trait ImageService {
    fn list_folders(&self) -> Result<Vec<FolderInfo>, RemoteError>;

    fn list_folder_contents(&self, path: &str) -> Result<FolderInfo, RemoteError>;

    fn list_images(&self, folder: &str) -> Result<Vec<ImageInfo>, RemoteError>;

    fn create_batch(&self, image_paths: &[String]) -> Result<BatchResponse, RemoteError>;

    fn save_selected(
        &self,
        batch_id: &str,
        selected_paths: &[String],
        target_folder: &str,
    ) -> Result<SaveResponse, RemoteError>;

    fn thumbnail_url(&self, image_path: &str, size: u32) -> String;

    fn default_thumbnail_url(&self, image_path: &str) -> String {
        self.thumbnail_url(image_path, DEFAULT_THUMBNAIL_SIZE)
    }
}

pub struct RemoteClient {
    base: reqwest::Url,
    client: reqwest::blocking::Client,
}

impl RemoteClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = reqwest::Url::parse(base_url)
            .with_context(|| format!("invalid server url {}", base_url))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("server url must be hierarchical (got {})", base_url);
        }
        let client = reqwest::blocking::Client::builder()
            .user_agent("kerpic")
            .build()
            .context("build reqwest client")?;
        Ok(Self { base, client })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }
}

impl ImageService for RemoteClient {
    fn list_folders(&self) -> Result<Vec<FolderInfo>, RemoteError> {
        let folders = with_retries("list folders", || {
            let resp = self
                .client
                .get(self.api_url(&[], "folders"))
                .send()
                .context("list folders request")?;
            self.ensure_ok(resp, "list folders")?
                .json::<Vec<FolderInfo>>()
                .context("parse folders")
        })?;
        Ok(folders)
    }

    fn list_folder_contents(&self, path: &str) -> Result<FolderInfo, RemoteError> {
        if path.is_empty() {
            return self
                .list_folders()?
                .into_iter()
                .next()
                .ok_or_else(|| anyhow::anyhow!("server returned no root folder").into());
        }
        let folder = with_retries("list folder contents", || {
            let resp = self
                .client
                .get(self.api_url(&[path], "folders"))
                .send()
                .context("folder contents request")?;
            self.ensure_ok(resp, "folder contents")?
                .json::<FolderInfo>()
                .context("parse folder contents")
        })?;
        Ok(folder)
    }

    fn list_images(&self, folder: &str) -> Result<Vec<ImageInfo>, RemoteError> {
        let images = with_retries("list images", || {
            let resp = self
                .client
                .get(self.api_url(&[folder], "images"))
                .send()
                .context("list images request")?;
            self.ensure_ok(resp, "list images")?
                .json::<Vec<ImageInfo>>()
                .context("parse images")
        })?;
        Ok(images)
    }

    fn create_batch(&self, image_paths: &[String]) -> Result<BatchResponse, RemoteError> {
        let req = BatchRequest {
            image_paths: image_paths.to_vec(),
        };
        let send = || -> Result<BatchResponse> {
            let resp = self
                .client
                .post(self.api_url(&[], "batch"))
                .json(&req)
                .send()
                .context("create batch request")?;
            self.ensure_ok(resp, "create batch")?
                .json::<BatchResponse>()
                .context("parse batch")
        };
        // Not retried: the server numbers batches, a retry could create two.
        let batch = send().map_err(RemoteError::BatchCreation)?;
        tracing::debug!(id = %batch.id, images = batch.images.len(), "batch created");
        Ok(batch)
    }

    fn save_selected(
        &self,
        batch_id: &str,
        selected_paths: &[String],
        target_folder: &str,
    ) -> Result<SaveResponse, RemoteError> {
        let req = SaveRequest {
            batch_id: batch_id.to_string(),
            selected_paths: selected_paths.to_vec(),
            target_folder: target_folder.to_string(),
        };
        let resp = with_retries("save selected", || {
            let resp = self
                .client
                .post(self.api_url(&[], "save"))
                .json(&req)
                .send()
                .context("save request")?;
            self.ensure_ok(resp, "save")?
                .json::<SaveResponse>()
                .context("parse save response")
        })
        .map_err(RemoteError::Persistence)?;
        Ok(resp)
    }

    fn thumbnail_url(&self, image_path: &str, size: u32) -> String {
        let mut url = self.api_url(&[image_path], "thumbnail");
        url.query_pairs_mut()
            .append_pair("size", &size.to_string());
        url.to_string()
    }
}

#[cfg(test)]
#[path = "tests/remote_tests.rs"]
mod tests;

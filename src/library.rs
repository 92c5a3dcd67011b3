//! Read and reorganize a photos directory on disk.
//!
//! All paths crossing this boundary are relative to the library root and use
//! `/` separators. Anything that would escape the root is refused.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::model::{DEFAULT_SAVE_FOLDER, FolderInfo, ImageInfo, SaveResponse};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "heic"];

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("path escapes the library root: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl LibraryError {
    fn io(context: impl Into<String>, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            return LibraryError::NotFound(context.into());
        }
        LibraryError::Io {
            context: context.into(),
            source,
        }
    }
}

pub fn is_image_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}

/// Normalizes a client-supplied relative path into `/`-joined components.
pub fn clean_relative(path: &str) -> Result<String, LibraryError> {
    let mut parts = Vec::new();
    for comp in Path::new(path.trim_start_matches('/')).components() {
        match comp {
            Component::Normal(p) => {
                let p = p
                    .to_str()
                    .ok_or_else(|| LibraryError::Forbidden(path.to_string()))?;
                parts.push(p);
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(LibraryError::Forbidden(path.to_string()));
            }
        }
    }
    Ok(parts.join("/"))
}

fn join_rel(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

fn format_mtime(meta: &fs::Metadata) -> String {
    meta.modified()
        .ok()
        .and_then(|t| OffsetDateTime::from(t).format(&Rfc3339).ok())
        .unwrap_or_default()
}

#[derive(Clone, Debug)]
pub struct Library {
    root: PathBuf,
}

impl Library {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, rel: &str) -> Result<(String, PathBuf), LibraryError> {
        let clean = clean_relative(rel)?;
        let full = if clean.is_empty() {
            self.root.clone()
        } else {
            self.root.join(&clean)
        };
        Ok((clean, full))
    }

    /// Root listing, wrapped the way the folders endpoint returns it.
    pub fn list_folders(&self) -> Result<Vec<FolderInfo>, LibraryError> {
        Ok(vec![self.folder_contents("")?])
    }

    /// Immediate subfolders and images of `rel`; images carry only name/path.
    pub fn folder_contents(&self, rel: &str) -> Result<FolderInfo, LibraryError> {
        let (clean, full) = self.resolve(rel)?;
        let meta = fs::metadata(&full).map_err(|e| LibraryError::io(clean.clone(), e))?;
        if !meta.is_dir() {
            return Err(LibraryError::NotADirectory(clean));
        }

        let name = match clean.rsplit('/').next() {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => "Root".to_string(),
        };
        let mut folder = FolderInfo {
            name,
            path: clean.clone(),
            ..FolderInfo::default()
        };

        for entry in self.sorted_entries(&full, &clean)? {
            let file_name = entry.file_name().to_string_lossy().to_string();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if is_dir {
                if file_name.starts_with('.') {
                    continue;
                }
                folder.subfolders.push(FolderInfo {
                    name: file_name.clone(),
                    path: join_rel(&clean, &file_name),
                    ..FolderInfo::default()
                });
            } else if is_image_file(&file_name) {
                let path = join_rel(&clean, &file_name);
                folder.images.push(ImageInfo {
                    name: file_name,
                    thumbnail_url: format!("/api/thumbnail/{path}"),
                    path,
                    size: 0,
                    mod_time: String::new(),
                });
            }
        }
        Ok(folder)
    }

    /// Images directly inside `folder`, with file metadata filled in.
    pub fn list_images(&self, folder: &str) -> Result<Vec<ImageInfo>, LibraryError> {
        let (clean, full) = self.resolve(folder)?;
        let mut out = Vec::new();
        for entry in self.sorted_entries(&full, &clean)? {
            let file_name = entry.file_name().to_string_lossy().to_string();
            let is_file = entry.file_type().map(|t| !t.is_dir()).unwrap_or(false);
            if !is_file || !is_image_file(&file_name) {
                continue;
            }
            match self.image_info(&join_rel(&clean, &file_name)) {
                Ok(info) => out.push(info),
                Err(err) => tracing::debug!(%err, file = %file_name, "skip unreadable image"),
            }
        }
        Ok(out)
    }

    pub fn image_info(&self, rel: &str) -> Result<ImageInfo, LibraryError> {
        let (clean, full) = self.resolve(rel)?;
        let meta = fs::metadata(&full).map_err(|e| LibraryError::io(clean.clone(), e))?;
        if meta.is_dir() {
            return Err(LibraryError::NotFound(clean));
        }
        let name = clean.rsplit('/').next().unwrap_or_default().to_string();
        Ok(ImageInfo {
            name,
            thumbnail_url: format!("/api/thumbnail/{clean}"),
            size: meta.len(),
            mod_time: format_mtime(&meta),
            path: clean,
        })
    }

    /// Moves each image into `<its folder>/<target_folder>/`.
    ///
    /// Per-file problems never abort the batch; they are sorted into the
    /// response's `failed` and `conflicts` lists.
    pub fn save_selected(
        &self,
        selected: &[String],
        target_folder: &str,
    ) -> Result<SaveResponse, LibraryError> {
        let target_folder = if target_folder.is_empty() {
            DEFAULT_SAVE_FOLDER.to_string()
        } else {
            clean_relative(target_folder)?
        };
        if target_folder.is_empty() || target_folder.contains('/') {
            return Err(LibraryError::Forbidden(target_folder));
        }

        let mut resp = SaveResponse {
            target_folder: target_folder.clone(),
            ..SaveResponse::default()
        };

        for image in selected {
            match self.move_into(image, &target_folder) {
                Ok(MoveOutcome::Moved(to)) => {
                    tracing::info!(image = %image, to = %to.display(), "saved image");
                    resp.success.push(image.clone());
                }
                Ok(MoveOutcome::AlreadyThere) => resp.conflicts.push(image.clone()),
                Err(err) => {
                    tracing::warn!(image = %image, %err, "save failed");
                    resp.failed.push(image.clone());
                }
            }
        }
        Ok(resp)
    }

    fn move_into(&self, image: &str, target_folder: &str) -> Result<MoveOutcome, LibraryError> {
        let (clean, source) = self.resolve(image)?;
        if clean.is_empty() {
            return Err(LibraryError::Forbidden(image.to_string()));
        }
        if !source.is_file() {
            return Err(LibraryError::NotFound(clean));
        }
        let parent = source.parent().unwrap_or(&self.root);
        let target_dir = parent.join(target_folder);
        fs::create_dir_all(&target_dir)
            .map_err(|e| LibraryError::io(format!("create {}", target_dir.display()), e))?;

        let file_name = Path::new(&clean)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| LibraryError::Forbidden(image.to_string()))?;
        let (stem, ext) = match file_name.rsplit_once('.') {
            Some((s, e)) if !s.is_empty() => (s, format!(".{e}")),
            _ => (file_name, String::new()),
        };

        let mut target = target_dir.join(file_name);
        let mut counter = 1;
        while target.exists() {
            if same_file(&source, &target) {
                return Ok(MoveOutcome::AlreadyThere);
            }
            target = target_dir.join(format!("{stem}_{counter}{ext}"));
            counter += 1;
        }

        fs::rename(&source, &target).map_err(|e| LibraryError::io(clean, e))?;
        Ok(MoveOutcome::Moved(target))
    }

    fn sorted_entries(&self, dir: &Path, rel: &str) -> Result<Vec<fs::DirEntry>, LibraryError> {
        let mut entries = fs::read_dir(dir)
            .map_err(|e| LibraryError::io(rel.to_string(), e))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| LibraryError::io(rel.to_string(), e))?;
        entries.sort_by_key(|e| e.file_name());
        Ok(entries)
    }
}

enum MoveOutcome {
    Moved(PathBuf),
    AlreadyThere,
}

// Same size and modification time counts as the same file.
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(ma), Ok(mb)) => {
            ma.len() == mb.len() && ma.modified().ok() == mb.modified().ok()
        }
        _ => false,
    }
}

#[cfg(test)]
#[path = "tests/library_tests.rs"]
mod tests;

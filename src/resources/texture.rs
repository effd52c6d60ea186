use std::path::{Path, PathBuf};

use anyhow::Context;
use futures::{FutureExt, future::LocalBoxFuture};
use image::DynamicImage;
use thiserror::Error;

/// Why an image could not be turned into a texture.
///
/// Fetching and decoding fail for different reasons (missing file, offline host vs.
/// truncated or unsupported data) so they are reported separately.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("no image source was given")]
    EmptySource,
    #[error("failed to fetch image {src}: {source}")]
    Fetch {
        src: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("failed to decode image {src}: {source}")]
    Decode {
        src: String,
        #[source]
        source: image::ImageError,
    },
}

impl LoadError {
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

/// Resolves an image source into decoded pixels.
///
/// The returned future must not borrow the loader: artwork nodes keep it around
/// while they go on changing, and may start a newer load before it resolves.
pub trait ImageLoader {
    fn load(&self, src: &str) -> LocalBoxFuture<'static, Result<DynamicImage, LoadError>>;
}

/// Decode raw image file contents (PNG, JPEG, ...). The format is detected from the data.
pub fn decode(src: &str, bytes: &[u8]) -> Result<DynamicImage, LoadError> {
    image::load_from_memory(bytes).map_err(|source| LoadError::Decode {
        src: src.to_string(),
        source,
    })
}

fn is_remote(src: &str) -> bool {
    src.starts_with("http://") || src.starts_with("https://")
}

async fn fetch_remote(url: &str) -> anyhow::Result<Vec<u8>> {
    let response = reqwest::get(url).await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}

#[cfg(target_arch = "wasm32")]
fn format_url(root: &Path, file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().context("no window available")?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| anyhow::anyhow!("window location has no origin"))?;
    let base = reqwest::Url::parse(&format!("{}/", origin))?;
    let root = root.to_string_lossy();
    let root = root.trim_start_matches("./").trim_end_matches('/');
    Ok(base.join(&format!("{}/", root))?.join(file_name)?)
}

/// Loads images from the asset directory, local paths, or over HTTP.
///
/// * `http://` and `https://` sources are downloaded.
/// * `file://` sources and absolute paths are read as they are.
/// * Anything else is relative to `root` (on the web: relative to `<origin>/<root>/`).
#[derive(Clone, Debug)]
pub struct AssetLoader {
    root: PathBuf,
}

impl AssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve_path(&self, src: &str) -> PathBuf {
        if let Some(path) = src.strip_prefix("file://") {
            return PathBuf::from(path);
        }
        let path = Path::new(src);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    pub async fn load_binary(&self, src: &str) -> anyhow::Result<Vec<u8>> {
        if is_remote(src) {
            return fetch_remote(src).await;
        }

        #[cfg(target_arch = "wasm32")]
        let data = {
            let url = format_url(&self.root, src)?;
            fetch_remote(url.as_str()).await?
        };
        #[cfg(not(target_arch = "wasm32"))]
        let data = {
            let path = self.resolve_path(src);
            tokio::fs::read(&path)
                .await
                .with_context(|| format!("could not read {}", path.display()))?
        };

        Ok(data)
    }
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self::new(Path::new("./").join("assets"))
    }
}

impl ImageLoader for AssetLoader {
    fn load(&self, src: &str) -> LocalBoxFuture<'static, Result<DynamicImage, LoadError>> {
        let loader = self.clone();
        let src = src.to_string();
        async move {
            if src.trim().is_empty() {
                return Err(LoadError::EmptySource);
            }
            let started = instant::Instant::now();
            let bytes = loader
                .load_binary(&src)
                .await
                .map_err(|source| LoadError::Fetch {
                    src: src.clone(),
                    source,
                })?;
            let img = decode(&src, &bytes)?;
            log::debug!(
                "decoded {} ({}x{}) in {:?}",
                src,
                img.width(),
                img.height(),
                started.elapsed()
            );
            Ok(img)
        }
        .boxed_local()
    }
}

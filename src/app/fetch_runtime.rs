//! Background feed and image jobs to keep the UI thread responsive.
//!
//! Every job reports back over one unbounded channel, tagged with the
//! generation it was started for so results from a superseded reload can be
//! dropped by the receiver.  Image batches can also be cancelled outright so
//! superseded downloads stop early.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use image::RgbaImage;
use tokio::sync::{mpsc, Semaphore};

use crate::core::feed::{parse_image_list, FeedError, Source};

/// Longest edge kept after decoding.
pub const MAX_THUMB_EDGE: u32 = 512;
/// Image downloads allowed in flight at once.
pub const MAX_IN_FLIGHT: usize = 4;

pub enum FetchUpdate {
    ImageList {
        generation: u64,
        result: Result<Vec<String>, FeedError>,
    },
    ImageDecoded {
        generation: u64,
        index: usize,
        result: Result<Arc<RgbaImage>, FeedError>,
    },
}

pub fn spawn_list_fetch(
    tx: mpsc::UnboundedSender<FetchUpdate>,
    client: reqwest::Client,
    generation: u64,
    source: Source,
    field: String,
) {
    tokio::spawn(async move {
        let result = load_image_list(&client, &source, &field).await;
        let _ = tx.send(FetchUpdate::ImageList { generation, result });
    });
}

/// Handle to a running image batch.
pub struct ImageBatch {
    pub generation: u64,
    /// Shared flag polled by the batch's tasks between steps.
    cancel: Arc<AtomicBool>,
}

impl ImageBatch {
    /// Ask every task in the batch to stop at its next checkpoint.  Tasks
    /// that stop send nothing.
    pub fn request_cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

/// Start one download per image, at most [`MAX_IN_FLIGHT`] at a time.
/// Relative paths are resolved against `base_dir` (the feed file's folder).
pub fn spawn_image_fetches(
    tx: mpsc::UnboundedSender<FetchUpdate>,
    client: reqwest::Client,
    generation: u64,
    images: &[String],
    base_dir: Option<&Path>,
) -> ImageBatch {
    let cancel = Arc::new(AtomicBool::new(false));
    let permits = Arc::new(Semaphore::new(MAX_IN_FLIGHT));
    for (index, location) in images.iter().enumerate() {
        let source = resolve_image(location, base_dir);
        let tx = tx.clone();
        let client = client.clone();
        let permits = Arc::clone(&permits);
        let cancel = Arc::clone(&cancel);
        tokio::spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                return;
            };
            if cancel.load(Ordering::Relaxed) || tx.is_closed() {
                return;
            }
            let Some(result) = load_thumbnail(&client, source, &cancel).await else {
                tracing::trace!(generation, index, "image fetch cancelled");
                return;
            };
            let _ = tx.send(FetchUpdate::ImageDecoded {
                generation,
                index,
                result: result.map(Arc::new),
            });
        });
    }
    ImageBatch { generation, cancel }
}

pub async fn load_image_list(
    client: &reqwest::Client,
    source: &Source,
    field: &str,
) -> Result<Vec<String>, FeedError> {
    let bytes = load_bytes(client, source).await?;
    let body = String::from_utf8_lossy(&bytes);
    let images = parse_image_list(&body, field)?;
    tracing::info!(count = images.len(), ?source, "image list loaded");
    Ok(images)
}

/// `None` when the batch was cancelled before decoding started.
async fn load_thumbnail(
    client: &reqwest::Client,
    source: Source,
    cancel: &AtomicBool,
) -> Option<Result<RgbaImage, FeedError>> {
    let bytes = match load_bytes(client, &source).await {
        Ok(bytes) => bytes,
        Err(e) => return Some(Err(e)),
    };
    if cancel.load(Ordering::Relaxed) {
        return None;
    }
    let decoded = tokio::task::spawn_blocking(move || decode_thumbnail(&bytes)).await;
    Some(decoded.map_err(FeedError::from).and_then(|result| result))
}

async fn load_bytes(client: &reqwest::Client, source: &Source) -> Result<Vec<u8>, FeedError> {
    match source {
        Source::Http(url) => {
            let response = client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(FeedError::Status(status.as_u16()));
            }
            Ok(response.bytes().await?.to_vec())
        }
        Source::File(path) => Ok(tokio::fs::read(path).await?),
    }
}

/// Decode and shrink so the long edge is at most [`MAX_THUMB_EDGE`].
pub fn decode_thumbnail(bytes: &[u8]) -> Result<RgbaImage, FeedError> {
    let decoded = image::load_from_memory(bytes)?;
    let shrunk = if decoded.width().max(decoded.height()) > MAX_THUMB_EDGE {
        decoded.thumbnail(MAX_THUMB_EDGE, MAX_THUMB_EDGE)
    } else {
        decoded
    };
    Ok(shrunk.to_rgba8())
}

fn resolve_image(location: &str, base_dir: Option<&Path>) -> Source {
    match Source::parse(location) {
        Source::File(path) if path.is_relative() => match base_dir {
            Some(dir) => Source::File(dir.join(path)),
            None => Source::File(path),
        },
        other => other,
    }
}

/// Folder a file feed lives in; `None` for HTTP feeds.
pub fn feed_base_dir(source: &Source) -> Option<PathBuf> {
    match source {
        Source::File(path) => path.parent().map(Path::to_path_buf),
        Source::Http(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("image-reel-{name}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn large_images_are_shrunk_keeping_aspect() {
        let thumb = decode_thumbnail(&png_bytes(1024, 256)).unwrap();
        assert_eq!((thumb.width(), thumb.height()), (512, 128));

        let small = decode_thumbnail(&png_bytes(40, 30)).unwrap();
        assert_eq!((small.width(), small.height()), (40, 30));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(
            decode_thumbnail(b"definitely not an image"),
            Err(FeedError::Decode(_))
        ));
    }

    #[test]
    fn relative_images_resolve_against_feed_folder() {
        let base = Path::new("/srv/feeds");
        assert_eq!(
            resolve_image("a.png", Some(base)),
            Source::File(PathBuf::from("/srv/feeds/a.png"))
        );
        assert_eq!(
            resolve_image("/abs/b.png", Some(base)),
            Source::File(PathBuf::from("/abs/b.png"))
        );
        assert_eq!(
            resolve_image("https://x/c.jpg", Some(base)),
            Source::Http("https://x/c.jpg".into())
        );
    }

    #[tokio::test]
    async fn file_feed_loads_images_end_to_end() {
        let dir = scratch_dir("feed");
        std::fs::write(dir.join("one.png"), png_bytes(8, 4)).unwrap();
        std::fs::write(dir.join("feed.json"), r#"{"message":["one.png","missing.png"]}"#)
            .unwrap();

        let client = reqwest::Client::new();
        let source = Source::File(dir.join("feed.json"));
        let images = load_image_list(&client, &source, "message").await.unwrap();
        assert_eq!(images, vec!["one.png", "missing.png"]);

        let (tx, mut rx) = mpsc::unbounded_channel();
        let base = feed_base_dir(&source);
        let _batch = spawn_image_fetches(tx, client, 7, &images, base.as_deref());

        let mut decoded = Vec::new();
        while let Some(update) = rx.recv().await {
            if let FetchUpdate::ImageDecoded {
                generation,
                index,
                result,
            } = update
            {
                assert_eq!(generation, 7);
                decoded.push((index, result.is_ok()));
            }
        }
        decoded.sort();
        assert_eq!(decoded, vec![(0, true), (1, false)]);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn cancelled_batch_sends_nothing() {
        let dir = scratch_dir("cancel");
        std::fs::write(dir.join("one.png"), png_bytes(8, 4)).unwrap();
        std::fs::write(dir.join("two.png"), png_bytes(4, 8)).unwrap();
        let images = vec!["one.png".to_string(), "two.png".to_string()];

        let (tx, mut rx) = mpsc::unbounded_channel();
        let batch = spawn_image_fetches(tx, reqwest::Client::new(), 3, &images, Some(&dir));
        // The test runtime is single-threaded: no task has run yet.
        batch.request_cancel();

        assert!(rx.recv().await.is_none());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn missing_feed_file_is_an_io_error() {
        let client = reqwest::Client::new();
        let source = Source::File(scratch_dir("nofeed").join("absent.json"));
        assert!(matches!(
            load_image_list(&client, &source, "message").await,
            Err(FeedError::Io(_))
        ));
    }
}

//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use image::RgbaImage;
use ratatui::layout::Rect;

use super::fetch_runtime::{FetchUpdate, ImageBatch};
use crate::config::AppConfig;
use crate::core::feed::Source;
use crate::core::scrubber::Scrubber;
use crate::core::strip::{StripEngine, StripOptions};
use crate::core::window::WindowListeners;
use crate::ui::layout::AppLayout;
use crate::ui::lightbox::LightboxHitZones;
use crate::ui::smooth_scroll::SmoothScroll;
use crate::ui::strip::SlideHit;

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Carousel,
    Lightbox,
}

/// Which control receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Strip,
    Scrubber,
}

impl Focus {
    pub fn cycle(self) -> Self {
        match self {
            Focus::Strip => Focus::Scrubber,
            Focus::Scrubber => Focus::Strip,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStatus {
    Loading,
    Failed(String),
    Ready,
}

/// Clickable regions recorded by the last draw.
#[derive(Debug, Clone, Default)]
pub struct HitZones {
    pub layout: Option<AppLayout>,
    pub track: Rect,
    pub slides: Vec<SlideHit>,
    pub lightbox: Option<LightboxHitZones>,
}

/// Top-level application state.
pub struct AppState {
    /// Where the image list comes from.
    pub source: Source,
    /// Image locations for the current generation.
    pub images: Vec<String>,
    pub feed_status: FeedStatus,
    /// Bumped on every reload; background results for older values are
    /// dropped.
    pub generation: u64,
    pub engine: StripEngine,
    pub window: WindowListeners,
    pub scrubber: Scrubber,
    /// Decoded, downscaled images by slide index.
    pub thumbnails: HashMap<usize, Arc<RgbaImage>>,
    /// Slides whose image could not be fetched or decoded.
    pub failed_images: HashSet<usize>,
    pub focus: Focus,
    pub active_view: ActiveView,
    /// Slide shown in the lightbox.
    pub lightbox_index: usize,
    /// Focus to restore when the lightbox closes.
    pub lightbox_return_focus: Focus,
    pub hit_zones: HitZones,
    pub strip_scroll: SmoothScroll,
    /// Monotonic tick counter for the spinner.
    pub tick: u64,
    pub config: AppConfig,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// Set when the image list should be (re)fetched after the next draw.
    pub needs_reload: bool,
    /// Set when a fresh image list arrived and its images should be fetched.
    pub needs_image_fetch: bool,
    /// Downloads started for the current image list.
    pub image_batch: Option<ImageBatch>,
    pub terminal_area: Rect,
}

impl AppState {
    pub fn new(source: Source, config: AppConfig) -> Self {
        let mut engine = StripEngine::new(StripOptions {
            loop_slides: config.loop_slides,
        });
        let window = WindowListeners::new();
        let scrubber = Scrubber::mount(0, &mut engine, window.clone());
        Self {
            source,
            images: Vec::new(),
            feed_status: FeedStatus::Loading,
            generation: 0,
            engine,
            window,
            scrubber,
            thumbnails: HashMap::new(),
            failed_images: HashSet::new(),
            focus: Focus::default(),
            active_view: ActiveView::default(),
            lightbox_index: 0,
            lightbox_return_focus: Focus::default(),
            hit_zones: HitZones::default(),
            strip_scroll: SmoothScroll::new(0.35),
            tick: 0,
            config,
            should_quit: false,
            needs_reload: true,
            needs_image_fetch: false,
            image_batch: None,
            terminal_area: Rect::default(),
        }
    }

    /// Drop everything tied to the current image list and schedule a fresh
    /// fetch.
    pub fn request_reload(&mut self) {
        if let Some(batch) = self.image_batch.take() {
            tracing::debug!(generation = batch.generation, "cancelling superseded image batch");
            batch.request_cancel();
        }
        self.generation = self.generation.wrapping_add(1);
        self.images.clear();
        self.thumbnails.clear();
        self.failed_images.clear();
        self.feed_status = FeedStatus::Loading;
        self.active_view = ActiveView::Carousel;
        self.engine.reset();
        self.strip_scroll.reset();
        self.remount_scrubber();
        self.needs_reload = true;
        self.needs_image_fetch = false;
    }

    /// Replace the scrubber with one sized for the current image list,
    /// releasing everything the old one held.
    pub fn remount_scrubber(&mut self) {
        let fresh = Scrubber::mount(self.images.len(), &mut self.engine, self.window.clone());
        std::mem::replace(&mut self.scrubber, fresh).unmount();
    }

    /// Fold a background result into the state.  Results from an older
    /// generation are ignored.
    pub fn apply_fetch_update(&mut self, update: FetchUpdate) {
        match update {
            FetchUpdate::ImageList { generation, result } => {
                if generation != self.generation {
                    tracing::debug!(generation, current = self.generation, "stale image list dropped");
                    return;
                }
                match result {
                    Ok(images) => {
                        self.images = images;
                        self.feed_status = FeedStatus::Ready;
                        self.remount_scrubber();
                        self.needs_image_fetch = !self.images.is_empty();
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "image list fetch failed");
                        self.images.clear();
                        self.feed_status = FeedStatus::Failed(err.to_string());
                        self.remount_scrubber();
                    }
                }
            }
            FetchUpdate::ImageDecoded {
                generation,
                index,
                result,
            } => {
                if generation != self.generation || index >= self.images.len() {
                    return;
                }
                match result {
                    Ok(image) => {
                        self.thumbnails.insert(index, image);
                    }
                    Err(err) => {
                        tracing::warn!(index, error = %err, "image fetch failed");
                        self.failed_images.insert(index);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::feed::FeedError;

    fn state() -> AppState {
        AppState::new(Source::parse("feed.json"), AppConfig::default())
    }

    fn list(generation: u64, count: usize) -> FetchUpdate {
        FetchUpdate::ImageList {
            generation,
            result: Ok((0..count).map(|i| format!("{i}.png")).collect()),
        }
    }

    #[test]
    fn image_list_mounts_a_sized_scrubber() {
        let mut state = state();
        state.apply_fetch_update(list(0, 3));
        assert_eq!(state.feed_status, FeedStatus::Ready);
        assert_eq!(state.scrubber.image_count(), 3);
        assert!(state.needs_image_fetch);
    }

    #[test]
    fn stale_generations_are_ignored() {
        let mut state = state();
        state.request_reload();
        state.apply_fetch_update(list(0, 3));
        assert_eq!(state.feed_status, FeedStatus::Loading);
        assert!(state.images.is_empty());

        state.apply_fetch_update(list(1, 2));
        state.apply_fetch_update(FetchUpdate::ImageDecoded {
            generation: 0,
            index: 0,
            result: Err(FeedError::Status(404)),
        });
        assert!(state.failed_images.is_empty());
    }

    #[test]
    fn failed_list_and_failed_images_are_recorded() {
        let mut state = state();
        state.apply_fetch_update(FetchUpdate::ImageList {
            generation: 0,
            result: Err(FeedError::Status(500)),
        });
        assert_eq!(state.feed_status, FeedStatus::Failed("HTTP 500".into()));
        assert_eq!(state.scrubber.displayed_count(), "0 / 0");

        state.request_reload();
        state.apply_fetch_update(list(1, 2));
        state.apply_fetch_update(FetchUpdate::ImageDecoded {
            generation: 1,
            index: 1,
            result: Err(FeedError::Status(404)),
        });
        assert!(state.failed_images.contains(&1));
    }

    #[test]
    fn reload_releases_window_routes_and_old_subscription() {
        let mut state = state();
        state.apply_fetch_update(list(0, 4));
        state.engine.reinit(&[10, 10, 10, 10], 2, 40);
        state.engine.flush();

        let bounds = crate::core::position::TrackBounds::new(0.0, 10.0);
        state.scrubber.pointer_down(5.0, bounds, &state.engine);
        assert!(!state.window.is_empty());

        state.request_reload();
        assert!(state.window.is_empty());
        assert!(!state.scrubber.is_dragging());
        assert_eq!(state.scrubber.image_count(), 0);
        assert!(state.needs_reload);
    }

    #[tokio::test]
    async fn reload_cancels_the_running_image_batch() {
        let mut state = state();
        state.apply_fetch_update(list(0, 2));
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        state.image_batch = Some(crate::app::fetch_runtime::spawn_image_fetches(
            tx,
            reqwest::Client::new(),
            state.generation,
            &state.images,
            None,
        ));

        state.request_reload();
        assert!(state.image_batch.is_none());
        // Cancelled before any task ran, so not even the failures arrive.
        assert!(rx.recv().await.is_none());
    }
}

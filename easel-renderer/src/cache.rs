//! Asynchronous image cache.
//!
//! Each distinct `src` is fetched at most once. Loads run as tokio tasks and
//! report back through an mpsc channel that only the owner of the cache
//! drains, so cache state is only ever touched from the event-loop thread.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error::{RenderError, RenderResult};
use crate::image::{DefaultImageLoader, ImageLoader, LoadedImage};

/// Load state of one image source.
#[derive(Debug, Clone)]
pub enum ImageState {
    /// Fetch or decode in flight.
    Loading,
    /// Decoded and drawable.
    Ready(Arc<LoadedImage>),
    /// Load failed; never retried.
    Failed,
}

impl ImageState {
    /// Whether the load has finished, successfully or not.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Loading)
    }
}

/// Completion notice posted by a load task.
#[derive(Debug)]
pub struct LoadEvent {
    generation: u64,
    /// Source that finished loading.
    pub src: String,
    result: RenderResult<Arc<LoadedImage>>,
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Loads started.
    pub requests: u64,
    /// Loads that produced an image.
    pub loaded: u64,
    /// Loads that failed.
    pub failed: u64,
    /// Completions discarded because the cache was cleared meanwhile.
    pub stale: u64,
}

/// Per-`src` image cache fed by background load tasks.
pub struct ImageCache {
    entries: HashMap<String, ImageState>,
    loader: Arc<dyn ImageLoader>,
    tx: mpsc::UnboundedSender<LoadEvent>,
    rx: mpsc::UnboundedReceiver<LoadEvent>,
    generation: u64,
    stats: CacheStats,
}

impl ImageCache {
    /// Create a cache that loads `data:` URIs and filesystem paths.
    #[must_use]
    pub fn new() -> Self {
        Self::with_loader(DefaultImageLoader)
    }

    /// Create a cache with a custom loader.
    #[must_use]
    pub fn with_loader(loader: impl ImageLoader + 'static) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            entries: HashMap::new(),
            loader: Arc::new(loader),
            tx,
            rx,
            generation: 0,
            stats: CacheStats::default(),
        }
    }

    /// Start loading `src` unless it is already known.
    ///
    /// Needs a tokio runtime on the current thread; without one the entry is
    /// marked failed.
    pub fn request(&mut self, src: &str) {
        if self.entries.contains_key(src) {
            return;
        }
        self.stats.requests += 1;

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(src, error = %RenderError::NoRuntime, "image load not started");
            self.stats.failed += 1;
            self.entries.insert(src.to_string(), ImageState::Failed);
            return;
        };

        tracing::debug!(src, "image load started");
        self.entries.insert(src.to_string(), ImageState::Loading);

        let fetch = self.loader.fetch(src);
        let tx = self.tx.clone();
        let generation = self.generation;
        let src = src.to_string();
        runtime.spawn(async move {
            let result = match fetch.await {
                Ok(bytes) => LoadedImage::decode(src.clone(), &bytes),
                Err(e) => Err(e),
            };
            // The cache may be gone by now.
            let _ = tx.send(LoadEvent {
                generation,
                src,
                result,
            });
        });
    }

    /// Load state of `src`, if it was ever requested.
    #[must_use]
    pub fn state(&self, src: &str) -> Option<&ImageState> {
        self.entries.get(src)
    }

    /// The decoded image for `src`, once ready.
    #[must_use]
    pub fn get(&self, src: &str) -> Option<Arc<LoadedImage>> {
        match self.entries.get(src) {
            Some(ImageState::Ready(image)) => Some(Arc::clone(image)),
            _ => None,
        }
    }

    /// Number of loads still in flight.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.entries
            .values()
            .filter(|state| !state.is_settled())
            .count()
    }

    /// Apply every completed load without waiting.
    ///
    /// Returns `true` if any entry changed and a redraw is due.
    pub fn poll_loaded(&mut self) -> bool {
        let mut changed = false;
        while let Ok(event) = self.rx.try_recv() {
            changed |= self.apply(event);
        }
        changed
    }

    /// Wait for the next load to complete and apply it.
    ///
    /// Returns `false` immediately when nothing is in flight.
    pub async fn next_event(&mut self) -> bool {
        while self.pending() > 0 {
            let Some(event) = self.rx.recv().await else {
                return false;
            };
            if self.apply(event) {
                return true;
            }
        }
        false
    }

    /// Forget every entry. Loads still in flight are discarded on arrival.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.generation += 1;
    }

    /// Number of known sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no source was requested yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cache statistics.
    #[must_use]
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    fn apply(&mut self, event: LoadEvent) -> bool {
        if event.generation != self.generation {
            self.stats.stale += 1;
            tracing::trace!(src = %event.src, "discarding stale image load");
            return false;
        }
        let state = match event.result {
            Ok(image) => {
                tracing::debug!(
                    src = %event.src,
                    width = image.texture.width,
                    height = image.texture.height,
                    format = ?image.texture.format,
                    "image ready"
                );
                self.stats.loaded += 1;
                ImageState::Ready(image)
            }
            Err(e) => {
                tracing::warn!(src = %event.src, error = %e, "image load failed");
                self.stats.failed += 1;
                ImageState::Failed
            }
        };
        self.entries.insert(event.src, state);
        true
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("entries", &self.entries.len())
            .field("generation", &self.generation)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use futures::future::BoxFuture;

    use super::*;
    use crate::image::{encode_png_data_uri, ImageFormat, TextureData};

    fn red_data_uri() -> String {
        encode_png_data_uri(&TextureData {
            width: 2,
            height: 2,
            data: [255u8, 0, 0, 255].repeat(4),
            format: ImageFormat::Png,
        })
        .expect("encode")
    }

    struct FailingLoader;

    impl ImageLoader for FailingLoader {
        fn fetch(&self, src: &str) -> BoxFuture<'static, RenderResult<Vec<u8>>> {
            let src = src.to_string();
            Box::pin(async move { Err(RenderError::Resource(src)) })
        }
    }

    #[test]
    fn test_request_without_runtime_fails() {
        let mut cache = ImageCache::new();
        cache.request("cat.png");
        assert!(matches!(cache.state("cat.png"), Some(ImageState::Failed)));
        assert_eq!(cache.pending(), 0);
        assert_eq!(cache.stats().failed, 1);
    }

    #[tokio::test]
    async fn test_load_data_uri() {
        let mut cache = ImageCache::new();
        let src = red_data_uri();

        cache.request(&src);
        assert!(matches!(cache.state(&src), Some(ImageState::Loading)));
        assert!(cache.get(&src).is_none());

        assert!(cache.next_event().await);
        let image = cache.get(&src).expect("ready");
        assert_eq!((image.texture.width, image.texture.height), (2, 2));
        assert_eq!(image.texture.format, ImageFormat::Png);
        assert_eq!(cache.stats().loaded, 1);
    }

    #[tokio::test]
    async fn test_duplicate_requests_load_once() {
        let mut cache = ImageCache::new();
        let src = red_data_uri();

        cache.request(&src);
        cache.request(&src);
        assert_eq!(cache.stats().requests, 1);
        assert!(cache.next_event().await);
        cache.request(&src);
        assert_eq!(cache.stats().requests, 1);
        assert!(!cache.next_event().await);
    }

    #[tokio::test]
    async fn test_failed_load_is_not_retried() {
        let mut cache = ImageCache::with_loader(FailingLoader);

        cache.request("missing.png");
        assert!(cache.next_event().await);
        assert!(matches!(cache.state("missing.png"), Some(ImageState::Failed)));

        cache.request("missing.png");
        assert_eq!(cache.stats().requests, 1);
        assert_eq!(cache.pending(), 0);
    }

    #[tokio::test]
    async fn test_missing_file_fails() {
        let mut cache = ImageCache::new();
        cache.request("/nonexistent/easel/cat.png");
        assert!(cache.next_event().await);
        assert!(cache.get("/nonexistent/easel/cat.png").is_none());
        assert_eq!(cache.stats().failed, 1);
    }

    #[tokio::test]
    async fn test_clear_discards_in_flight_loads() {
        let mut cache = ImageCache::new();
        let src = red_data_uri();

        cache.request(&src);
        cache.clear();
        assert!(cache.is_empty());

        // Let the load task run to completion.
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        assert!(!cache.poll_loaded());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_poll_without_events() {
        let mut cache = ImageCache::new();
        assert!(!cache.poll_loaded());
        assert!(!cache.next_event().await);
    }
}

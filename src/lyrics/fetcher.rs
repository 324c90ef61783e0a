use log::{debug, error, warn};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use super::genius::LyricsSource;
use super::snippet::{select_snippet, LyricSnippet};
use crate::runtime::AppEvent;

/// A lyrics lookup the session wants performed. `generation` identifies the
/// song draw it belongs to; deliveries for older generations are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricsRequest {
    pub generation: u64,
    pub title: String,
    pub artist: String,
}

/// Result of a lookup, already cut down to a snippet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LyricsDelivery {
    pub generation: u64,
    pub song: String,
    pub snippet: LyricSnippet,
    pub source_url: Option<String>,
}

impl LyricsDelivery {
    fn not_found(request: &LyricsRequest) -> Self {
        Self {
            generation: request.generation,
            song: request.title.clone(),
            snippet: LyricSnippet::not_found(),
            source_url: None,
        }
    }
}

/// Run a lookup and select a snippet. Every failure of the source ends up
/// as the not-found snippet.
pub fn resolve(source: &dyn LyricsSource, request: &LyricsRequest) -> LyricsDelivery {
    match source.fetch_lyrics(&request.title, &request.artist) {
        Ok(Some(lyrics)) => {
            let snippet = select_snippet(&lyrics.text);
            if snippet.is_not_found() {
                warn!(
                    "No suitable lyrics found for {:?} by {:?}",
                    request.title, request.artist
                );
            }
            LyricsDelivery {
                generation: request.generation,
                song: request.title.clone(),
                snippet,
                source_url: lyrics.source_url,
            }
        }
        Ok(None) => {
            warn!("Lyrics not found for {:?} by {:?}", request.title, request.artist);
            LyricsDelivery::not_found(request)
        }
        Err(err) => {
            error!(
                "Error getting lyrics for {:?} by {:?}: {err}",
                request.title, request.artist
            );
            LyricsDelivery::not_found(request)
        }
    }
}

/// Performs lookups off the main thread and posts the outcome back into the
/// event loop as `AppEvent::Lyrics`.
pub struct LyricsFetcher {
    source: Arc<dyn LyricsSource>,
    events: Sender<AppEvent>,
}

impl LyricsFetcher {
    pub fn new(source: Arc<dyn LyricsSource>, events: Sender<AppEvent>) -> Self {
        Self { source, events }
    }

    pub fn fetch(&self, request: LyricsRequest) {
        debug!(
            "Fetching lyrics for {:?} (generation {})",
            request.title, request.generation
        );
        let source = Arc::clone(&self.source);
        let events = self.events.clone();
        let fallback = LyricsDelivery::not_found(&request);

        let spawned = thread::Builder::new()
            .name("lyrics-fetch".to_string())
            .spawn(move || {
                let delivery =
                    panic::catch_unwind(AssertUnwindSafe(|| resolve(source.as_ref(), &request)))
                        .unwrap_or_else(|_| {
                            error!("Lyrics lookup for {:?} panicked", request.title);
                            LyricsDelivery::not_found(&request)
                        });
                if events.send(AppEvent::Lyrics(delivery)).is_err() {
                    debug!("Event loop gone, dropping lyrics for {:?}", request.title);
                }
            });

        if let Err(err) = spawned {
            error!("Could not start lyrics fetch thread: {err}");
            let _ = self.events.send(AppEvent::Lyrics(fallback));
        }
    }
}

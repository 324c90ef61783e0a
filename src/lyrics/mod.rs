pub mod fetcher;
pub mod genius;
pub mod snippet;

pub use fetcher::{LyricsDelivery, LyricsFetcher, LyricsRequest};
pub use genius::{FetchedLyrics, GeniusClient, LyricsSource, StaticLyricsSource};
pub use snippet::{select_snippet, select_snippet_with, LyricSnippet, NOT_FOUND_SNIPPET};

//! Genius lyrics lookup.
//!
//! The API search endpoint only returns song metadata, so the lyrics text is
//! taken from the song page: every `data-lyrics-container` block, with line
//! breaks kept and markup dropped.

use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::time::Duration;

use crate::error::LyricsError;

const GENIUS_API_URL: &str = "https://api.genius.com";
const USER_AGENT: &str = concat!("melo/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

static CONTAINER_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<div[^>]*data-lyrics-container="true"[^>]*>"#).unwrap());
static LINE_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static NUMERIC_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").unwrap());

/// Full lyrics of one song as returned by a lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedLyrics {
    pub text: String,
    pub source_url: Option<String>,
}

/// Anything that can look up the lyrics of a song.
/// `Ok(None)` means the provider has no match for the song.
pub trait LyricsSource: Send + Sync + 'static {
    fn fetch_lyrics(&self, title: &str, artist: &str)
        -> Result<Option<FetchedLyrics>, LyricsError>;
}

#[derive(Deserialize, Debug)]
struct SearchResponse {
    response: SearchBody,
}

#[derive(Deserialize, Debug)]
struct SearchBody {
    hits: Vec<SearchHit>,
}

#[derive(Deserialize, Debug)]
struct SearchHit {
    result: SongHit,
}

#[derive(Deserialize, Debug)]
struct SongHit {
    title: String,
    url: String,
    primary_artist: PrimaryArtist,
}

#[derive(Deserialize, Debug)]
struct PrimaryArtist {
    name: String,
}

pub struct GeniusClient {
    agent: ureq::Agent,
    token: String,
}

impl GeniusClient {
    pub fn new(token: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();

        Self {
            agent,
            token: token.into(),
        }
    }

    fn search_url(&self, title: &str, artist: &str) -> String {
        let query = format!("{title} {artist}");
        format!("{GENIUS_API_URL}/search?q={}", urlencoding::encode(&query))
    }

    fn get_string(&self, url: &str, authorized: bool) -> Result<Option<String>, LyricsError> {
        let mut request = self.agent.get(url);
        if authorized {
            request = request.set("Authorization", &format!("Bearer {}", self.token));
        }

        let response = match request.call() {
            Ok(response) => response,
            Err(ureq::Error::Status(404, _)) => return Ok(None),
            Err(error) => return Err(error.into()),
        };

        let mut body = String::new();
        response.into_reader().read_to_string(&mut body)?;
        Ok(Some(body))
    }
}

impl LyricsSource for GeniusClient {
    fn fetch_lyrics(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<Option<FetchedLyrics>, LyricsError> {
        debug!("Searching Genius for {title:?} by {artist:?}");
        let Some(body) = self.get_string(&self.search_url(title, artist), true)? else {
            return Ok(None);
        };
        let search: SearchResponse = serde_json::from_str(&body)?;

        let Some(hit) = pick_hit(search.response.hits, artist) else {
            info!("No Genius match for {title:?} by {artist:?}");
            return Ok(None);
        };
        debug!("Genius matched {:?} at {}", hit.title, hit.url);

        let Some(page) = self.get_string(&hit.url, false)? else {
            return Ok(None);
        };
        let text = extract_lyrics(&page);
        if text.trim().is_empty() {
            info!("Genius page for {title:?} had no lyrics container");
            return Ok(None);
        }

        Ok(Some(FetchedLyrics {
            text,
            source_url: Some(hit.url),
        }))
    }
}

/// Prefer the first hit credited to the requested artist, else the first hit
fn pick_hit(hits: Vec<SearchHit>, artist: &str) -> Option<SongHit> {
    let artist = artist.to_lowercase();
    let mut songs: Vec<SongHit> = hits.into_iter().map(|hit| hit.result).collect();
    if songs.is_empty() {
        return None;
    }
    let index = songs
        .iter()
        .position(|song| song.primary_artist.name.to_lowercase() == artist)
        .unwrap_or(0);
    Some(songs.swap_remove(index))
}

/// Pull the lyric text out of a Genius song page
pub fn extract_lyrics(html: &str) -> String {
    let mut blocks = Vec::new();
    for open in CONTAINER_OPEN.find_iter(html) {
        if let Some(inner) = container_body(&html[open.end()..]) {
            blocks.push(inner);
        }
    }

    let joined = blocks.join("\n");
    let with_breaks = LINE_BREAK.replace_all(&joined, "\n");
    let stripped = TAG.replace_all(&with_breaks, "");
    decode_entities(&stripped).trim().to_string()
}

/// Body of a div up to its matching close tag; nested divs are balanced.
fn container_body(rest: &str) -> Option<&str> {
    let mut depth = 1usize;
    let mut cursor = 0;
    while let Some(offset) = rest[cursor..].find('<') {
        let at = cursor + offset;
        let tail = &rest[at..];
        if tail.starts_with("</div") {
            depth -= 1;
            if depth == 0 {
                return Some(&rest[..at]);
            }
        } else if tail.starts_with("<div") {
            depth += 1;
        }
        cursor = at + 1;
    }
    None
}

fn decode_entities(text: &str) -> String {
    let numeric = NUMERIC_ENTITY.replace_all(text, |caps: &regex::Captures| {
        let code = &caps[1];
        let value = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        value
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    numeric
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// In-memory lyrics keyed by (title, artist). Used by tests and demos.
#[derive(Debug, Default, Clone)]
pub struct StaticLyricsSource {
    songs: HashMap<(String, String), String>,
}

impl StaticLyricsSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_song(mut self, title: &str, artist: &str, lyrics: &str) -> Self {
        self.songs
            .insert((title.to_string(), artist.to_string()), lyrics.to_string());
        self
    }
}

impl LyricsSource for StaticLyricsSource {
    fn fetch_lyrics(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<Option<FetchedLyrics>, LyricsError> {
        Ok(self
            .songs
            .get(&(title.to_string(), artist.to_string()))
            .map(|text| FetchedLyrics {
                text: text.clone(),
                source_url: None,
            }))
    }
}

use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::catalog::{AlbumChoice, Catalog};
use crate::guess::is_correct;
use crate::lyrics::{LyricsDelivery, LyricsRequest};

pub const LOADING_SNIPPET: &str = "Now loading...";
pub const NO_SONG_MESSAGE: &str = "Please start a new song first!";
pub const INCORRECT_MESSAGE: &str = "Incorrect, try again!";
pub const HINT_REVEALED_MESSAGE: &str =
    "Hint revealed. This song no longer counts toward your score or streak.";
pub const HINT_ALREADY_USED_MESSAGE: &str = "You already used the hint for this song.";
pub const NO_HINTS_MESSAGE: &str = "No hints left for this song.";

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long a revealed title stays up before the next draw
    pub reveal_delay: Duration,
    /// Reserve lines appended per hint
    pub hint_lines: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reveal_delay: Duration::from_millis(2000),
            hint_lines: 2,
        }
    }
}

/// How a song ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Verdict {
    Correct,
    CorrectWithHint,
    Skipped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    SelectingAlbum,
    Playing,
    Revealed(Verdict),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// Blank input, or the song is already revealed
    Ignored,
    NoSong,
    Correct,
    CorrectWithHint,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HintOutcome {
    Revealed(Vec<String>),
    AlreadyUsed,
    NoneLeft,
    NoSong,
    Ignored,
}

/// A deferred draw. Only fires while `token` is still the session generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledDraw {
    pub due: Instant,
    pub token: u64,
}

/// In-memory state of one game, from album selection until the player
/// returns to the menu.
#[derive(Debug)]
pub struct Session {
    pub config: SessionConfig,
    pub phase: Phase,
    pub artist: Option<String>,
    pub album: Option<AlbumChoice>,
    pub pool: Vec<String>,
    pub current_song: Option<String>,
    pub score: u32,
    pub streak: u32,
    pub max_streak: u32,
    pub songs_played: u32,
    pub hint_used: bool,
    pub hints: VecDeque<String>,
    pub snippet: String,
    pub message: Option<String>,
    pub loading: bool,
    pub source_url: Option<String>,
    generation: u64,
    pending_draw: Option<ScheduledDraw>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            phase: Phase::SelectingAlbum,
            artist: None,
            album: None,
            pool: Vec::new(),
            current_song: None,
            score: 0,
            streak: 0,
            max_streak: 0,
            songs_played: 0,
            hint_used: false,
            hints: VecDeque::new(),
            snippet: String::new(),
            message: None,
            loading: false,
            source_url: None,
            generation: 0,
            pending_draw: None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn pending_draw(&self) -> Option<ScheduledDraw> {
        self.pending_draw
    }

    /// Start a game on the chosen part of an artist's discography and draw
    /// its first song.
    pub fn confirm_selection(
        &mut self,
        catalog: &Catalog,
        artist: &str,
        choice: AlbumChoice,
    ) -> Option<LyricsRequest> {
        self.confirm_selection_with(catalog, artist, choice, &mut rand::thread_rng())
    }

    pub fn confirm_selection_with<R: Rng>(
        &mut self,
        catalog: &Catalog,
        artist: &str,
        choice: AlbumChoice,
        rng: &mut R,
    ) -> Option<LyricsRequest> {
        self.pool = catalog.candidate_pool(artist, &choice);
        info!(
            "Playing {artist} / {} with {} songs",
            choice.label(),
            self.pool.len()
        );

        self.artist = Some(artist.to_string());
        self.album = Some(choice);
        self.score = 0;
        self.streak = 0;
        self.max_streak = 0;
        self.songs_played = 0;
        self.current_song = None;
        self.reset_song();
        self.phase = Phase::Playing;
        self.snippet = LOADING_SNIPPET.to_string();
        self.bump_generation();

        self.draw_song_with(rng)
    }

    pub fn draw_song(&mut self) -> Option<LyricsRequest> {
        self.draw_song_with(&mut rand::thread_rng())
    }

    /// Pick the next song at random, repeats allowed. An empty pool leaves
    /// the session untouched.
    pub fn draw_song_with<R: Rng>(&mut self, rng: &mut R) -> Option<LyricsRequest> {
        let song = self.pool.choose(rng)?.clone();
        let artist = self.artist.clone()?;

        self.bump_generation();
        self.reset_song();
        self.phase = Phase::Playing;
        self.songs_played += 1;
        self.current_song = Some(song.clone());
        self.snippet = LOADING_SNIPPET.to_string();
        self.loading = true;
        debug!("Drew {song:?} (generation {})", self.generation);

        Some(LyricsRequest {
            generation: self.generation,
            title: song,
            artist,
        })
    }

    /// Manual draw that leaves score and streak alone
    pub fn new_song(&mut self) -> Option<LyricsRequest> {
        if self.phase == Phase::SelectingAlbum {
            return None;
        }
        self.draw_song()
    }

    /// Apply a finished lookup. Returns false when it belongs to a song
    /// that is no longer current.
    pub fn deliver(&mut self, delivery: LyricsDelivery) -> bool {
        if delivery.generation != self.generation
            || self.current_song.as_deref() != Some(delivery.song.as_str())
        {
            debug!(
                "Discarding stale lyrics for {:?} (generation {}, current {})",
                delivery.song, delivery.generation, self.generation
            );
            return false;
        }

        self.snippet = delivery.snippet.text;
        self.hints = delivery.snippet.hints;
        self.source_url = delivery.source_url;
        self.loading = false;
        true
    }

    pub fn submit_guess(&mut self, guess: &str) -> GuessOutcome {
        let guess = guess.trim();
        if guess.is_empty() || matches!(self.phase, Phase::Revealed(_)) {
            return GuessOutcome::Ignored;
        }

        let Some(song) = self.current_song.clone() else {
            self.message = Some(NO_SONG_MESSAGE.to_string());
            return GuessOutcome::NoSong;
        };

        if !is_correct(guess, &song) {
            self.score = 0;
            self.message = Some(INCORRECT_MESSAGE.to_string());
            return GuessOutcome::Incorrect;
        }

        if self.hint_used {
            self.message = Some(format!(
                "Correct, but a hint was used. The song was {song}"
            ));
            self.reveal(Verdict::CorrectWithHint);
            GuessOutcome::CorrectWithHint
        } else {
            self.score += 1;
            self.streak += 1;
            self.max_streak = self.max_streak.max(self.streak);
            self.message = Some(format!("Correct! The song was {song}"));
            self.reveal(Verdict::Correct);
            GuessOutcome::Correct
        }
    }

    /// Give up on the current song. Score resets, streak survives.
    pub fn skip(&mut self) -> bool {
        if self.phase != Phase::Playing {
            return false;
        }
        let Some(song) = self.current_song.clone() else {
            return false;
        };

        self.score = 0;
        self.message = Some(format!("The song was: {song}"));
        self.reveal(Verdict::Skipped);
        true
    }

    pub fn request_hint(&mut self) -> HintOutcome {
        if self.current_song.is_none() {
            self.message = Some(NO_SONG_MESSAGE.to_string());
            return HintOutcome::NoSong;
        }
        if self.phase != Phase::Playing {
            return HintOutcome::Ignored;
        }
        if self.hint_used {
            self.message = Some(HINT_ALREADY_USED_MESSAGE.to_string());
            return HintOutcome::AlreadyUsed;
        }
        if self.hints.is_empty() {
            self.message = Some(NO_HINTS_MESSAGE.to_string());
            return HintOutcome::NoneLeft;
        }

        let take = self.config.hint_lines.max(1).min(self.hints.len());
        let lines: Vec<String> = self.hints.drain(..take).collect();
        for line in &lines {
            self.snippet.push('\n');
            self.snippet.push_str(line);
        }
        self.hint_used = true;
        self.message = Some(HINT_REVEALED_MESSAGE.to_string());
        HintOutcome::Revealed(lines)
    }

    /// Leave the game for the album picker
    pub fn return_to_menu(&mut self) {
        self.bump_generation();
        self.phase = Phase::SelectingAlbum;
        self.artist = None;
        self.album = None;
        self.pool.clear();
        self.current_song = None;
        self.max_streak = 0;
        self.reset_song();
        self.snippet.clear();
    }

    /// Fire the scheduled draw once it is due
    pub fn tick(&mut self, now: Instant) -> Option<LyricsRequest> {
        let draw = self.pending_draw.take()?;
        if draw.token != self.generation {
            debug!("Dropping superseded draw (token {})", draw.token);
            return None;
        }
        if now < draw.due {
            self.pending_draw = Some(draw);
            return None;
        }
        self.draw_song()
    }

    /// Share of the pool played so far, in percent
    pub fn progress(&self) -> u16 {
        if self.pool.is_empty() {
            return 0;
        }
        let percent = self.songs_played as usize * 100 / self.pool.len();
        percent.min(100) as u16
    }

    pub fn header(&self) -> Option<String> {
        self.artist
            .as_ref()
            .map(|artist| format!("GUESS {} SONGS FROM LYRICS", artist.to_uppercase()))
    }

    fn reveal(&mut self, verdict: Verdict) {
        if let Some(song) = &self.current_song {
            info!("{song}: {verdict}");
        }
        self.phase = Phase::Revealed(verdict);
        self.pending_draw = Some(ScheduledDraw {
            due: Instant::now() + self.config.reveal_delay,
            token: self.generation,
        });
    }

    fn reset_song(&mut self) {
        self.hint_used = false;
        self.hints.clear();
        self.message = None;
        self.source_url = None;
        self.loading = false;
    }

    fn bump_generation(&mut self) {
        self.generation += 1;
        self.pending_draw = None;
    }
}

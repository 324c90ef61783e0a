use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{error, info, warn};
use std::time::Instant;
use webbrowser::Browser;

use crate::catalog::{AlbumChoice, Catalog};
use crate::guess;
use crate::lyrics::{LyricsFetcher, LyricsRequest};
use crate::runtime::AppEvent;
use crate::session::{GuessOutcome, Phase, Session, SessionConfig};

/// Which picker on the selection screen has the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Artist,
    Album,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    pub artist_index: usize,
    pub album_index: usize,
    pub focus: Focus,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self {
            artist_index: 0,
            album_index: 0,
            focus: Focus::Artist,
        }
    }
}

/// Everything the terminal front end needs: the catalog, the game session,
/// the picker cursors and the text being typed.
pub struct App {
    pub catalog: Catalog,
    pub session: Session,
    pub selection: SelectionState,
    pub guess: String,
    pub suggestion_index: Option<usize>,
    pub should_quit: bool,
    fetcher: LyricsFetcher,
}

impl App {
    pub fn new(catalog: Catalog, config: SessionConfig, fetcher: LyricsFetcher) -> Self {
        Self {
            catalog,
            session: Session::new(config),
            selection: SelectionState::default(),
            guess: String::new(),
            suggestion_index: None,
            should_quit: false,
            fetcher,
        }
    }

    /// Put the artist cursor on `name` (case-insensitive) and move focus to
    /// the album picker. Unknown names leave the cursor alone.
    pub fn preselect_artist(&mut self, name: &str) -> bool {
        let wanted = name.trim().to_lowercase();
        match self
            .catalog
            .artist_names()
            .position(|artist| artist.to_lowercase() == wanted)
        {
            Some(index) => {
                self.selection.artist_index = index;
                self.selection.album_index = 0;
                self.selection.focus = Focus::Album;
                true
            }
            None => {
                warn!("Unknown artist {name:?}, starting on the artist picker");
                false
            }
        }
    }

    pub fn artist_names(&self) -> Vec<&str> {
        self.catalog.artist_names().collect()
    }

    pub fn selected_artist(&self) -> Option<&str> {
        self.catalog.artist_names().nth(self.selection.artist_index)
    }

    pub fn album_choices(&self) -> Vec<AlbumChoice> {
        self.selected_artist()
            .map(|artist| self.catalog.album_choices(artist))
            .unwrap_or_default()
    }

    pub fn selected_album(&self) -> Option<AlbumChoice> {
        self.album_choices()
            .into_iter()
            .nth(self.selection.album_index)
    }

    pub fn album_info(&self) -> Option<String> {
        let artist = self.selected_artist()?;
        let choice = self.selected_album()?;
        self.catalog.album_info(artist, &choice)
    }

    pub fn suggestions(&self) -> Vec<String> {
        guess::suggestions(&self.guess, &self.session.pool)
    }

    pub fn is_selecting(&self) -> bool {
        self.session.phase == Phase::SelectingAlbum
    }

    /// Apply one event from the runner. Returns true when the screen
    /// needs repainting.
    pub fn handle_event(&mut self, event: AppEvent) -> bool {
        match event {
            AppEvent::Key(key) => {
                self.on_key(key);
                true
            }
            AppEvent::Resize => true,
            AppEvent::Tick => {
                let request = self.session.tick(Instant::now());
                let drew = request.is_some();
                self.dispatch(request);
                drew
            }
            AppEvent::Lyrics(delivery) => self.session.deliver(delivery),
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.is_selecting() {
            self.on_selection_key(key);
        } else {
            self.on_playing_key(key);
        }
    }

    fn on_selection_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                if self.selection.focus == Focus::Album {
                    self.selection.focus = Focus::Artist;
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Left => self.selection.focus = Focus::Artist,
            KeyCode::Right | KeyCode::Tab => {
                if self.selected_artist().is_some() {
                    self.selection.focus = Focus::Album;
                }
            }
            KeyCode::Enter => match self.selection.focus {
                Focus::Artist => {
                    if self.selected_artist().is_some() {
                        self.selection.focus = Focus::Album;
                    }
                }
                Focus::Album => self.confirm_selection(),
            },
            _ => {}
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let (index, len) = match self.selection.focus {
            Focus::Artist => (
                &mut self.selection.artist_index,
                self.catalog.artist_names().count(),
            ),
            Focus::Album => {
                let len = self.album_choices().len();
                (&mut self.selection.album_index, len)
            }
        };
        if len == 0 {
            return;
        }
        *index = (*index as isize + delta).rem_euclid(len as isize) as usize;

        if self.selection.focus == Focus::Artist {
            self.selection.album_index = 0;
        }
    }

    pub fn confirm_selection(&mut self) {
        let (Some(artist), Some(choice)) = (
            self.selected_artist().map(str::to_string),
            self.selected_album(),
        ) else {
            return;
        };

        self.clear_guess();
        let request = self
            .session
            .confirm_selection(&self.catalog, &artist, choice);
        self.dispatch(request);
    }

    fn on_playing_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('t') => {
                    self.session.request_hint();
                }
                KeyCode::Char('s') => {
                    self.session.skip();
                }
                KeyCode::Char('n') => {
                    let request = self.session.new_song();
                    self.dispatch(request);
                }
                KeyCode::Char('o') => self.open_source_page(),
                KeyCode::Char('u') => self.clear_guess(),
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.return_to_menu(),
            KeyCode::Enter => self.submit_guess(),
            KeyCode::Backspace => {
                self.guess.pop();
                self.suggestion_index = None;
            }
            KeyCode::Tab => self.accept_suggestion(),
            KeyCode::Up => self.move_suggestion(-1),
            KeyCode::Down => self.move_suggestion(1),
            KeyCode::Char(c) => {
                self.guess.push(c);
                self.suggestion_index = None;
            }
            _ => {}
        }
    }

    fn submit_guess(&mut self) {
        match self.session.submit_guess(&self.guess) {
            GuessOutcome::Correct | GuessOutcome::CorrectWithHint => self.clear_guess(),
            GuessOutcome::Incorrect | GuessOutcome::NoSong | GuessOutcome::Ignored => {
                self.suggestion_index = None;
            }
        }
    }

    /// Replace the typed text with the highlighted suggestion, or the first
    /// one when nothing is highlighted.
    fn accept_suggestion(&mut self) {
        let suggestions = self.suggestions();
        let index = self.suggestion_index.unwrap_or(0);
        if let Some(title) = suggestions.get(index) {
            self.guess = title.clone();
            self.suggestion_index = None;
        }
    }

    fn move_suggestion(&mut self, delta: isize) {
        let count = self.suggestions().len();
        if count == 0 {
            self.suggestion_index = None;
            return;
        }
        self.suggestion_index = Some(match self.suggestion_index {
            None if delta > 0 => 0,
            None => count - 1,
            Some(current) => (current as isize + delta).rem_euclid(count as isize) as usize,
        });
    }

    fn return_to_menu(&mut self) {
        info!("Returning to album selection");
        self.session.return_to_menu();
        self.clear_guess();
        self.selection.focus = Focus::Album;
    }

    fn open_source_page(&self) {
        let Some(url) = self.session.source_url.as_deref() else {
            return;
        };
        if !Browser::is_available() {
            warn!("No browser available to open {url}");
            return;
        }
        if let Err(err) = webbrowser::open(url) {
            error!("Could not open {url}: {err}");
        }
    }

    fn clear_guess(&mut self) {
        self.guess.clear();
        self.suggestion_index = None;
    }

    /// Hand a fresh draw to the fetcher. The typed text belonged to the
    /// previous song, so it goes too.
    fn dispatch(&mut self, request: Option<LyricsRequest>) {
        if let Some(request) = request {
            self.clear_guess();
            self.fetcher.fetch(request);
        }
    }
}

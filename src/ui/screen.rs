use ratatui::Frame;

use crate::app::App;
use crate::ui::{render_playing, render_selection};

/// A UI Screen boundary: renders one phase of the game
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Artist and album pickers
pub struct SelectionScreen;

impl Screen for SelectionScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_selection(app, f.area(), f.buffer_mut());
    }
}

/// Lyrics, guess field and score readouts
pub struct PlayingScreen;

impl Screen for PlayingScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        render_playing(app, f.area(), f.buffer_mut());
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(app: &App) -> Box<dyn Screen> {
    if app.is_selecting() {
        Box::new(SelectionScreen)
    } else {
        Box::new(PlayingScreen)
    }
}

/// Draw whichever screen the app is on
pub fn draw(app: &App, f: &mut Frame) {
    current_screen(app).render(app, f);
}

pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, StatefulWidget, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;
use webbrowser::Browser;

use crate::{
    app::{App, Focus},
    guess::MAX_SUGGESTIONS,
    session::{Phase, Verdict, INCORRECT_MESSAGE},
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

const INSTRUCTIONS: [&str; 4] = [
    "1. Select an artist and album",
    "2. Read the displayed lyrics",
    "3. Guess which song they're from",
    "4. Build your streak and score!",
];

fn bold_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn dim_style() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

/// Colour of the message line for the current phase
pub fn message_style(phase: Phase, message: &str) -> Style {
    let color = match phase {
        Phase::Revealed(Verdict::Correct) => Color::Green,
        Phase::Revealed(Verdict::CorrectWithHint) => Color::Yellow,
        Phase::Revealed(Verdict::Skipped) => Color::Magenta,
        _ if message == INCORRECT_MESSAGE => Color::Red,
        _ => Color::Cyan,
    };
    Style::default().patch(bold_style()).fg(color)
}

/// Keep the tail of `text` that fits in `width` columns, so the cursor end
/// of a long guess stays visible.
pub fn visible_tail(text: &str, width: usize) -> &str {
    if text.width() <= width {
        return text;
    }
    let mut used = 0;
    let mut start = text.len();
    for (idx, c) in text.char_indices().rev() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = idx;
    }
    &text[start..]
}

fn picker<'a>(title: &'a str, items: Vec<ListItem<'a>>, focused: bool) -> List<'a> {
    let border_style = if focused {
        Style::default().fg(Color::Magenta)
    } else {
        dim_style()
    };
    List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(Span::styled(title, bold_style())),
        )
        .highlight_style(
            Style::default()
                .patch(bold_style())
                .add_modifier(Modifier::REVERSED),
        )
        .highlight_symbol("> ")
}

pub fn render_selection(app: &App, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2),                          // title
            Constraint::Length(INSTRUCTIONS.len() as u16), // how to play
            Constraint::Length(1),                          // padding
            Constraint::Min(3),                             // pickers
            Constraint::Length(1),                          // album info
            Constraint::Length(1),                          // legend
        ])
        .split(area);

    Paragraph::new(vec![
        Line::from(Span::styled(
            "MELO",
            Style::default().patch(bold_style()).fg(Color::Magenta),
        )),
        Line::from(Span::styled(
            "guess the song from its lyrics",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ])
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    Paragraph::new(
        INSTRUCTIONS
            .iter()
            .map(|line| Line::from(Span::styled(*line, dim_style())))
            .collect::<Vec<_>>(),
    )
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[3]);

    let artists: Vec<ListItem> = app
        .artist_names()
        .into_iter()
        .map(|name| ListItem::new(name.to_string()))
        .collect();
    let mut artist_state = ListState::default().with_selected(Some(app.selection.artist_index));
    StatefulWidget::render(
        picker("Artist", artists, app.selection.focus == Focus::Artist),
        columns[0],
        buf,
        &mut artist_state,
    );

    let albums: Vec<ListItem> = app
        .album_choices()
        .iter()
        .map(|choice| ListItem::new(choice.label().to_string()))
        .collect();
    let mut album_state = ListState::default().with_selected(Some(app.selection.album_index));
    StatefulWidget::render(
        picker("Album", albums, app.selection.focus == Focus::Album),
        columns[1],
        buf,
        &mut album_state,
    );

    if let Some(info) = app.album_info() {
        Paragraph::new(Span::styled(info, Style::default().fg(Color::Cyan)))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
    }

    Paragraph::new(Span::styled(
        "(↑↓) move / (←→) switch list / (enter) play / (esc) back / (^c) quit",
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .render(chunks[5], buf);
}

pub fn render_playing(app: &App, area: Rect, buf: &mut Buffer) {
    let session = &app.session;
    let suggestions = app.suggestions();
    let suggestion_lines = suggestions.len().min(MAX_SUGGESTIONS) as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1),                // header
            Constraint::Length(1),                // album and stats
            Constraint::Length(1),                // progress
            Constraint::Min(3),                   // lyrics
            Constraint::Length(1),                // message
            Constraint::Length(3),                // guess field
            Constraint::Length(suggestion_lines), // suggestions
            Constraint::Length(1),                // legend
        ])
        .split(area);

    if let Some(header) = session.header() {
        Paragraph::new(Span::styled(
            header,
            Style::default().patch(bold_style()).fg(Color::Magenta),
        ))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);
    }

    let album = session
        .album
        .as_ref()
        .map(|choice| choice.label().to_string())
        .unwrap_or_default();
    Paragraph::new(Line::from(vec![
        Span::styled(album, Style::default().add_modifier(Modifier::ITALIC)),
        Span::raw("   "),
        Span::styled(format!("score {}", session.score), bold_style()),
        Span::raw("   "),
        Span::styled(format!("streak {}", session.streak), bold_style()),
        Span::raw("   "),
        Span::styled(format!("best {}", session.max_streak), dim_style()),
    ]))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    Gauge::default()
        .gauge_style(Style::default().fg(Color::Magenta))
        .percent(session.progress())
        .label(format!("{} played", session.songs_played))
        .render(chunks[2], buf);

    let lyric_style = if session.loading {
        dim_style().add_modifier(Modifier::ITALIC)
    } else {
        bold_style()
    };
    Paragraph::new(
        session
            .snippet
            .lines()
            .map(|line| Line::from(Span::styled(line.to_string(), lyric_style)))
            .collect::<Vec<_>>(),
    )
    .block(Block::default().borders(Borders::ALL).border_style(dim_style()))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .render(chunks[3], buf);

    if let Some(message) = &session.message {
        Paragraph::new(Span::styled(
            message.clone(),
            message_style(session.phase, message),
        ))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);
    }

    let field_width = chunks[5].width.saturating_sub(3) as usize;
    Paragraph::new(Line::from(vec![
        Span::styled(visible_tail(&app.guess, field_width).to_string(), bold_style()),
        Span::styled(" ", Style::default().add_modifier(Modifier::UNDERLINED)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled("Your guess", dim_style())),
    )
    .render(chunks[5], buf);

    let items: Vec<ListItem> = suggestions
        .into_iter()
        .map(|title| ListItem::new(title).style(dim_style()))
        .collect();
    let mut suggestion_state = ListState::default().with_selected(app.suggestion_index);
    StatefulWidget::render(
        List::new(items).highlight_style(
            Style::default()
                .patch(bold_style())
                .add_modifier(Modifier::REVERSED),
        ),
        chunks[6],
        buf,
        &mut suggestion_state,
    );

    let legend = if Browser::is_available() && session.source_url.is_some() {
        "(enter) guess / (tab) complete / (^t) hint / (^s) skip / (^n) new song / (^o) open / (esc) menu"
    } else {
        "(enter) guess / (tab) complete / (^t) hint / (^s) skip / (^n) new song / (esc) menu"
    };
    Paragraph::new(Span::styled(
        legend,
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .wrap(Wrap { trim: true })
    .render(chunks[7], buf);
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.is_selecting() {
            render_selection(self, area, buf);
        } else {
            render_playing(self, area, buf);
        }
    }
}

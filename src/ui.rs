pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Widget, Wrap},
    Frame,
};

use crate::{
    app::{App, Focus},
    notes::TextBuffer,
    phase::{PhaseKind, PHASE_COUNT, PHASES, TOTAL_DURATION_SECS},
    session::Status,
    util::{format_clock, percent_to_ratio},
};

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

const ASSOCIATIONS_PLACEHOLDER: &str = "Type your free associations with this word...";
const NOTES_PLACEHOLDER: &str = "Use this space for notes during the session...";

/// Draw the current screen and place the terminal cursor in the focused editor.
pub fn draw(app: &App, f: &mut Frame) {
    screen::current_screen(&app.view).render(app, f);
}

pub(crate) fn set_editor_cursor(app: &App, f: &mut Frame) {
    let areas = SessionAreas::new(f.area());
    let target = match app.focus {
        Focus::Controls => None,
        Focus::Associations => {
            warm_up_input_area(&areas).map(|inner| (&app.associations, inner))
        }
        Focus::Notes => Some((app.notes.buffer(), notes_inner(areas.notes))),
    };

    if let Some((buffer, inner)) = target {
        if let Some(pos) = EditorView::new(buffer, inner).cursor {
            f.set_cursor_position(pos);
        }
    }
}

/// Screen regions of the session view
struct SessionAreas {
    clock: Rect,
    phase: Rect,
    controls: Rect,
    notes: Rect,
}

impl SessionAreas {
    fn new(area: Rect) -> Self {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // clock + overall gauge
                Constraint::Min(8),    // phase card
                Constraint::Length(3), // controls
            ])
            .split(columns[0]);

        Self {
            clock: left[0],
            phase: left[1],
            controls: left[2],
            notes: columns[1],
        }
    }
}

struct PhaseAreas {
    header: Rect,
    description: Rect,
    objective: Rect,
    gauge: Rect,
    content: Rect,
}

impl PhaseAreas {
    fn new(inner: Rect) -> Self {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // "Phase i/4: name"
                Constraint::Length(1), // description
                Constraint::Length(2), // objective, may wrap
                Constraint::Length(1), // phase gauge
                Constraint::Length(1), // padding
                Constraint::Min(0),    // phase-specific content
            ])
            .split(inner);

        Self {
            header: rows[0],
            description: rows[1],
            objective: rows[2],
            gauge: rows[3],
            content: rows[5],
        }
    }
}

fn phase_block() -> Block<'static> {
    Block::default().borders(Borders::ALL).title("Phase")
}

fn warm_up_rows(content: Rect) -> [Rect; 3] {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // word
            Constraint::Length(1), // hint
            Constraint::Min(3),    // associations input
        ])
        .split(content);
    [rows[0], rows[1], rows[2]]
}

fn warm_up_input_area(areas: &SessionAreas) -> Option<Rect> {
    let phase_inner = phase_block().inner(areas.phase);
    let [_, _, input] = warm_up_rows(PhaseAreas::new(phase_inner).content);
    let inner = Block::default().borders(Borders::ALL).inner(input);
    (inner.width > 0 && inner.height > 0).then_some(inner)
}

fn notes_inner(notes: Rect) -> Rect {
    Block::default().borders(Borders::ALL).inner(notes)
}

/// Wrapped rows, scroll offset and cursor position of a buffer shown in `inner`
struct EditorView {
    rows: Vec<String>,
    scroll: u16,
    cursor: Option<Position>,
}

impl EditorView {
    fn new(buffer: &TextBuffer, inner: Rect) -> Self {
        if inner.width == 0 || inner.height == 0 {
            return Self {
                rows: Vec::new(),
                scroll: 0,
                cursor: None,
            };
        }

        let wrapped = buffer.wrap(inner.width as usize);
        let (row, col) = wrapped.cursor;
        let row = row.min(u16::MAX as usize) as u16;
        let scroll = row.saturating_sub(inner.height - 1);
        let x = inner.x + (col.min(inner.width as usize - 1) as u16);
        let y = inner.y + (row - scroll);

        Self {
            rows: wrapped.rows,
            scroll,
            cursor: Some(Position { x, y }),
        }
    }
}

fn editor_paragraph<'a>(
    buffer: &'a TextBuffer,
    inner: Rect,
    placeholder: &'a str,
    focused: bool,
) -> Paragraph<'a> {
    if buffer.is_empty() && !focused {
        return Paragraph::new(Span::styled(
            placeholder,
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
        ))
        .wrap(Wrap { trim: true });
    }

    let view = EditorView::new(buffer, inner);
    let lines: Vec<Line> = view.rows.into_iter().map(Line::from).collect();
    Paragraph::new(lines).scroll((view.scroll, 0))
}

fn editor_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

fn start_pause_label(status: Status) -> &'static str {
    match status {
        Status::Idle => "Start",
        Status::Running => "Pause",
        Status::Paused | Status::Complete => "Resume",
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let session = &self.session;
        // styles
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let dim_style = Style::default().add_modifier(Modifier::DIM);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);
        let magenta_style = Style::default().fg(Color::Magenta);
        let cyan_bold_style = Style::default().patch(bold_style).fg(Color::Cyan);

        let areas = SessionAreas::new(area);

        // Clock card
        let clock_block = Block::default().borders(Borders::ALL).title("Session");
        let clock_inner = clock_block.inner(areas.clock);
        clock_block.render(areas.clock, buf);

        let clock_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(clock_inner);

        let mut clock_line = vec![Span::styled(
            format!(
                "{} / {}",
                format_clock(session.elapsed_secs),
                format_clock(TOTAL_DURATION_SECS)
            ),
            bold_style,
        )];
        if session.status() == Status::Complete {
            clock_line.push(Span::styled("  session complete", cyan_bold_style));
        } else if session.status() == Status::Paused {
            clock_line.push(Span::styled("  paused", dim_style));
        }
        Paragraph::new(Line::from(clock_line))
            .alignment(Alignment::Center)
            .render(clock_rows[0], buf);

        Gauge::default()
            .gauge_style(magenta_style)
            .ratio(percent_to_ratio(session.overall_progress_percent()))
            .label(format!("{:.0}%", session.overall_progress_percent()))
            .render(clock_rows[1], buf);

        // Phase card
        let phase = session.phase();
        let block = phase_block();
        let phase_inner = block.inner(areas.phase);
        block.render(areas.phase, buf);
        let rows = PhaseAreas::new(phase_inner);

        Paragraph::new(Span::styled(
            format!(
                "Phase {}/{}: {}",
                session.phase_index + 1,
                PHASE_COUNT,
                phase.name
            ),
            cyan_bold_style,
        ))
        .alignment(Alignment::Center)
        .render(rows.header, buf);

        Paragraph::new(Span::styled(phase.description, dim_style))
            .alignment(Alignment::Center)
            .render(rows.description, buf);

        Paragraph::new(Span::styled(phase.objective, italic_style))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(rows.objective, buf);

        Gauge::default()
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(percent_to_ratio(session.phase_progress_percent()))
            .label(format!("{:.0}%", session.phase_progress_percent()))
            .render(rows.gauge, buf);

        render_phase_content(self, rows.content, buf);

        // Controls
        let legend = if self.focus == Focus::Controls {
            let mut legend = format!("(space) {}", start_pause_label(session.status()));
            legend.push_str("  (r)eset");
            if session.can_skip() {
                legend.push_str("  (s)kip");
            }
            legend.push_str("  (n)otes  (?) help  (q)uit");
            legend
        } else {
            String::from("(esc) back to controls  (tab) next field")
        };
        Paragraph::new(Span::styled(legend, italic_style))
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center)
            .render(areas.controls, buf);

        // Notes
        let notes_focused = self.focus == Focus::Notes;
        let notes_block = editor_block("Notes", notes_focused);
        let inner = notes_block.inner(areas.notes);
        notes_block.render(areas.notes, buf);
        editor_paragraph(self.notes.buffer(), inner, NOTES_PLACEHOLDER, notes_focused)
            .render(inner, buf);
    }
}

fn render_phase_content(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let hint_style = Style::default()
        .fg(Color::Gray)
        .add_modifier(Modifier::ITALIC);
    let prompt_style = Style::default().patch(bold_style).fg(Color::Yellow);

    match app.phase_kind() {
        PhaseKind::WarmUp => {
            let [word, hint, input] = warm_up_rows(area);

            Paragraph::new(Line::from(vec![
                Span::styled("Word: ", bold_style),
                Span::styled(app.prompts.word.as_str(), prompt_style),
            ]))
            .alignment(Alignment::Center)
            .render(word, buf);

            Paragraph::new(Span::styled(
                "(w) change word  (a) write associations",
                hint_style,
            ))
            .alignment(Alignment::Center)
            .render(hint, buf);

            let focused = app.focus == Focus::Associations;
            let block = editor_block("Associations", focused);
            let inner = block.inner(input);
            block.render(input, buf);
            editor_paragraph(&app.associations, inner, ASSOCIATIONS_PLACEHOLDER, focused)
                .render(inner, buf);
        }
        PhaseKind::Reading => {
            let lines = vec![
                Line::from(Span::styled("Reading theme:", bold_style)),
                Line::from(""),
                Line::from(Span::styled(app.prompts.reading_theme.as_str(), prompt_style)),
                Line::from(""),
                Line::from(Span::styled(
                    "Read about this theme for 6 minutes, then summarize it for 4 minutes",
                    hint_style,
                )),
            ];
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(area, buf);
        }
        PhaseKind::Expression => {
            let lines = vec![
                Line::from(Span::styled("Speaking theme:", bold_style)),
                Line::from(""),
                Line::from(Span::styled(
                    app.prompts.expression_theme.as_str(),
                    prompt_style,
                )),
                Line::from(""),
                Line::from(Span::styled("(t) change theme", hint_style)),
                Line::from(Span::styled("Speak about this theme out loud", hint_style)),
            ];
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(area, buf);
        }
        PhaseKind::Writing => {
            let lines = vec![
                Line::from(vec![
                    Span::styled("Stimulus word: ", bold_style),
                    Span::styled(app.prompts.word.as_str(), prompt_style),
                ]),
                Line::from(""),
                Line::from(Span::styled("(w) change word", hint_style)),
                Line::from(Span::styled(
                    "Write freely about this word in your notes (n)",
                    hint_style,
                )),
            ];
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(area, buf);
        }
    }
}

/// Key bindings and phase overview
pub(crate) fn render_help(area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(Span::styled("Session", bold_style)),
        Line::from("(space) start / pause    (r) reset    (s) skip to next phase"),
        Line::from("(w) change word    (t) change speaking theme"),
        Line::from(""),
        Line::from(Span::styled("Writing", bold_style)),
        Line::from("(a) associations (warm-up only)    (n) notes    (tab) next field"),
        Line::from("(arrows) move cursor    (esc) back to controls"),
        Line::from(""),
        Line::from(Span::styled("Phases", bold_style)),
    ];
    lines.extend(PHASES.iter().enumerate().map(|(i, p)| {
        Line::from(format!(
            "{}. {} ({} min): {}",
            i + 1,
            p.name,
            p.duration_secs / 60,
            p.description
        ))
    }));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "press any key to return, (q) to quit",
        Style::default().add_modifier(Modifier::ITALIC),
    )));

    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Help"))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Intent;
    use crate::notify::SilentNotifier;
    use crate::pools::{ContentPools, SupportedLanguage};
    use crate::runtime::FixedTicker;
    use ratatui::{backend::TestBackend, Terminal};

    fn app() -> App {
        App::new(
            ContentPools::builtin(SupportedLanguage::English).unwrap(),
            Some(4),
            Box::new(SilentNotifier),
            &FixedTicker::per_second(),
        )
    }

    fn rendered(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_start_pause_label() {
        assert_eq!(start_pause_label(Status::Idle), "Start");
        assert_eq!(start_pause_label(Status::Running), "Pause");
        assert_eq!(start_pause_label(Status::Paused), "Resume");
        assert_eq!(start_pause_label(Status::Complete), "Resume");
    }

    #[test]
    fn test_renders_clock_and_first_phase() {
        let app = app();
        let content = rendered(&app, 140, 40);
        assert!(content.contains("00:00 / 30:00"));
        assert!(content.contains("Phase 1/4: Mental Warm-up"));
        assert!(content.contains(&app.prompts.word));
        assert!(content.contains("(s)kip"));
        assert!(content.contains("Start"));
    }

    #[test]
    fn test_renders_each_phase_content() {
        let mut app = app();

        app.dispatch(Intent::Skip);
        let content = rendered(&app, 160, 40);
        assert!(content.contains("Phase 2/4: Active Reading"));
        assert!(content.contains("Reading theme:"));

        app.dispatch(Intent::Skip);
        let content = rendered(&app, 160, 40);
        assert!(content.contains("Phase 3/4: Rapid Expression"));
        assert!(content.contains("(t) change theme"));

        app.dispatch(Intent::Skip);
        let content = rendered(&app, 160, 40);
        assert!(content.contains("Phase 4/4: Quick Writing"));
        assert!(content.contains("Stimulus word:"));
        // No skip control on the last phase
        assert!(!content.contains("(s)kip"));
        assert!(content.contains("25:00 / 30:00"));
    }

    #[test]
    fn test_renders_notes_text() {
        let mut app = app();
        app.focus_notes();
        app.focused_buffer_mut().unwrap().insert_str("first idea");
        let content = rendered(&app, 140, 40);
        assert!(content.contains("first idea"));
        assert!(content.contains("(esc) back to controls"));
    }

    #[test]
    fn test_renders_help() {
        let mut app = app();
        app.toggle_help();
        let content = rendered(&app, 120, 30);
        assert!(content.contains("Help"));
        assert!(content.contains("Quick Writing"));
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let mut app = app();
        app.focus_notes();
        rendered(&app, 10, 5);
        app.toggle_help();
        rendered(&app, 3, 2);
    }

    #[test]
    fn test_editor_view_scrolls_to_cursor() {
        let mut buffer = TextBuffer::new();
        for _ in 0..10 {
            buffer.insert_str("line");
            buffer.newline();
        }
        let inner = Rect::new(5, 5, 20, 4);
        let view = EditorView::new(&buffer, inner);
        assert_eq!(view.scroll, 7);
        assert_eq!(view.cursor, Some(Position { x: 5, y: 8 }));
    }

    #[test]
    fn test_long_note_line_wraps_with_cursor_at_its_end() {
        let mut app = app();
        app.focus_notes();
        let line = format!("{}ENDMARK", "a".repeat(120));
        app.focused_buffer_mut().unwrap().insert_str(&line);

        let mut terminal = Terminal::new(TestBackend::new(140, 40)).unwrap();
        terminal.draw(|f| draw(&app, f)).unwrap();
        let content: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(content.contains("ENDMARK"));

        // Notes inner area starts at x=71 and is 66 columns wide, so the
        // 127 characters fill one row and leave 61 on the second.
        let cursor = terminal.get_cursor_position().unwrap();
        assert_eq!(cursor, Position { x: 71 + 61, y: 3 });
        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(cursor.x - 1, cursor.y)].symbol(), "K");
    }

    #[test]
    fn test_cursor_follows_wrapped_rows_when_scrolling() {
        let mut buffer = TextBuffer::new();
        buffer.insert_str(&"x".repeat(50));
        let inner = Rect::new(0, 0, 10, 3);
        let view = EditorView::new(&buffer, inner);
        // 5 full rows push the cursor onto a sixth
        assert_eq!(view.rows.len(), 5);
        assert_eq!(view.scroll, 3);
        assert_eq!(view.cursor, Some(Position { x: 0, y: 2 }));
    }

    #[test]
    fn test_editor_view_empty_area() {
        let buffer = TextBuffer::new();
        let view = EditorView::new(&buffer, Rect::new(0, 0, 0, 0));
        assert_eq!(view.scroll, 0);
        assert_eq!(view.cursor, None);
    }
}

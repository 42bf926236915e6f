//! Terminal UI rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph, Wrap},
    Frame,
};

use relmark_core::{App, Focus, InputTarget, Mode, RelevanceLevel, Segment};

// Catppuccin Mocha colors
const SURFACE0: Color = Color::Rgb(49, 50, 68);
const SURFACE1: Color = Color::Rgb(69, 71, 90);
const TEXT: Color = Color::Rgb(205, 214, 244);
const SUBTEXT0: Color = Color::Rgb(166, 173, 200);
const RED: Color = Color::Rgb(243, 139, 168);
const PEACH: Color = Color::Rgb(250, 179, 135);
const YELLOW: Color = Color::Rgb(249, 226, 175);
const GREEN: Color = Color::Rgb(166, 227, 161);
const BLUE: Color = Color::Rgb(137, 180, 250);
const MAUVE: Color = Color::Rgb(203, 166, 247);
const OVERLAY0: Color = Color::Rgb(108, 112, 134);

pub fn draw(frame: &mut Frame, app: &App, sidebar_width: u16) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_title_bar(frame, app, chunks[0]);
    draw_main_area(frame, app, chunks[1], sidebar_width);
    draw_status_bar(frame, app, chunks[2]);

    // Draw popups/overlays
    match app.mode {
        Mode::LevelPicker => draw_level_picker(frame, app),
        Mode::Input => draw_input_dialog(frame, app),
        Mode::Help => draw_help(frame),
        _ => {}
    }
}

fn draw_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let ann_count = app.annotation_count();
    let current = if ann_count > 0 {
        app.sidebar_selected + 1
    } else {
        0
    };

    let title_text = format!(" relmark - {} [{}/{}]", app.title(), current, ann_count);

    let title_bar = Paragraph::new(title_text).style(Style::default().fg(TEXT).bg(SURFACE0));

    frame.render_widget(title_bar, area);
}

fn draw_main_area(frame: &mut Frame, app: &App, area: Rect, sidebar_width: u16) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),                // Editor
            Constraint::Length(sidebar_width), // Sidebar
        ])
        .split(area);

    draw_editor(frame, app, chunks[0]);

    if app.show_stats {
        let side = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(10)])
            .split(chunks[1]);
        draw_sidebar(frame, app, side[0]);
        draw_stats(frame, app, side[1]);
    } else {
        draw_sidebar(frame, app, chunks[1]);
    }
}

/// Collects characters into spans, starting a new span when the style changes
struct LineBuilder {
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    buffer: String,
    style: Style,
}

impl LineBuilder {
    fn new() -> Self {
        Self {
            lines: Vec::new(),
            spans: Vec::new(),
            buffer: String::new(),
            style: Style::default(),
        }
    }

    fn push(&mut self, ch: char, style: Style) {
        if style != self.style {
            self.flush_span();
            self.style = style;
        }
        self.buffer.push(ch);
    }

    fn flush_span(&mut self) {
        if !self.buffer.is_empty() {
            self.spans
                .push(Span::styled(std::mem::take(&mut self.buffer), self.style));
        }
    }

    fn end_line(&mut self) {
        self.flush_span();
        self.lines.push(Line::from(std::mem::take(&mut self.spans)));
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.end_line();
        self.lines
    }
}

fn segment_style(segment: &Segment) -> Style {
    match segment.level() {
        Some(level) => Style::default()
            .fg(level_color(level))
            .add_modifier(Modifier::UNDERLINED),
        None => Style::default().fg(TEXT),
    }
}

fn draw_editor(frame: &mut Frame, app: &App, area: Rect) {
    let editor_style = if app.focus == Focus::Editor {
        Style::default().fg(BLUE)
    } else {
        Style::default().fg(SUBTEXT0)
    };

    let mode_indicator = match app.mode {
        Mode::Visual => " [VISUAL]",
        _ => "",
    };

    let segments = app.segments();
    let cursor_offset = app.cursor.offset();

    // Label of the segment under the cursor
    let under_cursor = segments
        .iter()
        .find(|s| s.range.contains(cursor_offset))
        .and_then(|s| s.label.as_ref())
        .map(|label| match &label.comment {
            Some(comment) => format!(" [{}] {}", label.relevance_level.short(), comment),
            None => format!(" [{}]", label.relevance_level.short()),
        })
        .unwrap_or_default();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(editor_style)
        .title(format!("Document{}{}", mode_indicator, under_cursor));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.document.is_none() {
        return;
    }

    let selection = app.get_selection_range();
    let mut builder = LineBuilder::new();

    for segment in &segments {
        let base = segment_style(segment);
        for (offset, ch) in (segment.range.start_index..).zip(segment.text.chars()) {
            let mut style = base;

            if let Some((sel_start, sel_end)) = selection {
                if offset >= sel_start && offset < sel_end {
                    style = style.bg(SURFACE1).add_modifier(Modifier::BOLD);
                }
            }
            if offset == cursor_offset && app.focus == Focus::Editor {
                style = style.add_modifier(Modifier::REVERSED);
            }

            if ch == '\n' {
                // Keep the cursor visible on line ends
                if offset == cursor_offset {
                    builder.push(' ', style);
                }
                builder.end_line();
            } else {
                builder.push(ch, style);
            }
        }
    }

    // Cursor parked after the last character
    if cursor_offset >= segments.last().map_or(0, |s| s.range.end_index) && app.focus == Focus::Editor {
        builder.push(' ', Style::default().add_modifier(Modifier::REVERSED));
    }

    let lines = builder.finish();

    // Calculate scroll offset based on cursor
    let cursor = app.cursor_pos();
    let visible_height = inner.height as usize;
    let scroll_offset = if cursor.0 >= visible_height {
        cursor.0 - visible_height + 1
    } else {
        0
    };

    let paragraph = Paragraph::new(lines)
        .scroll((u16::try_from(scroll_offset).unwrap_or(u16::MAX), 0))
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, inner);
}

fn draw_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let sidebar_style = if app.focus == Focus::Sidebar {
        Style::default().fg(BLUE)
    } else {
        Style::default().fg(SUBTEXT0)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(sidebar_style)
        .title(format!("Annotations ({})", app.annotation_count()));

    let Some(doc) = &app.document else {
        frame.render_widget(block, area);
        return;
    };

    let items: Vec<ListItem> = doc
        .annotations_sorted()
        .iter()
        .enumerate()
        .map(|(i, ann)| {
            let selected = i == app.sidebar_selected;
            let marker = if selected { ">" } else { " " };

            let text_preview: String = ann
                .text
                .chars()
                .take(15)
                .collect::<String>()
                .replace('\n', " ");

            let line1 = format!("{} [{}] \"{}...\"", marker, ann.relevance_level.short(), text_preview);
            let line2 = format!(
                "   {}",
                ann.comment().unwrap_or("-").chars().take(20).collect::<String>()
            );

            let style = if selected {
                Style::default().fg(TEXT).bg(SURFACE1)
            } else {
                Style::default().fg(TEXT)
            };

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(line1, style.fg(level_color(ann.relevance_level))),
                ]),
                Line::from(Span::styled(line2, style.fg(SUBTEXT0))),
            ])
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}

fn draw_stats(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(SUBTEXT0))
        .title("Relevance");

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(doc) = &app.document else {
        return;
    };

    let stats = doc.relevance_statistics();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(RelevanceLevel::all().iter().map(|_| Constraint::Length(2)))
        .split(inner);

    for (row, level_stats) in rows.iter().zip(stats.iter()) {
        let level = level_stats.relevance_level;
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(level_color(level)).bg(SURFACE0))
            .ratio((level_stats.coverage_percent / 100.0).clamp(0.0, 1.0))
            .label(format!(
                "{} x{} {:.1}%",
                level.short(),
                level_stats.count,
                level_stats.coverage_percent
            ));
        frame.render_widget(gauge, Rect { height: 1, ..*row });
    }
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mode_str = match app.mode {
        Mode::Normal => "NORMAL",
        Mode::Visual => "VISUAL",
        Mode::Input => "INPUT",
        Mode::LevelPicker => "LEVEL",
        Mode::Help => "HELP",
    };

    let status = app.status_message.as_deref().unwrap_or("");

    let help_hint = "v select | a mark | c comment | d delete | e export | ? help";

    let status_text = format!(
        " {} | {}",
        mode_str,
        if status.is_empty() { help_hint } else { status },
    );

    let status_bar = Paragraph::new(status_text).style(Style::default().fg(SUBTEXT0).bg(SURFACE0));

    frame.render_widget(status_bar, area);
}

fn draw_level_picker(frame: &mut Frame, app: &App) {
    let area = centered_rect(40, 8, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(MAUVE))
        .title("Select Relevance (1-4 or j/k)");

    let items: Vec<ListItem> = RelevanceLevel::all()
        .iter()
        .enumerate()
        .map(|(i, level)| {
            let selected = i == app.level_selected;
            let marker = if selected { ">" } else { " " };
            let color = level_color(*level);
            let style = if selected {
                Style::default().fg(color).bg(SURFACE1)
            } else {
                Style::default().fg(color)
            };
            ListItem::new(format!("{} {} {}", i + 1, marker, level.as_str())).style(style)
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}

fn draw_input_dialog(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 5, frame.area());
    frame.render_widget(Clear, area);

    let title = match app.input_target {
        InputTarget::Comment => "Comment (Enter to save, empty for none)",
        InputTarget::FilePath => "Enter file path",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(GREEN))
        .title(title);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let input = Paragraph::new(format!("{}_", app.input_buffer)).style(Style::default().fg(TEXT));
    frame.render_widget(input, inner);
}

fn draw_help(frame: &mut Frame) {
    let area = centered_rect(60, 22, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BLUE))
        .title("Help (press any key to close)");

    let heading = Style::default().fg(MAUVE).add_modifier(Modifier::BOLD);

    let help_text = vec![
        Line::from(Span::styled("Navigation", heading)),
        Line::from("  h/j/k/l  Move cursor"),
        Line::from("  w/b      Next/prev word"),
        Line::from("  g/G      Go to top/bottom"),
        Line::from("  ]/[      Next/prev annotation"),
        Line::from("  Tab      Toggle document/sidebar"),
        Line::from(""),
        Line::from(Span::styled("Annotations", heading)),
        Line::from("  v        Start selection"),
        Line::from("  a        Mark selection (then pick level 1-4)"),
        Line::from("  c        Edit comment of selected annotation"),
        Line::from("  d        Delete selected annotation"),
        Line::from("  X        Clear all annotations"),
        Line::from("  s        Toggle relevance statistics"),
        Line::from(""),
        Line::from(Span::styled("File", heading)),
        Line::from("  o        Open file"),
        Line::from("  e        Export annotations as JSON"),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", Style::default().fg(SUBTEXT0))),
    ];

    let paragraph = Paragraph::new(help_text).block(block);
    frame.render_widget(paragraph, area);
}

fn level_color(level: RelevanceLevel) -> Color {
    match level {
        RelevanceLevel::High => RED,
        RelevanceLevel::Medium => PEACH,
        RelevanceLevel::Neutral => YELLOW,
        RelevanceLevel::Low => OVERLAY0,
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use relmark_core::Document;

    fn rendered(app: &App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, app, 32)).unwrap();

        let buffer = terminal.backend().buffer();
        buffer.content.iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_draws_document_and_annotation_list() {
        let mut app = App::new();
        let mut doc = Document::new("Draft".to_string(), "abcdef\nsecond line".to_string());
        doc.submit_selection(2, 4, RelevanceLevel::High).unwrap();
        app.load_document(doc);

        let screen = rendered(&app);
        assert!(screen.contains("abcdef"));
        assert!(screen.contains("second line"));
        assert!(screen.contains("Annotations (1)"));
        assert!(screen.contains("[HIGH]"));
        assert!(screen.contains("Relevance"));
    }

    #[test]
    fn test_segment_styles_follow_labels() {
        let mut doc = Document::new("Draft".to_string(), "abcdef".to_string());
        doc.submit_selection(2, 4, RelevanceLevel::High).unwrap();

        let styles: Vec<Option<Color>> = doc.render_segments().iter().map(|s| segment_style(s).fg).collect();
        assert_eq!(styles, vec![Some(TEXT), Some(RED), Some(TEXT)]);
    }

    #[test]
    fn test_level_picker_overlay() {
        let mut app = App::new();
        app.load_document(Document::new("Draft".to_string(), "abcdef".to_string()));
        app.enter_visual_mode();
        app.start_annotation();

        let screen = rendered(&app);
        assert!(screen.contains("Select Relevance"));
        assert!(screen.contains("Neutral"));
    }
}

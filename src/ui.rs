use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use skilltest::{
    corpus::layout, CharClass, ClassifiedWord, Phase, RenderModel, SlotStatus,
};
use unicode_width::UnicodeWidthStr;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

/// Lines of text visible while typing.
const TEXT_ROWS: usize = 3;

struct Styles {
    bold: Style,
    correct: Style,
    incorrect: Style,
    untyped: Style,
    caret: Style,
    italic: Style,
}

impl Styles {
    fn new() -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);

        Self {
            bold,
            correct: Style::default().patch(bold).fg(Color::Green),
            incorrect: Style::default().patch(bold).fg(Color::Red),
            untyped: Style::default().patch(bold).add_modifier(Modifier::DIM),
            caret: Style::default().add_modifier(Modifier::REVERSED),
            italic: Style::default().add_modifier(Modifier::ITALIC),
        }
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let styles = Styles::new();
        let model = self.session.render_model();

        match model.phase {
            Phase::Idle | Phase::Running => {
                render_typing(&model, self.config.words_per_line, &styles, area, buf)
            }
            Phase::Finished => render_results(self, &styles, area, buf),
        }
    }
}

fn render_typing(
    model: &RenderModel,
    words_per_line: usize,
    styles: &Styles,
    area: Rect,
    buf: &mut Buffer,
) {
    let lines = layout::lines(&model.words, words_per_line);
    let cursor_line = model
        .words
        .iter()
        .position(|w| w.is_current)
        .map(|i| layout::line_of(i, words_per_line))
        .unwrap_or(0);
    let visible = &lines[layout::visible_lines(lines.len(), cursor_line, TEXT_ROWS)];

    let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1) as usize;
    let widths: Vec<usize> = visible.iter().map(|words| line_width(words)).collect();
    let fits = widths.iter().all(|&w| w <= max_chars_per_line);
    let text_rows: u16 = widths
        .iter()
        .map(|&w| w.div_ceil(max_chars_per_line).max(1) as u16)
        .sum::<u16>()
        .max(1);
    let padding = area.height.saturating_sub(text_rows + 4) / 2;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(padding),
            Constraint::Length(2),
            Constraint::Length(text_rows),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(area);

    let timer_text = match model.phase {
        Phase::Idle => format!("{}s  start typing to begin", model.seconds_remaining),
        _ => model.seconds_remaining.to_string(),
    };
    Paragraph::new(Span::styled(timer_text, styles.untyped))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

    let text: Vec<Line> = visible
        .iter()
        .map(|words| styled_line(words, styles))
        .collect();
    Paragraph::new(text)
        .alignment(if fits {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true })
        .render(chunks[2], buf);

    let counters = format!(
        "{} words   {} correct",
        model.live.committed, model.live.correct
    );
    Paragraph::new(Span::styled(counters, styles.italic))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

    let legend = Paragraph::new(Span::styled("(tab) new text / (esc)ape", styles.italic));
    if let Some(last) = chunks.last() {
        let bottom = Rect {
            y: last.bottom().saturating_sub(1),
            height: last.height.min(1),
            ..*last
        };
        legend.render(bottom, buf);
    }
}

/// Display width of a line of words, one space after each word.
fn line_width(words: &[ClassifiedWord]) -> usize {
    words.iter().map(|w| w.text().width() + 1).sum()
}

fn styled_line(words: &[ClassifiedWord], styles: &Styles) -> Line<'static> {
    let mut spans = Vec::new();

    for word in words {
        let mut caret_pending = false;

        for c in &word.chars {
            let Some(ch) = c.ch else {
                caret_pending = true;
                continue;
            };

            let mut style = match c.class {
                CharClass::MatchedCorrect => styles.correct,
                CharClass::MatchedIncorrect => styles.incorrect,
                CharClass::Untyped | CharClass::Caret => styles.untyped,
            };
            if word.status == SlotStatus::Incorrect {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            if std::mem::take(&mut caret_pending) {
                style = style.patch(styles.caret);
            }
            spans.push(Span::styled(ch.to_string(), style));
        }

        // caret past the last character sits on the separating space
        let gap = if caret_pending {
            styles.caret
        } else {
            Style::default()
        };
        spans.push(Span::styled(" ", gap));
    }

    Line::from(spans)
}

fn render_results(app: &App, styles: &Styles, area: Rect, buf: &mut Buffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1), // title
            Constraint::Length(1), // stats
            Constraint::Length(1), // word counts
            Constraint::Min(1),
            Constraint::Length(1), // legend
        ])
        .split(area);

    Paragraph::new(Span::styled(
        "Time's up!",
        Style::default().patch(styles.bold).fg(Color::Yellow),
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    let (stats, detail) = match app.session.metrics().ready() {
        Some(metrics) => (
            format!("{} wpm   {}% acc", metrics.wpm, metrics.accuracy),
            format!(
                "{} of {} words correct in {}s",
                metrics.correct,
                metrics.attempted,
                app.session.duration()
            ),
        ),
        None => (String::from("no results"), String::new()),
    };

    Paragraph::new(Span::styled(stats, styles.bold))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    Paragraph::new(Span::styled(
        detail,
        Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);

    Paragraph::new(Span::styled(
        "(r)estart / (tab) new text / (esc)ape",
        styles.italic,
    ))
    .render(chunks[5], buf);
}

use crate::app::{App, CatalogStatus, Mode};
use crate::i18n::Strings;
use crate::pipeline::{Card, RenderPlan};
use crate::prefs::Theme;
use ratatui::{prelude::*, widgets::*};

const MAX_DESCRIPTION_LINES: usize = 3;

struct Palette {
    bg: Color,
    fg: Color,
    muted: Color,
    accent: Color,
}

fn palette(theme: Theme, accent: Color) -> Palette {
    match theme {
        Theme::Light => Palette {
            bg: Color::Rgb(250, 250, 247),
            fg: Color::Rgb(30, 30, 30),
            muted: Color::Rgb(120, 120, 120),
            accent,
        },
        Theme::Dark => Palette {
            bg: Color::Rgb(22, 22, 26),
            fg: Color::Rgb(228, 228, 228),
            muted: Color::Rgb(140, 140, 150),
            accent,
        },
    }
}

pub fn ui(f: &mut Frame, app: &App) {
    let p = palette(app.prefs.theme(), app.accent);
    let strings = app.strings();
    f.render_widget(Block::default().style(Style::default().bg(p.bg).fg(p.fg)), f.area());

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(f.area());

    render_header(f, app, &p, chunks[0]);
    render_search(f, app, &p, chunks[1]);

    let mut show_more = false;
    match &app.status {
        CatalogStatus::Pending => render_message(f, strings.loading, Style::default().fg(p.muted), chunks[2]),
        CatalogStatus::Failed(e) => {
            render_message(f, e.message(app.language()), Style::default().fg(Color::Red), chunks[2])
        }
        CatalogStatus::Ready => match app.pipeline.render() {
            RenderPlan::Empty => render_message(f, strings.no_results, Style::default().fg(p.muted), chunks[2]),
            RenderPlan::Cards { cards, show_more: more } => {
                show_more = more;
                render_cards(f, &cards, app.selected_index, strings, &p, chunks[2]);
            }
        },
    }

    if show_more {
        let text = format!("▼ {} (m) ▼", strings.load_more);
        f.render_widget(
            Paragraph::new(text).alignment(Alignment::Center).style(Style::default().fg(p.accent).add_modifier(Modifier::BOLD)),
            chunks[3],
        );
    }

    let bottom = match &app.notice {
        Some(notice) => format!(" {} ", notice),
        None if app.bilingual() => strings.hints.to_string(),
        None => strings.hints_single.to_string(),
    };
    f.render_widget(Paragraph::new(bottom).style(Style::default().bg(p.accent).fg(Color::Black)), chunks[4]);
}

fn render_header(f: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let strings = app.strings();
    let title = Line::from(vec![Span::styled(
        format!(" {} ", strings.header),
        Style::default().fg(p.accent).add_modifier(Modifier::BOLD),
    )]);
    f.render_widget(Paragraph::new(title), area);

    let mut tags = format!("{}/{}", app.pipeline.displayed_len(), app.pipeline.visible_len());
    if app.bilingual() {
        tags.push_str(&format!("  {}", app.language().tag()));
    }
    tags.push_str(&format!("  {} ", app.prefs.theme().tag()));
    f.render_widget(
        Paragraph::new(tags).alignment(Alignment::Right).style(Style::default().fg(p.muted)),
        area,
    );
}

fn render_search(f: &mut Frame, app: &App, p: &Palette, area: Rect) {
    let focused = app.mode == Mode::Searching;
    let border_color = if focused { p.accent } else { p.muted };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(format!(" {} ", app.strings().search), Style::default().fg(border_color)));

    let (text, style) = if app.input.is_empty() && !focused {
        ("/", Style::default().fg(p.muted))
    } else {
        (app.input.as_str(), Style::default().fg(p.fg))
    };
    f.render_widget(Paragraph::new(text).style(style).block(block), area);

    if focused {
        let typed = u16::try_from(app.input.chars().count()).unwrap_or(u16::MAX);
        let x = area.x.saturating_add(1).saturating_add(typed);
        f.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn render_message(f: &mut Frame, msg: &str, style: Style, area: Rect) {
    let text = vec![Line::from(""), Line::from(msg.to_string())];
    f.render_widget(
        Paragraph::new(text).alignment(Alignment::Center).style(style).wrap(Wrap { trim: true }),
        area,
    );
}

fn render_cards(f: &mut Frame, cards: &[Card<'_>], selected: usize, strings: &Strings, p: &Palette, area: Rect) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let rendered: Vec<Vec<Line<'static>>> = cards
        .iter()
        .enumerate()
        .map(|(i, card)| card_lines(card, inner_width, strings, p, i == selected))
        .collect();
    let heights: Vec<u16> = rendered.iter().map(|lines| lines.len() as u16 + 2).collect();
    let start = first_visible(&heights, selected, area.height);

    let mut y = area.y;
    for (i, lines) in rendered.into_iter().enumerate().skip(start) {
        if y >= area.bottom() {
            break;
        }
        let height = heights[i].min(area.bottom() - y);
        if height < 3 {
            break;
        }

        let is_selected = i == selected;
        let border_color = if is_selected { p.accent } else { p.muted };
        let mut block = Block::default().borders(Borders::ALL).border_style(Style::default().fg(border_color));
        if let Some(number) = cards[i].number {
            block = block.title(Span::styled(format!(" {} ", number), Style::default().fg(p.accent)));
        }

        f.render_widget(Paragraph::new(lines).block(block), Rect::new(area.x, y, area.width, height));
        y += height;
    }
}

/// Index of the first card to draw so that `selected` still fits on screen.
fn first_visible(heights: &[u16], selected: usize, available: u16) -> usize {
    if heights.is_empty() {
        return 0;
    }
    let selected = selected.min(heights.len() - 1);
    let mut used: u32 = heights[..=selected].iter().map(|&h| h as u32).sum();
    let mut start = 0;
    while start < selected && used > available as u32 {
        used -= heights[start] as u32;
        start += 1;
    }
    start
}

fn card_lines(card: &Card<'_>, width: usize, strings: &Strings, p: &Palette, selected: bool) -> Vec<Line<'static>> {
    let mut title = vec![Span::styled(
        card.title.to_string(),
        Style::default().fg(p.fg).add_modifier(Modifier::BOLD),
    )];
    if let Some(subtitle) = card.subtitle {
        title.push(Span::styled(format!(" - {}", subtitle), Style::default().fg(p.muted)));
    }

    let mut lines = vec![Line::from(title)];
    lines.extend(
        textwrap::wrap(card.description, width.max(1))
            .into_iter()
            .take(MAX_DESCRIPTION_LINES)
            .map(|w| Line::from(Span::styled(w.into_owned(), Style::default().fg(p.fg)))),
    );

    let action_style = if selected {
        Style::default().bg(p.accent).fg(Color::Black)
    } else {
        Style::default().fg(p.accent)
    };
    lines.push(Line::from(Span::styled(format!("[ {} ]", strings.read), action_style)));
    lines
}

use std::borrow::Cow;

use super::state::{AppState, InputMode};
use crate::lists::model::{AggregatedData, Profile};
use crate::lists::search::{highlight, Highlight};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

pub fn draw(f: &mut Frame, state: &AppState, data: &AggregatedData) {
    if state.log_focus {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(f.area());

        draw_header(f, state, data, chunks[0]);
        draw_logs(f, state, chunks[1]);
        draw_footer(f, state, chunks[2]);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(6),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, state, data, chunks[0]);
    draw_search(f, state, chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[2]);
    draw_profiles(f, state, data, body[0]);
    draw_detail(f, state, data, body[1]);

    draw_logs(f, state, chunks[3]);
    draw_footer(f, state, chunks[4]);
}

fn draw_header(f: &mut Frame, state: &AppState, data: &AggregatedData, area: Rect) {
    let mut spans = vec![
        Span::styled(" Skylists ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled(format!("@{}", state.user_handle), Style::default().fg(Color::White)),
        Span::styled(" | Profiles: ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("{}/{}", state.rows.len(), data.profiles.len())),
        Span::styled(" | Lists: ", Style::default().fg(Color::DarkGray)),
        Span::raw(data.lists.len().to_string()),
    ];
    if state.busy {
        spans.push(Span::styled(" | BUSY", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
    }
    if let Some(status) = &state.status {
        spans.push(Span::styled(format!(" | {}", status), Style::default().fg(Color::Yellow)));
    }

    let para = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(para, area);
}

fn draw_search(f: &mut Frame, state: &AppState, area: Rect) {
    let editing = state.mode == InputMode::Search;
    let mut spans = Vec::new();
    if state.search_input.is_empty() && !editing {
        spans.push(Span::styled(
            "e.g. developer +engineer -recruiter",
            Style::default().fg(Color::DarkGray),
        ));
    } else {
        spans.push(Span::raw(state.search_input.clone()));
    }
    if editing {
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow).add_modifier(Modifier::SLOW_BLINK)));
    }

    let only_unlisted = if state.filter.not_in_list_only { "[x]" } else { "[ ]" };
    let title = format!(
        " Search handles & bios (+word must, -word must not) | {} only profiles not in a list ",
        only_unlisted
    );
    let border = if editing { Color::Yellow } else { Color::DarkGray };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn draw_profiles(f: &mut Frame, state: &AppState, data: &AggregatedData, area: Rect) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let visible_lines = (area.height.saturating_sub(3) as usize).max(1); // borders + header row
    let shown = state.shown();

    if shown.is_empty() {
        let para = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "No matching profiles",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().title(" Profiles ").borders(Borders::ALL));
        f.render_widget(para, area);
        return;
    }

    // Keep the selection on screen.
    let offset = (state.selected + 1).saturating_sub(visible_lines);

    let name_w = inner_width.saturating_sub(3 + 4 + 2).max(4);
    let mut rows: Vec<Row> = shown
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible_lines)
        .map(|(row_idx, &profile_idx)| {
            let profile = &data.profiles[profile_idx];
            let marker = match (profile.following, profile.followed_by) {
                (true, true) => "<>",
                (true, false) => " >",
                (false, true) => "< ",
                (false, false) => "  ",
            };
            let style = if row_idx == state.selected {
                Style::default().fg(Color::Black).bg(Color::Cyan)
            } else if profile.lists.is_empty() {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::Gray)
            };
            Row::new(vec![
                Cell::from(marker),
                Cell::from(truncate_with_ellipsis(&profile_line(profile), name_w).into_owned()),
                Cell::from(profile.lists.len().to_string()),
            ])
            .style(style)
        })
        .collect();

    if state.has_more() && rows.len() < visible_lines {
        rows.push(Row::new(vec![
            Cell::from(""),
            Cell::from(Span::styled("Loading more...", Style::default().fg(Color::DarkGray))),
            Cell::from(""),
        ]));
    }

    let title = format!(" Profiles [{}/{}] ", state.selected + 1, state.rows.len());
    let table = Table::new(
        rows,
        [
            Constraint::Length(3),
            Constraint::Min(name_w as u16),
            Constraint::Length(4),
        ],
    )
    .header(
        Row::new(vec!["", "Name", "In"])
            .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().title(title).borders(Borders::ALL));
    f.render_widget(table, area);
}

fn profile_line(profile: &Profile) -> String {
    match profile.display_name.as_deref().filter(|n| !n.is_empty()) {
        Some(name) => format!("{} (@{})", name, profile.handle),
        None => format!("@{}", profile.handle),
    }
}

fn draw_detail(f: &mut Frame, state: &AppState, data: &AggregatedData, area: Rect) {
    let Some(profile) = state.selected_profile().map(|i| &data.profiles[i]) else {
        let block = Block::default().title(" Profile ").borders(Borders::ALL);
        f.render_widget(block, area);
        return;
    };

    let mut lines = vec![
        Line::from(Span::styled(
            profile.label().to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
    ];
    if profile.display_name.as_deref().is_some_and(|n| !n.is_empty()) {
        lines.push(Line::from(Span::styled(
            format!("@{}", profile.handle),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let mut pills = Vec::new();
    if !profile.following {
        pills.push(Span::styled(" Not followed by you ", Style::default().fg(Color::Black).bg(Color::Green)));
        pills.push(Span::raw(" "));
    }
    if profile.followed_by {
        pills.push(Span::styled(" Follows you ", Style::default().fg(Color::Black).bg(Color::Green)));
    }
    if !pills.is_empty() {
        lines.push(Line::from(pills));
    }
    lines.push(Line::from(""));

    match profile.description.as_deref().filter(|d| !d.trim().is_empty()) {
        Some(bio) => {
            let tokens = &state.filter.tokens;
            for bio_line in bio.lines() {
                let spans: Vec<Span> = highlight(bio_line, &tokens.required, &tokens.optional)
                    .into_iter()
                    .map(|(text, kind)| match kind {
                        Highlight::Required => Span::styled(text, Style::default().fg(Color::Black).bg(Color::LightGreen)),
                        Highlight::Optional => Span::styled(text, Style::default().fg(Color::Black).bg(Color::LightYellow)),
                        Highlight::None => Span::raw(text),
                    })
                    .collect();
                lines.push(Line::from(spans));
            }
        }
        None => lines.push(Line::from(Span::styled("No bio", Style::default().fg(Color::Red)))),
    }
    lines.push(Line::from(""));

    if data.lists.is_empty() {
        lines.push(Line::from(Span::styled(
            "You don't own any lists yet",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for (i, list) in data.lists.iter().enumerate() {
        let member = profile.is_in_list(&list.uri);
        let check = if member { "[x] " } else { "[ ] " };
        let mut style = if member {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Gray)
        };
        if i == state.list_cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        lines.push(Line::from(Span::styled(format!("{}{}", check, list.name), style)));
    }

    let para = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().title(" Profile ").borders(Borders::ALL));
    f.render_widget(para, area);
}

fn draw_logs(f: &mut Frame, state: &AppState, area: Rect) {
    let max_width = area.width.saturating_sub(2) as usize; // borders
    let visible_lines = area.height.saturating_sub(2) as usize;

    let total = state.logs.len();
    let offset = if state.log_focus {
        state.log_scroll_offset.min(total.saturating_sub(visible_lines))
    } else {
        0
    };

    let lines: Vec<Line> = state
        .logs
        .iter()
        .rev()
        .skip(offset)
        .take(visible_lines)
        .map(|l| {
            let color = match l.level.as_str() {
                "ERROR" => Color::Red,
                "WARN" => Color::Yellow,
                _ => Color::DarkGray,
            };
            let prefix = format!(" {} [{}] ", l.time, l.level);
            let msg_max = max_width.saturating_sub(prefix.len());
            let msg = truncate_with_ellipsis(&l.message, msg_max);
            Line::from(vec![
                Span::styled(prefix, Style::default().fg(color)),
                Span::raw(msg.into_owned()),
            ])
        })
        .collect();

    let title = if state.log_focus {
        format!(" Log [{}/{} lines] ", offset + visible_lines.min(total), total)
    } else {
        " Log ".to_string()
    };

    let para = Paragraph::new(lines).block(Block::default().title(title).borders(Borders::ALL));
    f.render_widget(para, area);
}

fn draw_footer(f: &mut Frame, state: &AppState, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));
    let line = if state.log_focus {
        Line::from(vec![
            key("  [Esc]"),
            Span::raw(" back  "),
            key("[j/k]"),
            Span::raw(" scroll  "),
        ])
    } else if state.mode == InputMode::Search {
        Line::from(vec![
            key("  [Enter/Esc]"),
            Span::raw(" done  "),
            Span::raw("type to search"),
        ])
    } else {
        Line::from(vec![
            key("  [q]"),
            Span::raw("uit  "),
            key("[/]"),
            Span::raw(" search  "),
            key("[n]"),
            Span::raw("ot in a list  "),
            key("[j/k]"),
            Span::raw(" move  "),
            key("[h/l]"),
            Span::raw(" pick list  "),
            key("[space]"),
            Span::raw(" toggle  "),
            key("[L]"),
            Span::raw("ogs  "),
        ])
    };
    f.render_widget(Paragraph::new(line), area);
}

fn truncate_with_ellipsis(s: &str, max_width: usize) -> Cow<'_, str> {
    let char_count = s.chars().count();
    if char_count <= max_width {
        Cow::Borrowed(s)
    } else if max_width <= 3 {
        Cow::Owned(".".repeat(max_width))
    } else {
        let end = s
            .char_indices()
            .nth(max_width - 3)
            .map(|(i, _)| i)
            .unwrap_or(s.len());
        Cow::Owned(format!("{}...", &s[..end]))
    }
}

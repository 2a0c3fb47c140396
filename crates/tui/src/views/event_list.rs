use crate::app::{App, FilterMode};
use crate::theme::Theme;
use chrono::NaiveDate;
use eventdeck_api::EventRecord;
use ratatui::prelude::*;
use ratatui::widgets::{List, ListItem, Paragraph};

pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    if app.filtered_events.is_empty() {
        let msg = if app.loading_events {
            "Loading events..."
        } else if app.events.is_empty() {
            "No events yet. Press n to create one, or r to refresh."
        } else if !app.search_query.is_empty() {
            "No events match the current search."
        } else {
            "No events in this view. Press f to cycle the filter."
        };
        render_empty(frame, area, msg, app);
        return;
    }

    let today = chrono::Local::now().date_naive();
    let own_user = app.config.session.user_id.clone();
    let items: Vec<ListItem> = app
        .filtered_events
        .iter()
        .filter_map(|&idx| app.events.get(idx))
        .map(|event| event_to_list_item(event, today, &own_user))
        .collect();

    let list = List::new(items)
        .block(Theme::block_dim().title(list_title(app)))
        .highlight_style(
            Style::new()
                .bg(Theme::BG_SURFACE)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(" > ")
        .highlight_spacing(ratatui::widgets::HighlightSpacing::Always);

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn event_to_list_item(event: &EventRecord, today: NaiveDate, own_user: &str) -> ListItem<'static> {
    let date_color = if event.date > today {
        Theme::ACCENT_GREEN
    } else if event.date < today {
        Theme::TEXT_MUTED
    } else {
        Theme::ACCENT_YELLOW
    };

    // Line 1: title + TODAY badge + attending marker
    let mut line1_spans = vec![Span::styled(
        truncate(&event.name, 70),
        Style::new().fg(Theme::TEXT_PRIMARY).bold(),
    )];
    if event.date == today {
        line1_spans.push(Span::raw(" "));
        line1_spans.push(Span::styled(
            " TODAY ",
            Style::new().fg(Color::Black).bg(Theme::ACCENT_YELLOW).bold(),
        ));
    }
    if !own_user.is_empty() && event.attendees.iter().any(|a| a == own_user) {
        line1_spans.push(Span::styled(
            "  attending",
            Style::new().fg(Theme::ACCENT_GREEN),
        ));
    }
    let line1 = Line::from(line1_spans);

    // Line 2: date, attendee count, description
    let line2 = Line::from(vec![
        Span::raw("   "),
        Span::styled(
            event.date.format("%Y-%m-%d").to_string(),
            Style::new().fg(date_color),
        ),
        Span::styled("  ", Style::new().fg(Theme::TEXT_MUTED)),
        Span::styled(
            attendees_label(event.attendees_count),
            Style::new().fg(Theme::ACCENT_PURPLE),
        ),
        Span::styled("  ", Style::new().fg(Theme::TEXT_MUTED)),
        Span::styled(
            truncate(&event.description, 60),
            Style::new().fg(Theme::TEXT_SECONDARY),
        ),
    ]);

    let line3 = Line::raw("");
    ListItem::new(vec![line1, line2, line3])
}

fn render_empty(frame: &mut Frame, area: Rect, msg: &str, app: &App) {
    let block = Theme::block_dim()
        .title(list_title(app))
        .padding(Theme::PADDING_CARD);
    let paragraph = Paragraph::new(msg)
        .block(block)
        .style(Style::new().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

fn list_title(app: &App) -> String {
    let mut base = format!(" Events · {} ", app.filter_mode.label());
    if app.searching {
        base.push_str(&format!("[search: {}_] ", app.search_query));
    } else if !app.search_query.is_empty() {
        base.push_str(&format!("[search: {}] ", app.search_query));
    }
    if app.filter_mode != FilterMode::All || !app.search_query.is_empty() {
        base.push_str(&format!("({}/{}) ", app.filtered_events.len(), app.events.len()));
    }
    base
}

fn attendees_label(count: usize) -> String {
    if count == 1 {
        "1 attendee".to_string()
    } else {
        format!("{count} attendees")
    }
}

pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::App;
    use crate::async_ops::CommandResult;
    use crate::config::Config;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;

    fn buffer_to_string(buffer: &Buffer) -> String {
        let area = *buffer.area();
        let mut out = String::new();
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn sample_event(id: &str, name: &str) -> EventRecord {
        EventRecord {
            id: id.to_string(),
            name: name.to_string(),
            description: "A gathering".to_string(),
            date: NaiveDate::from_ymd_opt(2099, 1, 1).unwrap(),
            attendees: vec!["u1".to_string(), "u2".to_string()],
            attendees_count: 2,
        }
    }

    #[test]
    fn render_shows_event_name_and_attendee_count() {
        let mut app = App::new(Config::default());
        app.apply_command_result(CommandResult::Events(Ok(vec![sample_event(
            "1",
            "TechConf 2099",
        )])));

        let backend = TestBackend::new(100, 20);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, &mut app, area);
            })
            .expect("draw");

        let text = buffer_to_string(terminal.backend().buffer());
        assert!(text.contains("TechConf 2099"));
        assert!(text.contains("2 attendees"));
        assert!(text.contains("2099-01-01"));
    }

    #[test]
    fn render_shows_empty_state_hint() {
        let mut app = App::new(Config::default());
        app.apply_command_result(CommandResult::Events(Ok(vec![])));

        let backend = TestBackend::new(100, 20);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, &mut app, area);
            })
            .expect("draw");

        let text = buffer_to_string(terminal.backend().buffer());
        assert!(text.contains("No events yet"));
    }

    #[test]
    fn truncate_keeps_short_strings_intact() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer string", 8), "a longe…");
    }
}

use crate::app::{App, FlashLevel, ServerStatus, View};
use crate::theme::Theme;
use crate::views::{event_form, event_list, help, login, modal};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

pub fn render(frame: &mut Frame, app: &mut App) {
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, app, header_area);

    match app.view {
        View::EventList => event_list::render(frame, app, body_area),
        View::EventForm => event_form::render(frame, app, body_area),
        View::Login => login::render(frame, app, body_area),
        View::Help => {} // rendered as overlay below
    }

    render_footer(frame, app, footer_area);

    // Help overlay
    if matches!(app.view, View::Help) {
        help::render(frame, frame.area());
    }

    // Modal overlay
    if let Some(ref m) = app.modal {
        modal::render(frame, m);
    }
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let block = Theme::block();
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Left side: title + session badge + filter + event count
    let (badge_text, badge_bg) = if app.is_signed_in() {
        (format!(" {} ", app.config.session.user_id), Theme::BADGE_SIGNED_IN)
    } else {
        (" ANON ".to_string(), Theme::BADGE_ANON)
    };

    let count_span = if app.loading_events {
        Span::styled("Loading...", Style::new().fg(Theme::ACCENT_YELLOW).italic())
    } else {
        Span::styled(
            format!("{} events", app.filtered_events.len()),
            Style::new().fg(Theme::TEXT_SECONDARY),
        )
    };

    let mut left_spans = vec![
        Span::styled(" eventdeck ", Style::new().fg(Theme::ACCENT_ORANGE).bold()),
        Span::styled(" ", Style::new()),
        Span::styled(badge_text, Style::new().fg(Color::Black).bg(badge_bg).bold()),
        Span::styled("  ", Style::new()),
        Span::styled(app.filter_mode.label(), Style::new().fg(Theme::ACCENT_BLUE)),
        Span::styled("  ", Style::new()),
        count_span,
    ];

    if !app.search_query.is_empty() {
        left_spans.push(Span::styled(
            format!("  (filtered from {})", app.events.len()),
            Style::new().fg(Color::DarkGray),
        ));
    }

    let p = Paragraph::new(Line::from(left_spans)).alignment(Alignment::Left);
    frame.render_widget(p, inner);

    // Right side: server status + realtime channel status
    let server_span = match app.server_status {
        ServerStatus::Unknown => Span::styled("server:? ", Style::new().fg(Theme::TEXT_MUTED)),
        ServerStatus::Online(ref version) => Span::styled(
            format!("server:{version} "),
            Style::new().fg(Theme::ACCENT_GREEN),
        ),
        ServerStatus::Offline => {
            Span::styled("server:offline ", Style::new().fg(Theme::ACCENT_RED))
        }
    };
    let live_span = match app.live_subscription {
        Some(ref sub) if sub.is_active() => {
            Span::styled("live ", Style::new().fg(Theme::ACCENT_GREEN))
        }
        Some(_) => Span::styled("live:off ", Style::new().fg(Theme::TEXT_SECONDARY)),
        None => Span::styled("live:off ", Style::new().fg(Theme::TEXT_MUTED)),
    };
    let p_right =
        Paragraph::new(Line::from(vec![server_span, live_span])).alignment(Alignment::Right);
    frame.render_widget(p_right, inner);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let key_style = Style::new().fg(Theme::TEXT_KEY);
    let desc_style = Style::new().fg(Theme::TEXT_KEY_DESC);

    let help = match app.view {
        View::EventList => {
            if app.searching {
                Line::from(vec![
                    Span::styled(
                        " / ",
                        Style::new()
                            .fg(Color::Black)
                            .bg(Theme::ACCENT_YELLOW)
                            .bold(),
                    ),
                    Span::styled(
                        format!(" {}", app.search_query),
                        Style::new().fg(Theme::TEXT_PRIMARY),
                    ),
                    Span::styled("_", Style::new().fg(Theme::ACCENT_YELLOW)),
                    Span::styled("  ESC cancel  Enter confirm", desc_style),
                ])
            } else {
                let mut spans = vec![
                    Span::styled(" j/k ", key_style),
                    Span::styled("navigate  ", desc_style),
                    Span::styled("/ ", key_style),
                    Span::styled("search  ", desc_style),
                    Span::styled("f ", key_style),
                    Span::styled("filter  ", desc_style),
                    Span::styled("r ", key_style),
                    Span::styled("refresh  ", desc_style),
                ];
                if app.is_signed_in() {
                    spans.push(Span::styled("n ", key_style));
                    spans.push(Span::styled("new  ", desc_style));
                    spans.push(Span::styled("e ", key_style));
                    spans.push(Span::styled("edit  ", desc_style));
                    spans.push(Span::styled("d ", key_style));
                    spans.push(Span::styled("delete  ", desc_style));
                    spans.push(Span::styled("a ", key_style));
                    spans.push(Span::styled("attend  ", desc_style));
                    spans.push(Span::styled("l ", key_style));
                    spans.push(Span::styled("logout  ", desc_style));
                } else {
                    spans.push(Span::styled("l ", key_style));
                    spans.push(Span::styled("sign in  ", desc_style));
                }
                spans.push(Span::styled("? ", key_style));
                spans.push(Span::styled("help  ", desc_style));
                spans.push(Span::styled("q ", key_style));
                spans.push(Span::styled("quit", desc_style));
                Line::from(spans)
            }
        }
        View::EventForm => Line::from(vec![
            Span::styled(" Tab ", key_style),
            Span::styled("field  ", desc_style),
            Span::styled("Enter ", key_style),
            Span::styled("save  ", desc_style),
            Span::styled("Esc ", key_style),
            Span::styled("cancel", desc_style),
        ]),
        View::Login => Line::from(vec![
            Span::styled(" ←/→ ", key_style),
            Span::styled("mode  ", desc_style),
            Span::styled("Tab ", key_style),
            Span::styled("field  ", desc_style),
            Span::styled("Enter ", key_style),
            Span::styled("submit  ", desc_style),
            Span::styled("Esc ", key_style),
            Span::styled("back", desc_style),
        ]),
        View::Help => Line::raw(""),
    };

    let mut spans = help.spans;

    // Append flash message to any view's footer
    if let Some((ref msg, level)) = app.flash_message {
        let color = match level {
            FlashLevel::Success => Theme::ACCENT_GREEN,
            FlashLevel::Error => Theme::ACCENT_RED,
            FlashLevel::Info => Theme::ACCENT_BLUE,
        };
        spans.push(Span::styled("  ", Style::new()));
        spans.push(Span::styled(msg.as_str(), Style::new().fg(color)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

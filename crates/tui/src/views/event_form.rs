use crate::app::{App, FormField};
use crate::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(ref form) = app.form else {
        return;
    };

    let title = if form.is_edit() {
        " Edit Event "
    } else {
        " New Event "
    };
    let block = Theme::block_accent().title(title).padding(Theme::PADDING_CARD);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        field_line("Name", &form.name, form.focus == FormField::Name),
        Line::raw(""),
        field_line(
            "Description",
            &form.description,
            form.focus == FormField::Description,
        ),
        Line::raw(""),
        field_line("Date", &form.date, form.focus == FormField::Date),
        Line::from(Span::styled(
            "              YYYY-MM-DD",
            Style::new().fg(Theme::TEXT_HINT),
        )),
        Line::raw(""),
        Line::from(vec![
            Span::styled("Tab ", Style::new().fg(Theme::TEXT_KEY)),
            Span::styled("next field  ", Style::new().fg(Theme::TEXT_KEY_DESC)),
            Span::styled("Enter ", Style::new().fg(Theme::TEXT_KEY)),
            Span::styled("save  ", Style::new().fg(Theme::TEXT_KEY_DESC)),
            Span::styled("Esc ", Style::new().fg(Theme::TEXT_KEY)),
            Span::styled("cancel", Style::new().fg(Theme::TEXT_KEY_DESC)),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn field_line<'a>(label: &'a str, value: &'a str, focused: bool) -> Line<'a> {
    let label_style = if focused {
        Style::new().fg(Theme::ACCENT_BLUE).bold()
    } else {
        Style::new().fg(Theme::TEXT_SECONDARY)
    };
    let mut spans = vec![
        Span::styled(format!("{label:>11}  "), label_style),
        Span::styled(value, Style::new().fg(Theme::TEXT_PRIMARY)),
    ];
    if focused {
        spans.push(Span::styled("_", Style::new().fg(Theme::ACCENT_BLUE)));
    }
    Line::from(spans)
}

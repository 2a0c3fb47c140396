use crate::app::{App, LoginField};
use crate::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.login_form;

    let title = if form.signup_mode {
        " Sign Up "
    } else {
        " Sign In "
    };
    let block = Theme::block_accent().title(title).padding(Theme::PADDING_CARD);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mode_line = Line::from(vec![
        Span::styled("←/→ ", Style::new().fg(Theme::TEXT_KEY)),
        Span::styled(
            if form.signup_mode {
                "switch to sign in"
            } else {
                "switch to sign up"
            },
            Style::new().fg(Theme::TEXT_KEY_DESC),
        ),
    ]);

    let mut lines = Vec::new();
    if form.signup_mode {
        lines.push(field_line(
            "Username",
            &form.username,
            form.focus == LoginField::Username,
            false,
        ));
        lines.push(Line::raw(""));
    }
    lines.push(field_line(
        "Email",
        &form.email,
        form.focus == LoginField::Email,
        false,
    ));
    lines.push(Line::raw(""));
    lines.push(field_line(
        "Password",
        &form.password,
        form.focus == LoginField::Password,
        true,
    ));
    lines.push(Line::raw(""));
    lines.push(mode_line);
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled("Tab ", Style::new().fg(Theme::TEXT_KEY)),
        Span::styled("next field  ", Style::new().fg(Theme::TEXT_KEY_DESC)),
        Span::styled("Enter ", Style::new().fg(Theme::TEXT_KEY)),
        Span::styled("submit  ", Style::new().fg(Theme::TEXT_KEY_DESC)),
        Span::styled("Esc ", Style::new().fg(Theme::TEXT_KEY)),
        Span::styled("back", Style::new().fg(Theme::TEXT_KEY_DESC)),
    ]));
    frame.render_widget(Paragraph::new(lines), inner);
}

fn field_line(label: &str, value: &str, focused: bool, mask: bool) -> Line<'static> {
    let label_style = if focused {
        Style::new().fg(Theme::ACCENT_BLUE).bold()
    } else {
        Style::new().fg(Theme::TEXT_SECONDARY)
    };
    let shown = if mask {
        "•".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let mut spans = vec![
        Span::styled(format!("{label:>9}  "), label_style),
        Span::styled(shown, Style::new().fg(Theme::TEXT_PRIMARY)),
    ];
    if focused {
        spans.push(Span::styled("_", Style::new().fg(Theme::ACCENT_BLUE)));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::render;
    use crate::app::{App, View};
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

    #[test]
    fn login_mode_hides_username_and_masks_password() {
        let mut app = App::new(Config::default());
        app.view = View::Login;
        app.login_form.email = "a@b.com".to_string();
        app.login_form.password = "secret".to_string();

        let backend = TestBackend::new(80, 20);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, &app, area);
            })
            .expect("draw");

        let text = buffer_to_string(terminal.backend().buffer());
        assert!(text.contains("Sign In"));
        assert!(!text.contains("Username"));
        assert!(!text.contains("secret"));
        assert!(text.contains("••••••"));
    }

    #[test]
    fn signup_mode_shows_username_field() {
        let mut app = App::new(Config::default());
        app.view = View::Login;
        app.login_form.signup_mode = true;

        let backend = TestBackend::new(80, 20);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal
            .draw(|frame| {
                let area = frame.area();
                render(frame, &app, area);
            })
            .expect("draw");

        let text = buffer_to_string(terminal.backend().buffer());
        assert!(text.contains("Sign Up"));
        assert!(text.contains("Username"));
    }
}

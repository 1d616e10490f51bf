use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let page = app.session.page();

        let scroll_state = if app.driver.is_scrolling() {
            format!("▶ {:.2}x", app.driver.speed())
        } else if app.driver.is_enabled() {
            "⏸ paused".to_string()
        } else {
            "stopped".to_string()
        };

        let loading = if page.is_loading {
            " | loading…"
        } else if !page.has_more {
            " | end"
        } else {
            ""
        };

        let status_text = if let Some(msg) = &app.status {
            format!(" {msg}")
        } else {
            format!(
                " {} | {} items | {}{}",
                app.active_feed_name(),
                app.session.items().len(),
                scroll_state,
                loading,
            )
        };

        let help_hint = " q:quit a:scroll p:pause tab:feed o:sort s:star ";
        let padding_len = area
            .width
            .saturating_sub(status_text.len() as u16 + help_hint.len() as u16)
            as usize;

        let line = Line::from(vec![
            Span::styled(
                status_text,
                Style::default().fg(Color::White).bg(Color::DarkGray),
            ),
            Span::styled(" ".repeat(padding_len), Style::default().bg(Color::DarkGray)),
            Span::styled(
                help_hint,
                Style::default().fg(Color::Gray).bg(Color::DarkGray),
            ),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}

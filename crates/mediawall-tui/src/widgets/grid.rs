use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use mediawall_core::media::MediaKind;

use crate::app::App;

pub struct GridWidget;

impl GridWidget {
    /// Draw the virtualized masonry grid: only the tracker's visible set is
    /// ever turned into widgets, everything else stays unmounted.
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let grid = app.layout();
        if grid.is_empty() {
            let message = if app.session.page().is_loading {
                "loading…"
            } else if app.session.folders().is_empty() {
                "no folders configured (mediawall folders add <path>)"
            } else {
                "no items match the current filters"
            };
            let placeholder = Paragraph::new(message)
                .style(Style::default().fg(Color::DarkGray))
                .block(Block::default().borders(Borders::NONE));
            frame.render_widget(placeholder, area);
            return;
        }

        let scroll = app.scroll_top;
        let tile_width = grid.column_width.max(1.0) as u16;

        for &idx in app.visible() {
            let (Some(item), Some(pos)) =
                (app.session.items().get(idx), grid.positions.get(idx))
            else {
                continue;
            };

            let Some(tile) = tile_rect(area, pos.top - scroll, pos.left, pos.height, tile_width)
            else {
                continue;
            };

            let selected = app.selected == Some(idx);
            let star = if item.starred { "★ " } else { "" };
            let tag = match item.kind {
                MediaKind::Image => "img",
                MediaKind::Video => "vid",
            };

            let border_style = if selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            let mut lines = vec![Line::from(format!("{star}{}", item.file_name()))];
            if tile.height > 3 {
                let dims = match (item.width, item.height) {
                    (Some(w), Some(h)) => format!("{tag} {w}x{h}"),
                    _ => tag.to_string(),
                };
                lines.push(Line::from(dims).style(Style::default().fg(Color::DarkGray)));
            }

            let widget = Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).border_style(border_style));
            frame.render_widget(widget, tile);
        }
    }
}

/// Clip a tile to the grid area, in rows/columns relative to the scroll
/// offset. Returns `None` when the tile is fully off screen.
fn tile_rect(area: Rect, top: f64, left: f64, height: f64, width: u16) -> Option<Rect> {
    let bottom = top + height;
    if bottom <= 0.0 || top >= area.height as f64 {
        return None;
    }

    let clipped_top = top.max(0.0);
    let clipped_bottom = bottom.min(area.height as f64);
    let tile_height = (clipped_bottom - clipped_top).floor() as u16;
    if tile_height == 0 {
        return None;
    }

    let x = area.x.saturating_add(left.max(0.0) as u16);
    if x >= area.x + area.width {
        return None;
    }
    let width = width.min(area.x + area.width - x);

    Some(Rect {
        x,
        y: area.y + clipped_top as u16,
        width,
        height: tile_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_rect_clips_to_area() {
        let area = Rect::new(0, 2, 80, 40);

        // fully above the viewport
        assert!(tile_rect(area, -20.0, 0.0, 10.0, 10).is_none());
        // fully below
        assert!(tile_rect(area, 50.0, 0.0, 10.0, 10).is_none());

        // partially scrolled off the top
        let tile = tile_rect(area, -3.0, 5.0, 10.0, 10).unwrap();
        assert_eq!(tile.y, 2);
        assert_eq!(tile.height, 7);

        // hanging off the right edge gets narrowed
        let tile = tile_rect(area, 0.0, 75.0, 5.0, 10).unwrap();
        assert_eq!(tile.width, 5);
    }
}

use crate::terminal::Terminal;
use crossterm::style::Color;

pub const BLOOM_HELP: &str = "TERMBLOOM
Space/p  Pause or resume
?        Toggle this help
q/Esc    Quit";

/// Render a centered help overlay box with the provided text.
pub fn render_help_overlay(term: &mut Terminal, width: u16, height: u16, help_text: &str) {
    if help_text.is_empty() {
        return;
    }

    let lines: Vec<&str> = help_text.lines().collect();
    let max_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let box_width = max_width + 4; // 2 chars padding each side
    let box_height = lines.len() + 2; // 1 row padding top/bottom

    // Center the box
    let start_x = (width as usize).saturating_sub(box_width) / 2;
    let start_y = (height as usize).saturating_sub(box_height) / 2;

    draw_box(
        term,
        start_x as i32,
        start_y as i32,
        box_width as i32,
        box_height as i32,
        Color::White,
    );

    let text_color = Color::Grey;
    for (i, line) in lines.iter().enumerate() {
        let y = start_y + 1 + i;
        let padding = max_width.saturating_sub(line.chars().count());
        let padded = format!(" {}{} ", line, " ".repeat(padding));
        term.set_str((start_x + 1) as i32, y as i32, &padded, Some(text_color), i == 0);
    }
}

/// Draw a single-line border, e.g. ┌──┐ │  │ └──┘
pub fn draw_box(term: &mut Terminal, x: i32, y: i32, width: i32, height: i32, color: Color) {
    if width < 2 || height < 2 {
        return;
    }
    let right = x + width - 1;
    let bottom = y + height - 1;

    term.set(x, y, '┌', Some(color), false);
    term.set(right, y, '┐', Some(color), false);
    term.set(x, bottom, '└', Some(color), false);
    term.set(right, bottom, '┘', Some(color), false);
    for cx in x + 1..right {
        term.set(cx, y, '─', Some(color), false);
        term.set(cx, bottom, '─', Some(color), false);
    }
    for cy in y + 1..bottom {
        term.set(x, cy, '│', Some(color), false);
        term.set(right, cy, '│', Some(color), false);
        // Blank the interior so the overlay hides what's behind it
        for cx in x + 1..right {
            term.set(cx, cy, ' ', None, false);
        }
    }
}

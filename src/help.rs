use crate::terminal::Terminal;
use crossterm::style::Color;

/// Box-drawing frame around `lines`, centered on a `width` x `height` screen.
/// Returns the top-left corner and the framed rows.
fn framed(width: u16, height: u16, lines: &[&str]) -> (i32, i32, Vec<String>) {
    let inner = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 2;
    let mut rows = Vec::with_capacity(lines.len() + 2);
    rows.push(format!("┌{}┐", "─".repeat(inner)));
    for line in lines {
        let pad = inner - 1 - line.chars().count();
        rows.push(format!("│ {}{}│", line, " ".repeat(pad)));
    }
    rows.push(format!("└{}┘", "─".repeat(inner)));

    let x = (width as usize).saturating_sub(inner + 2) / 2;
    let y = (height as usize).saturating_sub(rows.len()) / 2;
    (x as i32, y as i32, rows)
}

/// Draw a centered help box over whatever is in the buffer.
pub fn render_help_overlay(term: &mut Terminal, help_text: &str) {
    if help_text.is_empty() {
        return;
    }
    let (width, height) = term.size();
    let lines: Vec<&str> = help_text.lines().collect();
    let (x, y, rows) = framed(width, height, &lines);
    let last = rows.len() - 1;

    for (i, row) in rows.iter().enumerate() {
        let y = y + i as i32;
        if i == 0 || i == last {
            term.set_str(x, y, row, Some(Color::White), false);
            continue;
        }
        // Border white, text grey
        let mut chars = row.chars();
        if let Some(left) = chars.next() {
            term.set(x, y, left, Some(Color::White), false);
        }
        let body: String = chars.collect();
        let body_len = body.chars().count() as i32;
        term.set_str(x + 1, y, &body, Some(Color::Grey), false);
        term.set(x + body_len, y, '│', Some(Color::White), false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_rows_share_a_width() {
        let (_, _, rows) = framed(80, 24, &["GLOBE", "q  Quit", "m  Toggle motion"]);
        assert_eq!(rows.len(), 5);
        let w = rows[0].chars().count();
        assert!(rows.iter().all(|r| r.chars().count() == w));
        assert!(rows[1].starts_with("│ GLOBE"));
    }

    #[test]
    fn frame_is_centered() {
        let (x, y, rows) = framed(40, 11, &["abcd"]);
        let w = rows[0].chars().count() as i32;
        assert_eq!(x, (40 - w) / 2);
        assert_eq!(y, (11 - 3) / 2);
    }
}

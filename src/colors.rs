use crate::globe::arcs::ArcColor;
use crossterm::event::KeyCode;
use crossterm::style::Color;

/// Decorative color schemes, dim to bright (intensity 0-3)
const SCHEMES: [[Color; 4]; 10] = [
    [Color::DarkGreen, Color::Green, Color::Green, Color::AnsiValue(10)],       // matrix
    [Color::DarkRed, Color::Red, Color::DarkYellow, Color::Yellow],             // fire
    [Color::DarkBlue, Color::DarkCyan, Color::Cyan, Color::AnsiValue(14)],      // ice (default)
    [Color::DarkMagenta, Color::Magenta, Color::Magenta, Color::AnsiValue(13)], // pink
    [Color::DarkYellow, Color::Yellow, Color::Yellow, Color::AnsiValue(11)],    // gold
    [Color::DarkCyan, Color::Cyan, Color::White, Color::White],                 // electric
    [Color::DarkRed, Color::Red, Color::Magenta, Color::AnsiValue(9)],          // lava
    [Color::DarkGrey, Color::Grey, Color::White, Color::White],                 // mono
    [Color::Red, Color::Yellow, Color::Green, Color::Cyan],                     // rainbow
    [Color::DarkBlue, Color::Blue, Color::Magenta, Color::AnsiValue(13)],       // neon
];

/// Active decorative scheme, switched with Shift+digit
#[derive(Clone, Copy)]
pub struct ColorState {
    pub scheme: u8,
}

impl ColorState {
    pub fn new(default_scheme: u8) -> Self {
        Self { scheme: default_scheme.min(9) }
    }

    /// Returns true if the key picked a scheme
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let scheme = match code {
            KeyCode::Char(')') => 0,
            KeyCode::Char('!') => 1,
            KeyCode::Char('@') => 2,
            KeyCode::Char('#') => 3,
            KeyCode::Char('$') => 4,
            KeyCode::Char('%') => 5,
            KeyCode::Char('^') => 6,
            KeyCode::Char('&') => 7,
            KeyCode::Char('*') => 8,
            KeyCode::Char('(') => 9,
            _ => return false,
        };
        self.scheme = scheme;
        true
    }

    pub fn color(&self, intensity: u8) -> Color {
        scheme_color(self.scheme, intensity)
    }
}

pub fn scheme_color(scheme: u8, intensity: u8) -> Color {
    SCHEMES[scheme.min(9) as usize][intensity.min(3) as usize]
}

/// Arc colors ignore the decorative scheme
pub fn arc_color(color: ArcColor, opacity: f32) -> Color {
    let faded = opacity < 0.45;
    match (color, faded) {
        (ArcColor::Crimson, false) => Color::Red,
        (ArcColor::Crimson, true) => Color::DarkRed,
        (ArcColor::Amber, false) => Color::Yellow,
        (ArcColor::Amber, true) => Color::DarkYellow,
    }
}

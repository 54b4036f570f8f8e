//! Braille rasterizer for scene frames, plus the static reduced-motion backdrop

use super::projection::Vec3;
use super::scene::{Frame, Primitive, Tint};
use super::GLOBE_RADIUS;
use crate::colors::{arc_color, ColorState};
use crate::terminal::Terminal;
use crossterm::style::Color;

/// Fixed camera tilt so the northern hemisphere leans toward the viewer.
const VIEW_TILT: f32 = 0.3;
/// Globe radius as a share of half the smaller canvas side.
const GLOBE_FILL: f32 = 0.42;
const MIN_OPACITY: f32 = 0.06;

const DOT_BITS: [(usize, usize, u8); 8] = [
    (0, 0, 0x01), (1, 0, 0x02), (2, 0, 0x04),
    (0, 1, 0x08), (1, 1, 0x10), (2, 1, 0x20),
    (3, 0, 0x40), (3, 1, 0x80),
];

#[derive(Clone, Copy, Debug, PartialEq)]
struct Ink {
    color: Color,
    bold: bool,
    priority: u8,
}

/// Sub-cell dot grid: 2x4 dots per terminal cell.
pub struct BrailleCanvas {
    cols: usize,
    rows: usize,
    dots: Vec<Option<Ink>>,
}

impl BrailleCanvas {
    pub fn new(cols: u16, rows: u16) -> Self {
        let (cols, rows) = (cols as usize, rows as usize);
        Self { cols, rows, dots: vec![None; cols * 2 * rows * 4] }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        *self = Self::new(cols, rows);
    }

    pub fn clear(&mut self) {
        self.dots.fill(None);
    }

    fn width(&self) -> usize {
        self.cols * 2
    }

    fn height(&self) -> usize {
        self.rows * 4
    }

    fn plot(&mut self, x: i32, y: i32, ink: Ink) {
        if x < 0 || y < 0 || x as usize >= self.width() || y as usize >= self.height() {
            return;
        }
        let idx = y as usize * self.width() + x as usize;
        match self.dots[idx] {
            Some(existing) if existing.priority > ink.priority => {}
            _ => self.dots[idx] = Some(ink),
        }
    }

    fn line(&mut self, (x0, y0): (i32, i32), (x1, y1): (i32, i32), ink: Ink) {
        let (dx, dy) = ((x1 - x0).abs(), -(y1 - y0).abs());
        let (sx, sy) = (if x0 < x1 { 1 } else { -1 }, if y0 < y1 { 1 } else { -1 });
        let (mut x, mut y, mut err) = (x0, y0, dx + dy);
        loop {
            self.plot(x, y, ink);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn ring(&mut self, (cx, cy): (i32, i32), r: f32, ink: Ink) {
        let steps = ((r * std::f32::consts::TAU) as usize).max(8);
        for i in 0..steps {
            let a = i as f32 / steps as f32 * std::f32::consts::TAU;
            self.plot(cx + (a.cos() * r).round() as i32, cy + (a.sin() * r).round() as i32, ink);
        }
    }

    fn disc(&mut self, (cx, cy): (i32, i32), r: f32, ink: Ink) {
        let ri = r.ceil() as i32;
        for dy in -ri..=ri {
            for dx in -ri..=ri {
                if (dx * dx + dy * dy) as f32 <= r * r {
                    self.plot(cx + dx, cy + dy, ink);
                }
            }
        }
    }

    /// Fold dots into braille glyphs; each cell takes the color of its highest-priority dot.
    pub fn blit(&self, term: &mut Terminal) {
        for cy in 0..self.rows {
            for cx in 0..self.cols {
                let mut bits = 0u8;
                let mut top: Option<Ink> = None;
                for &(oy, ox, bit) in &DOT_BITS {
                    let idx = (cy * 4 + oy) * self.width() + cx * 2 + ox;
                    if let Some(ink) = self.dots[idx] {
                        bits |= bit;
                        if top.map_or(true, |t| ink.priority >= t.priority) {
                            top = Some(ink);
                        }
                    }
                }
                if let Some(ink) = top {
                    let ch = char::from_u32(0x2800 + bits as u32).unwrap_or(' ');
                    term.set(cx as i32, cy as i32, ch, Some(ink.color), ink.bold);
                }
            }
        }
    }
}

/// Orthographic camera looking down -Z from +Z.
pub struct Camera {
    cx: f32,
    cy: f32,
    scale: f32,
}

impl Camera {
    pub fn fit(canvas: &BrailleCanvas) -> Self {
        let (w, h) = (canvas.width() as f32, canvas.height() as f32);
        Self { cx: w / 2.0, cy: h / 2.0, scale: w.min(h) / 2.0 * GLOBE_FILL / GLOBE_RADIUS }
    }

    fn center(&self) -> (i32, i32) {
        (self.cx as i32, self.cy as i32)
    }

    /// Dot coordinates, or `None` when the globe hides the point.
    fn project(&self, p: Vec3) -> Option<(i32, i32)> {
        let v = p.rotate_x(VIEW_TILT);
        if v.z < 0.0 && v.x * v.x + v.y * v.y < GLOBE_RADIUS * GLOBE_RADIUS {
            return None;
        }
        Some(((self.cx + v.x * self.scale) as i32, (self.cy - v.y * self.scale) as i32))
    }
}

fn ink_for(tint: Tint, opacity: f32, colors: &ColorState) -> Ink {
    let (color, bold, priority) = match tint {
        Tint::Grid => (colors.color(0), false, 0),
        Tint::Ocean => (colors.color(0), false, 1),
        Tint::Particle | Tint::Orbit => (colors.color(1), false, 1),
        Tint::Land => (colors.color(2), false, 2),
        Tint::Scan => (colors.color(3), true, 4),
        Tint::Target => (colors.color(3), false, 5),
        Tint::Origin => (Color::Magenta, true, 5),
        Tint::Arc(c) => (arc_color(c, opacity), false, 6),
        Tint::Impact(c) => (arc_color(c, opacity), true, 7),
        Tint::Head => (Color::White, true, 7),
    };
    Ink { color, bold, priority }
}

/// Rasterize one frame onto the canvas (cleared first).
pub fn draw_frame(canvas: &mut BrailleCanvas, frame: &Frame, colors: &ColorState) {
    canvas.clear();
    let camera = Camera::fit(canvas);

    for primitive in &frame.primitives {
        match primitive {
            Primitive::Point { position, tint, opacity, .. } => {
                if *opacity < MIN_OPACITY {
                    continue;
                }
                if let Some((x, y)) = camera.project(*position) {
                    canvas.plot(x, y, ink_for(*tint, *opacity, colors));
                }
            }
            Primitive::Polyline { points, tint, opacity, .. } => {
                if *opacity < MIN_OPACITY {
                    continue;
                }
                let ink = ink_for(*tint, *opacity, colors);
                let mut prev = None;
                for p in points {
                    let cur = camera.project(*p);
                    match (prev, cur) {
                        (Some(a), Some(b)) => canvas.line(a, b, ink),
                        (None, Some(b)) => canvas.plot(b.0, b.1, ink),
                        _ => {}
                    }
                    prev = cur;
                }
            }
            Primitive::Marker { position, scale, tint, opacity, .. } => {
                if *opacity < MIN_OPACITY {
                    continue;
                }
                let Some(at) = camera.project(*position) else {
                    continue;
                };
                let ink = ink_for(*tint, *opacity, colors);
                let r = scale * camera.scale;
                match tint {
                    Tint::Impact(_) if r >= 1.0 => canvas.ring(at, r, ink),
                    _ if r >= 1.0 => canvas.disc(at, r, ink),
                    _ => canvas.plot(at.0, at.1, ink),
                }
            }
        }
    }
}

/// Static substitute for reduced-motion mode: a core disc inside concentric rings.
pub fn draw_static(canvas: &mut BrailleCanvas, colors: &ColorState) {
    canvas.clear();
    let camera = Camera::fit(canvas);
    let center = camera.center();
    let s = camera.scale;

    let core = Ink { color: colors.color(0), bold: false, priority: 1 };
    let shell = Ink { color: colors.color(2), bold: false, priority: 2 };
    let halo = Ink { color: colors.color(1), bold: false, priority: 1 };

    canvas.disc(center, 0.55 * s, core);
    canvas.ring(center, 0.55 * s, shell);
    canvas.ring(center, 0.8 * s, halo);
    canvas.ring(center, 1.0 * s, shell);
    canvas.ring(center, 1.6 * s, halo);
    canvas.ring(center, 2.0 * s, core);
}

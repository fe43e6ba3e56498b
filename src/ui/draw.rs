/// Drawing of world objects onto the terminal grid.
///
/// The canvas works in viewport pixels: a drawable subtracts the camera
/// from its world position, then the canvas maps pixels to cells
/// (`col = ⌊px / cell_px_w⌋`, `row = ⌊py / cell_px_h⌋`). A rectangle paints
/// every cell it touches; a glyph lands in the single cell containing its
/// anchor point and keeps that cell's background.
///
/// Anything outside the viewport is dropped.

use crossterm::style::Color;

use crate::domain::entity::{
    Actor, ActorKind, DoorTrigger, Facing, Particle, Projectile, ProjectileKind, PARTICLE_SIZE,
};
use crate::domain::physics::Rect;
use crate::domain::tile::{Tile, TILE_SIZE};
use crate::sim::level::{LevelGeometry, OverheadRoom, SideScrollLevel};
use crate::sim::mode::Mode;
use crate::sim::world::{Camera, Viewport};
use super::renderer::{Cell, FrameBuffer};

// ── Palette ──

const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb { r, g, b }
}

const SIDE_BG: (u8, u8, u8) = (0x00, 0x11, 0x22);
const DUNGEON_BG: (u8, u8, u8) = (0x00, 0x00, 0x33);
const PARTICLE: (u8, u8, u8) = (0xff, 0x66, 0x00);

pub const GROUND: Color = rgb(0x65, 0x43, 0x21);
pub const FLOOR: Color = rgb(0x22, 0x22, 0x44);
pub const WALL: Color = rgb(0x66, 0x66, 0x66);
const ACTOR_GREEN: Color = rgb(0x00, 0xff, 0x00);
const MARKER: Color = Color::White;
const TANK_BODY: Color = rgb(0x00, 0x66, 0xcc);
const TANK_TREAD: Color = rgb(0x33, 0x33, 0x33);
const TANK_TURRET: Color = rgb(0x00, 0x88, 0xff);
const TANK_CANNON: Color = rgb(0x00, 0x44, 0x99);
const DOOR_FRAME: Color = rgb(0x8b, 0x45, 0x13);
const DOOR_PANEL: Color = rgb(0x65, 0x43, 0x21);
const DOOR_KNOB: Color = rgb(0xff, 0xd7, 0x00);

const SHOT_PLATFORMER: Color = rgb(0xff, 0xff, 0x00);
const SHOT_VEHICLE: Color = rgb(0xff, 0x66, 0x00);
const SHOT_ROAMER: Color = rgb(0x00, 0xff, 0xff);

const CANNON_LENGTH: f32 = 16.0;

fn mode_bg_rgb(mode: Mode) -> (u8, u8, u8) {
    match mode {
        Mode::Platforming(_) => SIDE_BG,
        Mode::Dungeon => DUNGEON_BG,
    }
}

#[cfg(test)]
pub fn mode_background(mode: Mode) -> Color {
    let (r, g, b) = mode_bg_rgb(mode);
    rgb(r, g, b)
}

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let result = a as f32 * (1.0 - t) + b as f32 * t;
    result.clamp(0.0, 255.0) as u8
}

/// `fg` at full alpha, `bg` at zero.
fn fade(fg: (u8, u8, u8), bg: (u8, u8, u8), alpha: f32) -> Color {
    let t = 1.0 - alpha;
    rgb(lerp_u8(fg.0, bg.0, t), lerp_u8(fg.1, bg.1, t), lerp_u8(fg.2, bg.2, t))
}

// ── Canvas ──

/// Pixels per terminal cell.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct CellScale {
    pub px_w: f32,
    pub px_h: f32,
}

impl Default for CellScale {
    fn default() -> Self {
        CellScale { px_w: 8.0, px_h: 16.0 }
    }
}

pub struct Canvas<'a> {
    buf: &'a mut FrameBuffer,
    scale: CellScale,
    top: usize,
    cols: usize,
    rows: usize,
    bg_rgb: (u8, u8, u8),
}

impl<'a> Canvas<'a> {
    pub(super) fn new(
        buf: &'a mut FrameBuffer,
        scale: CellScale,
        top: usize,
        view: Viewport,
        mode: Mode,
    ) -> Self {
        let cols = (view.width / scale.px_w).ceil().max(0.0) as usize;
        let rows = (view.height / scale.px_h).ceil().max(0.0) as usize;
        Canvas { buf, scale, top, cols, rows, bg_rgb: mode_bg_rgb(mode) }
    }

    pub fn background(&self) -> Color {
        let (r, g, b) = self.bg_rgb;
        rgb(r, g, b)
    }

    /// Paint the whole viewport with the mode background.
    pub fn clear(&mut self) {
        let bg = self.background();
        for row in 0..self.rows {
            for col in 0..self.cols {
                self.buf.set(col, self.top + row, Cell::new(' ', Color::White, bg));
            }
        }
    }

    /// Viewport pixel → (col, row) inside the map area.
    pub fn cell_at(&self, px: f32, py: f32) -> Option<(usize, usize)> {
        let col = (px / self.scale.px_w).floor();
        let row = (py / self.scale.px_h).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col as usize, row as usize);
        if col >= self.cols || row >= self.rows {
            return None;
        }
        Some((col, row))
    }

    /// Cell range `[start, end)` covered by a pixel span, clipped to `limit`.
    fn span(lo: f32, len: f32, size: f32, limit: usize) -> (usize, usize) {
        let start = (lo / size).floor();
        let end = ((lo + len) / size).ceil().max(start + 1.0);
        let clip = |v: f32| v.max(0.0).min(limit as f32) as usize;
        (clip(start), clip(end))
    }

    /// Fill every cell touched by `r` (viewport pixels).
    pub fn fill_rect(&mut self, r: Rect, color: Color) {
        if r.w <= 0.0 || r.h <= 0.0 {
            return;
        }
        let (c0, c1) = Self::span(r.x, r.w, self.scale.px_w, self.cols);
        let (r0, r1) = Self::span(r.y, r.h, self.scale.px_h, self.rows);
        for row in r0..r1 {
            for col in c0..c1 {
                self.buf.set(col, self.top + row, Cell::new(' ', Color::White, color));
            }
        }
    }

    /// Put one character at the cell containing (px, py).
    pub fn glyph(&mut self, px: f32, py: f32, ch: char, fg: Color) {
        if let Some((col, row)) = self.cell_at(px, py) {
            let y = self.top + row;
            let bg = self.buf.get(col, y).bg;
            self.buf.set(col, y, Cell::new(ch, fg, bg));
        }
    }

    /// Text anchored at (px, py), one cell per char, clipped to the viewport.
    pub fn text(&mut self, px: f32, py: f32, s: &str, fg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.glyph(px + i as f32 * self.scale.px_w, py, ch, fg);
        }
    }
}

fn on_screen(r: Rect, cam: Camera) -> Rect {
    Rect::new(r.x - cam.x, r.y - cam.y, r.w, r.h)
}

// ── Drawables ──

pub trait Drawable {
    fn draw(&self, canvas: &mut Canvas, cam: Camera);
}

fn tile_color(tile: Tile) -> Color {
    match tile {
        Tile::Ground => GROUND,
        Tile::Wall => WALL,
        Tile::Floor => FLOOR,
        Tile::Air => Color::Reset,
    }
}

/// Paint every visible tile of a level grid.
fn draw_tiles(level: &dyn LevelGeometry, canvas: &mut Canvas, cam: Camera) {
    let (cols, rows) = level.grid_size();
    for row in 0..rows {
        for col in 0..cols {
            let tile = level.tile_at(col, row);
            if !tile.is_visible() { continue; }
            let r = Rect::new(col as f32 * TILE_SIZE, row as f32 * TILE_SIZE, TILE_SIZE, TILE_SIZE);
            canvas.fill_rect(on_screen(r, cam), tile_color(tile));
        }
    }
}

impl Drawable for SideScrollLevel {
    fn draw(&self, canvas: &mut Canvas, cam: Camera) {
        draw_tiles(self, canvas, cam);
    }
}

impl Drawable for OverheadRoom {
    fn draw(&self, canvas: &mut Canvas, cam: Camera) {
        draw_tiles(self, canvas, cam);
    }
}

impl Drawable for DoorTrigger {
    fn draw(&self, canvas: &mut Canvas, cam: Camera) {
        let a = on_screen(self.area, cam);
        canvas.fill_rect(a, DOOR_FRAME);
        canvas.fill_rect(Rect::new(a.x + 2.0, a.y + 2.0, a.w - 4.0, a.h - 4.0), DOOR_PANEL);
        canvas.glyph(a.x + a.w - 6.0, a.y + a.h / 2.0 - 1.0, '•', DOOR_KNOB);
        canvas.text(a.x - 2.0, a.y - 5.0, "DOOR", Color::White);
    }
}

/// Direction marker offsets from the roamer center, by heading index.
const ROAMER_MARKERS: [(f32, f32, char); 4] = [
    (0.0, -6.0, '▴'),
    (6.0, 0.0, '▸'),
    (0.0, 6.0, '▾'),
    (-6.0, 0.0, '◂'),
];

fn cannon_glyph(dx: f32, dy: f32) -> char {
    if dy.abs() < 0.4 * dx.abs() {
        '─'
    } else if dx * dy > 0.0 {
        '╲'
    } else {
        '╱'
    }
}

impl Drawable for Actor {
    fn draw(&self, canvas: &mut Canvas, cam: Camera) {
        let b = on_screen(self.bounds(), cam);
        match self.kind {
            ActorKind::Platformer { .. } => {
                canvas.fill_rect(b, ACTOR_GREEN);
                let (mx, ch) = match self.facing() {
                    Some(Facing::Left) => (b.x, '‹'),
                    _ => (b.x + b.w - 2.0, '›'),
                };
                canvas.glyph(mx, b.y + 2.0, ch, MARKER);
            }
            ActorKind::Vehicle { facing, cannon_angle, .. } => {
                canvas.fill_rect(Rect::new(b.x, b.y + 8.0, b.w, b.h - 8.0), TANK_BODY);
                canvas.fill_rect(Rect::new(b.x - 2.0, b.y + b.h - 4.0, b.w + 4.0, 4.0), TANK_TREAD);
                canvas.fill_rect(Rect::new(b.x + 6.0, b.y, 12.0, 12.0), TANK_TURRET);

                let angle = match facing {
                    Facing::Right => cannon_angle,
                    Facing::Left => cannon_angle + std::f32::consts::PI,
                };
                let (dx, dy) = (angle.cos() * CANNON_LENGTH, angle.sin() * CANNON_LENGTH);
                let (px, py) = (b.x + b.w / 2.0, b.y + 8.0);
                canvas.glyph(px + dx, py + dy, cannon_glyph(dx, dy), TANK_CANNON);
            }
            ActorKind::Roamer { heading } => {
                canvas.fill_rect(b, ACTOR_GREEN);
                let (cx, cy) = (b.x + b.w / 2.0, b.y + b.h / 2.0);
                let (ox, oy, ch) = ROAMER_MARKERS[heading.index() as usize];
                canvas.glyph(cx + ox, cy + oy, ch, MARKER);
            }
        }
    }
}

impl Drawable for Projectile {
    fn draw(&self, canvas: &mut Canvas, cam: Camera) {
        let color = match self.kind {
            ProjectileKind::Platformer => SHOT_PLATFORMER,
            ProjectileKind::Vehicle => SHOT_VEHICLE,
            ProjectileKind::Roamer => SHOT_ROAMER,
        };
        let b = on_screen(self.bounds(), cam);
        let (cx, cy) = b.center();
        canvas.glyph(cx, cy, '•', color);
    }
}

impl Drawable for Particle {
    fn draw(&self, canvas: &mut Canvas, cam: Camera) {
        let color = fade(PARTICLE, canvas.bg_rgb, self.alpha());
        let half = PARTICLE_SIZE / 2.0;
        canvas.glyph(self.x + half - cam.x, self.y + half - cam.y, '·', color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::Heading;
    use crate::sim::mode::Possession;

    const SIDE: Mode = Mode::Platforming(Possession::Player);

    fn buffer() -> FrameBuffer {
        // 64 × 30 map rows below a 2-row header
        FrameBuffer::new(64, 32)
    }

    fn canvas(buf: &mut FrameBuffer, mode: Mode) -> Canvas<'_> {
        Canvas::new(buf, CellScale::default(), 2, Viewport::default(), mode)
    }

    #[test]
    fn default_viewport_is_64_by_30_cells() {
        let mut buf = buffer();
        let c = canvas(&mut buf, SIDE);
        assert_eq!((c.cols, c.rows), (64, 30));
    }

    #[test]
    fn pixel_to_cell_mapping() {
        let mut buf = buffer();
        let c = canvas(&mut buf, SIDE);
        assert_eq!(c.cell_at(0.0, 0.0), Some((0, 0)));
        assert_eq!(c.cell_at(7.9, 15.9), Some((0, 0)));
        assert_eq!(c.cell_at(8.0, 16.0), Some((1, 1)));
        assert_eq!(c.cell_at(511.0, 479.0), Some((63, 29)));
        assert_eq!(c.cell_at(512.0, 0.0), None);
        assert_eq!(c.cell_at(-0.5, 10.0), None);
    }

    #[test]
    fn fill_rect_covers_touched_cells_only() {
        let mut buf = buffer();
        {
            let mut c = canvas(&mut buf, SIDE);
            // 12 × 16 starting mid-cell: x 4..16 → cols 0,1; y 0..16 → row 0
            c.fill_rect(Rect::new(4.0, 0.0, 12.0, 16.0), ACTOR_GREEN);
        }
        assert_eq!(buf.get(0, 2).bg, ACTOR_GREEN);
        assert_eq!(buf.get(1, 2).bg, ACTOR_GREEN);
        assert_eq!(buf.get(2, 2).bg, Cell::BASE_BG);
        assert_eq!(buf.get(0, 3).bg, Cell::BASE_BG);
    }

    #[test]
    fn fill_rect_clips_to_viewport() {
        let mut buf = buffer();
        {
            let mut c = canvas(&mut buf, SIDE);
            c.fill_rect(Rect::new(-100.0, 470.0, 120.0, 100.0), WALL);
        }
        assert_eq!(buf.get(0, 2 + 29).bg, WALL);
        assert_eq!(buf.get(2, 2 + 29).bg, WALL);
        assert_eq!(buf.get(3, 2 + 29).bg, Cell::BASE_BG);
        // row 30 lies below the map area
        assert_eq!(buf.get(0, 2 + 30).bg, Cell::BASE_BG);
    }

    #[test]
    fn glyph_keeps_background() {
        let mut buf = buffer();
        {
            let mut c = canvas(&mut buf, SIDE);
            c.clear();
            c.glyph(20.0, 20.0, '•', SHOT_PLATFORMER);
        }
        let cell = buf.get(2, 3);
        assert_eq!(cell.ch, '•');
        assert_eq!(cell.fg, SHOT_PLATFORMER);
        assert_eq!(cell.bg, mode_background(SIDE));
    }

    #[test]
    fn camera_offset_shifts_drawing() {
        let mut buf = buffer();
        {
            let mut c = canvas(&mut buf, SIDE);
            let p = Projectile::new(300.0, 100.0, 0.0, 0.0, ProjectileKind::Vehicle);
            p.draw(&mut c, Camera { x: 200.0, y: 0.0 });
        }
        // center (102, 102) → col 12, row 6
        assert_eq!(buf.get(12, 2 + 6).ch, '•');
        assert_eq!(buf.get(12, 2 + 6).fg, SHOT_VEHICLE);
    }

    #[test]
    fn roamer_marker_follows_heading() {
        let mut buf = buffer();
        {
            let mut c = canvas(&mut buf, Mode::Dungeon);
            let mut r = Actor::roamer(100.0, 100.0);
            r.move_down();
            assert_eq!(r.heading(), Some(Heading::Down));
            r.draw(&mut c, Camera::default());
        }
        // center (106, 106) + (0, 6) → (106, 112) → col 13, row 7
        assert_eq!(buf.get(13, 2 + 7).ch, '▾');
    }

    #[test]
    fn particle_fades_into_background() {
        let fresh = fade(PARTICLE, SIDE_BG, 1.0);
        let gone = fade(PARTICLE, SIDE_BG, 0.0);
        assert_eq!(fresh, rgb(0xff, 0x66, 0x00));
        assert_eq!(gone, mode_background(SIDE));
    }

    #[test]
    fn cannon_glyph_by_direction() {
        assert_eq!(cannon_glyph(16.0, 0.0), '─');
        assert_eq!(cannon_glyph(-16.0, 1.0), '─');
        assert_eq!(cannon_glyph(8.0, -14.0), '╱');
        assert_eq!(cannon_glyph(8.0, 14.0), '╲');
    }
}

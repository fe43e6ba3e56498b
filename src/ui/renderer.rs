/// Terminal renderer.
///
/// Each frame is composed into `front`, compared cell by cell against
/// `back` (what the terminal already shows), and only the differing cells
/// are queued. One flush per frame, then the buffers swap.
///
/// Screen layout:
///   row 0      HUD: mode and health of the active actor
///   row 1      hint line
///   row 2..    the viewport, one cell per `cell_px_w × cell_px_h` pixels
///
/// Rendering reads the world and never changes it.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::Actor;
use crate::sim::mode::Mode;
use crate::sim::world::WorldState;
use super::draw::{Canvas, CellScale, Drawable};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(super) struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

impl Cell {
    /// Explicit dark background for every cell outside the viewport.
    /// Matches the color used for `Clear` so row gaps blend in.
    pub const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    pub const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Sentinel used to invalidate the back buffer; never equal to a real cell.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };

    pub fn new(ch: char, fg: Color, bg: Color) -> Self {
        Cell { ch, fg, bg }
    }
}

// ── FrameBuffer: a 2D grid of Cells ──

pub(super) struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn invalidate(&mut self) {
        self.cells.fill(Cell::INVALID);
    }

    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    /// Write a string at (x, y). Each char occupies one column.
    pub fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell::new(ch, fg, bg));
        }
    }

    fn fill_row(&mut self, y: usize, bg: Color) {
        for x in 0..self.width {
            self.set(x, y, Cell::new(' ', Color::White, bg));
        }
    }
}

// ── Renderer ──

const HUD_ROW: usize = 0;
const HINT_ROW: usize = 1;
const MAP_ROW: usize = 2;

const HUD_BG: Color = Color::Rgb { r: 20, g: 20, b: 60 };

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    /// Last known terminal size in cells.
    term: (u16, u16),
    scale: CellScale,
    last_mode: Option<Mode>,
    /// Terminal reports key release events.
    enhanced_keys: bool,
}

impl Renderer {
    pub fn new(scale: CellScale) -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term: (0, 0),
            scale,
            last_mode: None,
            enhanced_keys: false,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;

        if terminal::supports_keyboard_enhancement().unwrap_or(false) {
            execute!(
                self.writer,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            self.enhanced_keys = true;
        }

        self.fit_terminal();
        Ok(())
    }

    /// Whether key Release events can be trusted.
    pub fn reports_release(&self) -> bool {
        self.enhanced_keys
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        if self.enhanced_keys {
            execute!(self.writer, PopKeyboardEnhancementFlags)?;
            self.enhanced_keys = false;
        }
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    /// Resize both buffers to the terminal. Returns true when the size
    /// changed, in which case the next flush repaints every cell.
    fn fit_terminal(&mut self) -> bool {
        let size = terminal::size().unwrap_or((80, 24));
        if size == self.term {
            return false;
        }
        self.term = size;
        let (w, h) = (size.0 as usize, size.1 as usize);
        self.front.resize(w, h);
        self.back.resize(w, h);
        self.back.invalidate();
        true
    }

    pub fn render(&mut self, world: &WorldState) -> io::Result<()> {
        if self.fit_terminal() {
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
        }

        // Mode switch changes the whole palette; repaint everything.
        if self.last_mode != Some(world.mode) {
            self.back.invalidate();
            self.last_mode = Some(world.mode);
        }

        self.front.clear();
        compose_frame(&mut self.front, world, self.scale);

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        let mut need_move = true;
        let mut last_x: usize = 0;
        let mut last_y: usize = 0;

        // Explicit base colors; ResetColor would fall back to the terminal default.
        queue!(self.writer,
            SetForegroundColor(Color::White),
            SetBackgroundColor(Cell::BASE_BG),
        )?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }

                if need_move || x != last_x + 1 || y != last_y {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }

                queue!(self.writer, Print(cell.ch))?;
                last_x = x;
                last_y = y;
            }
        }

        self.writer.flush()
    }
}

// ── Compose: build front buffer content ──

fn compose_frame(buf: &mut FrameBuffer, world: &WorldState, scale: CellScale) {
    compose_hud(buf, world);

    let cam = world.camera;
    let mut canvas = Canvas::new(buf, scale, MAP_ROW, world.viewport, world.mode);
    canvas.clear();

    match world.mode {
        Mode::Platforming(_) => {
            world.side.draw(&mut canvas, cam);
            world.door.draw(&mut canvas, cam);
            world.vehicle.draw(&mut canvas, cam);
            world.player.draw(&mut canvas, cam);
        }
        Mode::Dungeon => {
            world.room.draw(&mut canvas, cam);
            world.roamer.draw(&mut canvas, cam);
        }
    }

    for p in world.projectiles.iter() {
        p.draw(&mut canvas, cam);
    }
    for p in world.particles.iter() {
        p.draw(&mut canvas, cam);
    }
}

fn compose_hud(buf: &mut FrameBuffer, world: &WorldState) {
    let actor = world.active_actor();
    let hud = format!(
        " Mode: {:<18} Health: {:<5} {}",
        world.mode.label(),
        actor.health,
        actor_detail(actor),
    );
    buf.fill_row(HUD_ROW, HUD_BG);
    buf.put_str(0, HUD_ROW, &hud, Color::White, HUD_BG);

    buf.put_str(0, HINT_ROW, hint_line(world.mode), Color::DarkGrey, Cell::BASE_BG);
}

/// Per-kind status: cannon aim, airborne flag or heading.
fn actor_detail(actor: &Actor) -> String {
    if let Some(angle) = actor.cannon_angle() {
        // Screen y grows down; upward aim reads positive.
        format!("Aim: {:+.0}°", (0.0 - angle).to_degrees())
    } else if let Some(heading) = actor.heading() {
        format!("Heading: {heading:?}")
    } else if actor.on_ground() {
        String::new()
    } else {
        "Airborne".to_string()
    }
}

fn hint_line(mode: Mode) -> &'static str {
    match mode {
        Mode::Platforming(_) => {
            " Walk to the door on the right to enter dungeon │ Enter/E: tank  Space: shoot  Esc: quit"
        }
        Mode::Dungeon => " Press Enter to exit dungeon │ Space: shoot  Esc: quit",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::world::Viewport;
    use crate::ui::draw;

    fn compose(world: &WorldState) -> FrameBuffer {
        let mut buf = FrameBuffer::new(64, 32);
        compose_frame(&mut buf, world, CellScale::default());
        buf
    }

    fn row_text(buf: &FrameBuffer, y: usize) -> String {
        (0..buf.width).map(|x| buf.get(x, y).ch).collect()
    }

    #[test]
    fn hud_shows_mode_and_health() {
        let w = WorldState::with_seed(Viewport::default(), 1);
        let buf = compose(&w);
        let hud = row_text(&buf, HUD_ROW);
        assert!(hud.contains("Mode: PLAYER"));
        assert!(hud.contains("Health: 100"));
        assert!(row_text(&buf, HINT_ROW).contains("door"));
    }

    #[test]
    fn hud_reports_vehicle_health() {
        let mut w = WorldState::with_seed(Viewport::default(), 1);
        w.mode = Mode::Platforming(crate::sim::mode::Possession::Vehicle);
        let hud = row_text(&compose(&w), HUD_ROW);
        assert!(hud.contains("TANK"));
        assert!(hud.contains("Health: 200"));
        assert!(hud.contains("Aim: +0°"));

        w.vehicle.move_up();
        w.vehicle.move_up();
        assert!(row_text(&compose(&w), HUD_ROW).contains("Aim: +11°"));
    }

    #[test]
    fn hud_detail_follows_active_actor() {
        let mut w = WorldState::with_seed(Viewport::default(), 1);
        assert!(row_text(&compose(&w), HUD_ROW).contains("Airborne"));

        w.player.kind.set_on_ground(true);
        assert!(!row_text(&compose(&w), HUD_ROW).contains("Airborne"));

        w.mode = Mode::Dungeon;
        w.roamer.move_left();
        assert!(row_text(&compose(&w), HUD_ROW).contains("Heading: Left"));
    }

    #[test]
    fn side_ground_painted_from_tile_row_26() {
        let w = WorldState::with_seed(Viewport::default(), 1);
        let buf = compose(&w);
        assert_eq!(buf.get(0, MAP_ROW + 26).bg, draw::GROUND);
        assert_eq!(buf.get(0, MAP_ROW + 29).bg, draw::GROUND);
        assert_eq!(buf.get(0, MAP_ROW + 25).bg, draw::mode_background(w.mode));
    }

    #[test]
    fn dungeon_uses_room_palette() {
        let mut w = WorldState::with_seed(Viewport::default(), 1);
        w.mode = Mode::Dungeon;
        let buf = compose(&w);
        assert_eq!(buf.get(0, MAP_ROW).bg, draw::WALL);
        assert_eq!(buf.get(10, MAP_ROW + 5).bg, draw::FLOOR);
        // outside the 400 × 300 room
        assert_eq!(buf.get(55, MAP_ROW + 5).bg, draw::mode_background(Mode::Dungeon));
        assert!(row_text(&buf, HUD_ROW).contains("OVERHEAD DUNGEON"));
    }

    #[test]
    fn put_str_clips_at_edge() {
        let mut buf = FrameBuffer::new(4, 1);
        buf.put_str(2, 0, "abc", Color::White, Cell::BASE_BG);
        assert_eq!(row_text(&buf, 0), "  ab");
    }
}

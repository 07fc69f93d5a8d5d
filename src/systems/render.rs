//! Text rendering system
//!
//! Rasterizes each engine frame into a character grid:
//! - Edges drawn with Bresenham lines
//! - Vertices marked on top of the edges
//! - A status line, plus coordinate labels when the debug overlay is on

use std::io::Write;
use std::time::Duration;

use ndcube_core::{Engine, EngineError, Frame, ProjectionMix, Vec2, Viewport};

use crate::config::CanvasConfig;

const BLANK: u8 = b' ';
const EDGE: u8 = b'.';
const VERTEX: u8 = b'o';

/// Terminal rows left below the canvas for the status line and cursor
const STATUS_ROWS: u16 = 2;

/// Render error types
#[derive(Debug)]
pub enum RenderError {
    /// The engine failed to produce a frame
    Engine(EngineError),
    /// Writing the frame out failed
    Io(std::io::Error),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Engine(e) => write!(f, "Engine error: {}", e),
            RenderError::Io(e) => write!(f, "Output error: {}", e),
        }
    }
}

impl std::error::Error for RenderError {}

impl From<EngineError> for RenderError {
    fn from(e: EngineError) -> Self {
        RenderError::Engine(e)
    }
}

impl From<std::io::Error> for RenderError {
    fn from(e: std::io::Error) -> Self {
        RenderError::Io(e)
    }
}

/// A fixed-size grid of characters
///
/// Character cells are roughly twice as tall as they are wide, so drawing
/// happens on a grid with twice the rows and each cell samples two of them.
#[derive(Debug, Clone)]
pub struct TextCanvas {
    columns: usize,
    rows: usize,
    cells: Vec<u8>,
}

impl TextCanvas {
    /// Create a blank canvas
    pub fn new(columns: usize, rows: usize) -> Self {
        Self {
            columns,
            rows,
            cells: vec![BLANK; columns * rows],
        }
    }

    /// Width in characters
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Height in characters
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The drawing surface in half-cell units
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.columns as f64, (self.rows * 2) as f64)
    }

    /// Blank every cell
    pub fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    /// Character at a cell
    pub fn get(&self, column: usize, row: usize) -> Option<char> {
        (column < self.columns && row < self.rows)
            .then(|| char::from(self.cells[row * self.columns + column]))
    }

    /// Set the cell under a half-cell point; points off the canvas are ignored
    fn plot(&mut self, x: i64, y: i64, glyph: u8) {
        if x < 0 || y < 0 {
            return;
        }
        let (column, row) = (x as usize, y as usize / 2);
        if column < self.columns && row < self.rows {
            let cell = &mut self.cells[row * self.columns + column];
            if *cell != VERTEX {
                *cell = glyph;
            }
        }
    }

    /// Draw a line between two points in viewport space
    pub fn line(&mut self, from: Vec2, to: Vec2) {
        let (mut x0, mut y0) = (from.x.round() as i64, from.y.round() as i64);
        let (x1, y1) = (to.x.round() as i64, to.y.round() as i64);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0, y0, EDGE);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Mark a vertex at a point in viewport space
    pub fn vertex(&mut self, at: Vec2) {
        self.plot(at.x.round() as i64, at.y.round() as i64, VERTEX);
    }

    /// Draw every edge, then every vertex, of a frame
    pub fn draw_frame(&mut self, frame: &Frame<'_>) {
        let screen = frame.to_screen(&self.viewport());
        for edge in frame.edges {
            self.line(screen[edge.high], screen[edge.low]);
        }
        for &p in &screen {
            self.vertex(p);
        }
    }

    /// The grid as lines of text
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.cells
            .chunks(self.columns.max(1))
            .map(|row| String::from_utf8_lossy(row).trim_end().to_string())
    }
}

/// Human-readable name of a projection blend
pub fn describe_projection(mix: &ProjectionMix) -> String {
    match mix {
        ProjectionMix::Pure(model) => model.to_string(),
        ProjectionMix::Blend { from, to, t } => {
            format!("{} -> {} ({:.0}%)", describe_projection(from), to, t * 100.0)
        }
    }
}

/// Canvas size for a terminal of `terminal` (columns, rows)
///
/// Falls back to the configured size when the terminal size is unknown or
/// too small to hold a canvas.
pub fn fit_canvas(terminal: Option<(u16, u16)>, config: &CanvasConfig) -> (usize, usize) {
    match terminal {
        Some((columns, rows)) if columns > 0 && rows > STATUS_ROWS => {
            (usize::from(columns), usize::from(rows - STATUS_ROWS))
        }
        _ => (config.columns, config.rows),
    }
}

/// Draws engine frames as text
pub struct RenderSystem {
    canvas: TextCanvas,
    config: CanvasConfig,
}

impl RenderSystem {
    /// Create render system from config
    pub fn new(config: CanvasConfig) -> Self {
        Self::with_size((config.columns, config.rows), config)
    }

    /// Create render system filling the current terminal
    pub fn for_terminal(config: CanvasConfig) -> Self {
        let terminal = match crossterm::terminal::size() {
            Ok(size) => Some(size),
            Err(e) => {
                log::debug!("Terminal size unavailable ({}), using configured canvas", e);
                None
            }
        };
        Self::with_size(fit_canvas(terminal, &config), config)
    }

    fn with_size((columns, rows): (usize, usize), config: CanvasConfig) -> Self {
        log::debug!("Canvas {}x{}", columns, rows);
        Self {
            canvas: TextCanvas::new(columns, rows),
            config,
        }
    }

    /// The canvas holding the last drawn frame
    pub fn canvas(&self) -> &TextCanvas {
        &self.canvas
    }

    /// True if frame number `frame` should be printed
    pub fn should_render(&self, frame: u64) -> bool {
        self.config.enabled && frame % u64::from(self.config.every.max(1)) == 0
    }

    /// Render a single frame to `out`
    pub fn render_frame(
        &mut self,
        engine: &Engine,
        now: Duration,
        out: &mut impl Write,
    ) -> Result<(), RenderError> {
        let frame = engine.frame(now)?;

        self.canvas.clear();
        self.canvas.draw_frame(&frame);

        writeln!(
            out,
            "t={:>7.2}s  n={}  {}  scale={:.3}",
            now.as_secs_f64(),
            frame.dimension,
            describe_projection(&frame.projection),
            frame.scale
        )?;
        for line in self.canvas.lines() {
            writeln!(out, "{}", line)?;
        }
        if let Some(labels) = &frame.labels {
            for (i, label) in labels.iter().enumerate() {
                writeln!(out, "v{:<4} {}", i, label)?;
            }
        }
        Ok(())
    }
}

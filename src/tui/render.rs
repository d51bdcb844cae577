//! Terminal rendering of the presentation tree.
//!
//! Composition is pure: [`compose`] lays the tree out into a [`Frame`] of
//! styled cells, and [`draw`] flushes a frame through crossterm. Tests only
//! ever look at composed frames.

#![allow(missing_docs)]

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{
    Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::queue;

use super::theme::{Theme, Tone};
use crate::presentation::panels::{
    ClassPanel, CompilerLog, InstancePanel, InterfacePanel, MemoryPanel, SourcePanel,
};
use crate::presentation::syntax::{SourceLine, TokenKind};
use crate::presentation::{Backdrop, BootOverlay, ExitHint, PresentationTree, Scene, Stage};

const SIDE_WIDTH: u16 = 30;
const INSPECTOR_WIDTH: u16 = 36;
const MIN_SOURCE_WIDTH: u16 = 48;
const BOOT_WIDTH: u16 = 44;
const GAUGE_WIDTH: usize = 20;

// ──────────────────── frame ────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub tone: Tone,
    pub bold: bool,
    pub dim: bool,
}

impl Cell {
    const BLANK: Self = Self {
        ch: ' ',
        tone: Tone::Muted,
        bold: false,
        dim: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rect {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

impl Rect {
    const fn inner(self) -> Self {
        Self {
            x: self.x + 1,
            y: self.y + 1,
            w: self.w.saturating_sub(2),
            h: self.h.saturating_sub(2),
        }
    }

    const fn bottom(self) -> u16 {
        self.y + self.h
    }
}

/// A grid of styled cells, one per terminal position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Frame {
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; usize::from(width) * usize::from(height)],
        }
    }

    #[must_use]
    pub const fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    #[must_use]
    pub fn cell(&self, x: u16, y: u16) -> Option<&Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.cells
            .get(usize::from(y) * usize::from(self.width) + usize::from(x))
    }

    /// Plain text of one row, trailing blanks trimmed.
    #[must_use]
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = usize::from(y) * usize::from(self.width);
        let row: String = self.cells[start..start + usize::from(self.width)]
            .iter()
            .map(|c| c.ch)
            .collect();
        row.trim_end().to_string()
    }

    /// Plain text of the whole frame.
    #[must_use]
    pub fn to_text(&self) -> String {
        (0..self.height)
            .map(|y| self.row_text(y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn put(&mut self, x: u16, y: u16, ch: char, tone: Tone, bold: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = usize::from(y) * usize::from(self.width) + usize::from(x);
        self.cells[idx] = Cell {
            ch,
            tone,
            bold,
            dim: false,
        };
    }

    /// Write `text` starting at `x`, clipped to `limit` (exclusive). Returns
    /// the column after the last written character.
    fn put_str(&mut self, x: u16, y: u16, limit: u16, text: &str, tone: Tone, bold: bool) -> u16 {
        let mut col = x;
        for ch in text.chars() {
            if col >= limit.min(self.width) {
                break;
            }
            self.put(col, y, ch, tone, bold);
            col += 1;
        }
        col
    }

    fn put_line(&mut self, x: u16, y: u16, limit: u16, line: &SourceLine) -> u16 {
        let mut col = x;
        for token in &line.tokens {
            let tone = if token.pulse {
                Tone::Pulse
            } else {
                Tone::Code(token.kind)
            };
            col = self.put_str(col, y, limit, &token.text, tone, token.pulse);
        }
        col
    }

    fn clear_rect(&mut self, rect: Rect) {
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.x + rect.w {
                self.put(x, y, ' ', Tone::Muted, false);
            }
        }
    }

    fn dim_rect(&mut self, rect: Rect) {
        for y in rect.y..rect.bottom().min(self.height) {
            for x in rect.x..(rect.x + rect.w).min(self.width) {
                let idx = usize::from(y) * usize::from(self.width) + usize::from(x);
                self.cells[idx].dim = true;
                self.cells[idx].bold = false;
            }
        }
    }

    fn draw_box(&mut self, rect: Rect, title: &str) {
        if rect.w < 2 || rect.h < 2 {
            return;
        }
        self.clear_rect(rect);
        let right = rect.x + rect.w - 1;
        let bottom = rect.bottom() - 1;
        for x in rect.x + 1..right {
            self.put(x, rect.y, '─', Tone::Border, false);
            self.put(x, bottom, '─', Tone::Border, false);
        }
        for y in rect.y + 1..bottom {
            self.put(rect.x, y, '│', Tone::Border, false);
            self.put(right, y, '│', Tone::Border, false);
        }
        self.put(rect.x, rect.y, '┌', Tone::Border, false);
        self.put(right, rect.y, '┐', Tone::Border, false);
        self.put(rect.x, bottom, '└', Tone::Border, false);
        self.put(right, bottom, '┘', Tone::Border, false);
        if !title.is_empty() {
            let col = self.put_str(rect.x + 2, rect.y, right, " ", Tone::Border, false);
            let col = self.put_str(col, rect.y, right, title, Tone::Title, true);
            self.put_str(col, rect.y, right, " ", Tone::Border, false);
        }
    }
}

// ──────────────────── composition ────────────────────

/// Lay out `tree` on a `width` x `height` grid. `drift` advances the
/// decorative background animation.
#[must_use]
pub fn compose(tree: &PresentationTree, width: u16, height: u16, drift: usize) -> Frame {
    let mut frame = Frame::new(width, height);
    match tree {
        PresentationTree::Placeholder(backdrop) => compose_backdrop(&mut frame, backdrop, drift),
        PresentationTree::Scene(scene) => compose_scene(&mut frame, scene, drift),
    }
    frame
}

fn compose_scene(frame: &mut Frame, scene: &Scene, drift: usize) {
    compose_backdrop(frame, &scene.backdrop, drift);
    if let Some(panel) = &scene.class_panel {
        let area = stage_area(frame.size(), scene.stage, drift);
        compose_class_panel(frame, panel, area);
        if scene.stage == Stage::Dimmed {
            frame.dim_rect(area);
        }
    }
    if let Some(overlay) = &scene.boot_overlay {
        compose_boot_overlay(frame, overlay);
    }
    compose_exit_hint(frame, &scene.exit_hint);
}

fn compose_backdrop(frame: &mut Frame, backdrop: &Backdrop, drift: usize) {
    let (width, height) = frame.size();
    if backdrop.grid_spacing > 0 {
        let step = backdrop.grid_spacing;
        for y in (0..height).step_by(usize::from(step)) {
            for x in (0..width).step_by(usize::from(step) * 2) {
                frame.put(x, y, '·', Tone::Grid, false);
            }
        }
    }
    for particle in &backdrop.particles {
        let y = u16::try_from(usize::from(particle.top_pct) * usize::from(height) / 100)
            .unwrap_or(u16::MAX);
        if y >= height {
            continue;
        }
        let chars: Vec<char> = particle.text.chars().collect();
        if chars.is_empty() {
            continue;
        }
        let len = chars.len();
        let shift = (drift + usize::from(particle.phase)) % len;
        for x in 0..width {
            let col = usize::from(x);
            let idx = if particle.rightward {
                (col + len - shift) % len
            } else {
                (col + shift) % len
            };
            frame.put(x, y, chars[idx], Tone::Particle, false);
        }
    }
}

/// Area of the class panel. Floating bobs by one row; dimmed shrinks inward.
fn stage_area((width, height): (u16, u16), stage: Stage, drift: usize) -> Rect {
    let full = Rect {
        x: 1,
        y: 1,
        w: width.saturating_sub(2),
        h: height.saturating_sub(4),
    };
    match stage {
        Stage::Floating => {
            let bob = u16::from((drift / 16) % 2 == 1);
            Rect {
                y: full.y + bob,
                ..full
            }
        }
        Stage::Dimmed => Rect {
            x: full.x + 2,
            y: full.y + 1,
            w: full.w.saturating_sub(4),
            h: full.h.saturating_sub(2),
        },
    }
}

fn compose_class_panel(frame: &mut Frame, panel: &ClassPanel, area: Rect) {
    let three_columns = area.w >= SIDE_WIDTH + INSPECTOR_WIDTH + MIN_SOURCE_WIDTH;
    let two_columns = area.w >= INSPECTOR_WIDTH + MIN_SOURCE_WIDTH;

    let mut x = area.x;
    let mut source_w = area.w;
    if three_columns {
        let memory_h = 5;
        let iface_h = area.h.saturating_sub(memory_h);
        compose_interface(frame, &panel.interface, Rect { x, y: area.y, w: SIDE_WIDTH, h: iface_h });
        compose_memory(
            frame,
            &panel.memory,
            Rect { x, y: area.y + iface_h, w: SIDE_WIDTH, h: memory_h },
        );
        x += SIDE_WIDTH;
        source_w -= SIDE_WIDTH;
    }
    if two_columns {
        source_w -= INSPECTOR_WIDTH;
        let right_x = x + source_w;
        let log_h = (u16::try_from(panel.log.lines.len()).unwrap_or(0) + 2).min(area.h / 2);
        let inspector_h = area.h.saturating_sub(log_h);
        compose_inspector(
            frame,
            &panel.instance,
            Rect { x: right_x, y: area.y, w: INSPECTOR_WIDTH, h: inspector_h },
        );
        compose_log(
            frame,
            &panel.log,
            Rect { x: right_x, y: area.y + inspector_h, w: INSPECTOR_WIDTH, h: log_h },
        );
    }
    compose_source(frame, &panel.source, Rect { x, y: area.y, w: source_w, h: area.h });
}

fn compose_interface(frame: &mut Frame, panel: &InterfacePanel, rect: Rect) {
    frame.draw_box(rect, panel.title);
    let inner = rect.inner();
    for (line, y) in panel.lines.iter().zip(inner.y..inner.bottom()) {
        frame.put_line(inner.x + 1, y, inner.x + inner.w, line);
    }
}

/// `[████████████░░░░░░░░] 62%`
fn gauge(used_pct: u8, width: usize) -> String {
    let filled = (usize::from(used_pct.min(100)) * width + 50) / 100;
    format!(
        "[{}{}] {used_pct}%",
        "█".repeat(filled),
        "░".repeat(width - filled)
    )
}

fn compose_memory(frame: &mut Frame, panel: &MemoryPanel, rect: Rect) {
    frame.draw_box(rect, panel.title);
    let inner = rect.inner();
    let limit = inner.x + inner.w;
    let width = GAUGE_WIDTH.min(usize::from(inner.w.saturating_sub(8)));
    frame.put_str(inner.x + 1, inner.y, limit, &gauge(panel.used_pct, width), Tone::Gauge, false);
    frame.put_str(inner.x + 1, inner.y + 1, limit, panel.heap_range, Tone::Muted, false);
}

fn compose_source(frame: &mut Frame, panel: &SourcePanel, rect: Rect) {
    frame.draw_box(rect, panel.file_name);
    let inner = rect.inner();
    if inner.h < 2 {
        return;
    }
    let limit = inner.x + inner.w;
    let status_y = inner.bottom() - 1;
    for (n, y) in (1..=panel.gutter).zip(inner.y..status_y) {
        frame.put_str(inner.x, y, limit, &format!("{n:>3} "), Tone::Muted, false);
        if let Some(line) = panel.lines.get(n - 1) {
            frame.put_line(inner.x + 4, y, limit, line);
        }
    }
    let status = format!(
        "{}  {}  {}  {}",
        panel.status.runtime, panel.status.thread, panel.status.jvm, panel.status.encoding
    );
    frame.put_str(inner.x + 1, status_y, limit, &status, Tone::Muted, false);
}

fn compose_inspector(frame: &mut Frame, panel: &InstancePanel, rect: Rect) {
    frame.draw_box(rect, "Live Instance Data");
    let inner = rect.inner();
    let limit = inner.x + inner.w;

    // (indent, runs of (text, tone, bold))
    let mut rows: Vec<(u16, Vec<(&str, Tone, bool)>)> = vec![(
        1,
        vec![
            ("SystemClock ", Tone::Code(TokenKind::Type), false),
            (panel.address.as_str(), Tone::Muted, false),
        ],
    )];
    for field in &panel.fields {
        let tone = if field.pulse {
            Tone::Pulse
        } else {
            Tone::Field(field.tone)
        };
        rows.push((
            2,
            vec![
                (field.name, Tone::Code(TokenKind::Variable), false),
                (": ", Tone::Code(TokenKind::Plain), false),
                (field.value.as_str(), tone, field.pulse),
            ],
        ));
    }
    rows.push((0, Vec::new()));
    rows.push((1, vec![("toString():", Tone::Code(TokenKind::Method), false)]));
    rows.push((2, vec![(panel.to_string.as_str(), Tone::Code(TokenKind::Str), true)]));

    for ((indent, runs), y) in rows.into_iter().zip(inner.y..inner.bottom()) {
        let mut col = inner.x + indent;
        for (text, tone, bold) in runs {
            col = frame.put_str(col, y, limit, text, tone, bold);
        }
    }
}

fn compose_log(frame: &mut Frame, log: &CompilerLog, rect: Rect) {
    frame.draw_box(rect, "Compiler Output");
    let inner = rect.inner();
    let limit = inner.x + inner.w;
    let mut y = inner.y;
    for line in &log.lines {
        if y >= inner.bottom() {
            return;
        }
        frame.put_str(inner.x + 1, y, limit, &line.text, Tone::Log(line.level), false);
        y += 1;
    }
    if y < inner.bottom() {
        frame.put_str(inner.x + 1, y, limit, log.cursor, Tone::Title, true);
    }
}

fn compose_boot_overlay(frame: &mut Frame, overlay: &BootOverlay) {
    let (width, height) = frame.size();
    let w = BOOT_WIDTH.min(width);
    let h = 6.min(height);
    let rect = Rect {
        x: (width - w) / 2,
        y: (height - h) / 2,
        w,
        h,
    };
    frame.draw_box(rect, overlay.title);
    let inner = rect.inner();
    let limit = inner.x + inner.w;
    let bar_width = usize::from(inner.w.saturating_sub(8)).min(30);
    let rows = [
        (overlay.build.to_string(), Tone::Muted, false),
        (gauge(overlay.progress_pct, bar_width), Tone::Gauge, true),
        (overlay.caption.to_string(), Tone::Code(TokenKind::Comment), false),
    ];
    for ((text, tone, bold), y) in rows.iter().zip(inner.y..inner.bottom()) {
        frame.put_str(inner.x + 1, y, limit, text, *tone, *bold);
    }
}

/// Keys that actually leave the terminal display. Mouse input only counts
/// as activity here.
const QUIT_KEYS: &str = "Q / ESC / CTRL-C TO QUIT";

fn compose_exit_hint(frame: &mut Frame, hint: &ExitHint) {
    let (width, height) = frame.size();
    if !hint.visible || height < 2 {
        return;
    }
    let full = format!("{}  |  {QUIT_KEYS}", hint.text);
    let text = if full.chars().count() <= usize::from(width) {
        full.as_str()
    } else {
        QUIT_KEYS
    };
    let len = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
    let x = width.saturating_sub(len) / 2;
    frame.put_str(x, height - 2, width, text, Tone::Hint, true);
}

// ──────────────────── output ────────────────────

/// Flush a composed frame to the terminal, coalescing runs of equal style.
pub fn draw<W: Write>(out: &mut W, frame: &Frame, theme: &Theme) -> io::Result<()> {
    let (width, height) = frame.size();
    if let Some(bg) = theme.background() {
        queue!(out, SetBackgroundColor(bg))?;
    }
    for y in 0..height {
        queue!(out, MoveTo(0, y))?;
        let mut current: Option<(Tone, bool, bool)> = None;
        let mut run = String::new();
        for x in 0..width {
            let Some(cell) = frame.cell(x, y) else {
                break;
            };
            let style = (cell.tone, cell.bold, cell.dim);
            if current != Some(style) {
                if let Some(prev) = current {
                    flush_run(out, &mut run, prev, theme)?;
                }
                current = Some(style);
            }
            run.push(cell.ch);
        }
        if let Some(prev) = current {
            flush_run(out, &mut run, prev, theme)?;
        }
    }
    queue!(out, SetAttribute(Attribute::Reset))?;
    out.flush()
}

fn flush_run<W: Write>(
    out: &mut W,
    run: &mut String,
    (tone, bold, dim): (Tone, bool, bool),
    theme: &Theme,
) -> io::Result<()> {
    queue!(out, SetAttribute(Attribute::Reset))?;
    if let Some(bg) = theme.background() {
        queue!(out, SetBackgroundColor(bg))?;
    }
    if let Some(fg) = theme.foreground(tone) {
        queue!(out, SetForegroundColor(fg))?;
    }
    if bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    if dim {
        queue!(out, SetAttribute(Attribute::Dim))?;
    }
    queue!(out, Print(run.as_str()))?;
    run.clear();
    Ok(())
}

// ──────────────────── tests ────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{ClockState, EnglishWeekdays, FixedInstantSource, TimeSampler};
    use crate::display::pulse::PulseFlags;
    use crate::presentation::{self, UiFlags};
    use crate::tui::theme::AccessibilityProfile;

    fn sample() -> ClockState {
        TimeSampler::new(
            Box::new(FixedInstantSource::parse("2024-03-05T09:02:07+00:00", "UTC").unwrap()),
            Box::new(EnglishWeekdays),
        )
        .sample()
    }

    fn booted(idle: bool) -> UiFlags {
        UiFlags {
            idle,
            booting: false,
            show_exit_hint: !idle,
        }
    }

    #[test]
    fn placeholder_is_blank() {
        let tree = presentation::build(None, &UiFlags::default(), PulseFlags::default());
        let frame = compose(&tree, 80, 24, 0);
        assert!(frame.to_text().trim().is_empty());
    }

    #[test]
    fn boot_overlay_is_centered_and_hides_source() {
        let state = sample();
        let tree = presentation::build(Some(&state), &UiFlags::default(), PulseFlags::default());
        let text = compose(&tree, 120, 40, 0).to_text();
        assert!(text.contains("BOOTING CLOCK_V3"));
        assert!(text.contains("Allocating Object Space..."));
        assert!(text.contains("100%"));
        assert!(!text.contains("SystemClock.java"));
    }

    #[test]
    fn wide_terminal_shows_all_panels() {
        let state = sample();
        let tree = presentation::build(Some(&state), &booted(true), PulseFlags::default());
        let text = compose(&tree, 140, 44, 0).to_text();
        assert!(text.contains("Interface Definition"));
        assert!(text.contains("SystemClock.java"));
        assert!(text.contains("Live Instance Data"));
        assert!(text.contains("\"Tuesday, 2024-03-05 09:02:07\""));
        assert!(text.contains("[LOG] Tick event @"));
        assert!(text.contains("62%"));
    }

    #[test]
    fn narrow_terminal_keeps_source_only() {
        let state = sample();
        let tree = presentation::build(Some(&state), &booted(true), PulseFlags::default());
        let text = compose(&tree, 60, 40, 0).to_text();
        assert!(text.contains("SystemClock.java"));
        assert!(!text.contains("Live Instance Data"));
        assert!(!text.contains("Interface Definition"));
    }

    #[test]
    fn active_stage_dims_panel_and_shows_hint() {
        let state = sample();
        let tree = presentation::build(Some(&state), &booted(false), PulseFlags::default());
        let frame = compose(&tree, 140, 44, 0);
        let hint_row = frame.row_text(42);
        assert!(hint_row.contains("EXIT VIA MOUSE OR KEYBOARD"));
        assert!(hint_row.contains("Q / ESC / CTRL-C TO QUIT"));
        assert!(frame.cell(10, 10).is_some_and(|c| c.dim));

        let idle = presentation::build(Some(&state), &booted(true), PulseFlags::default());
        let frame = compose(&idle, 140, 44, 0);
        assert!(!frame.to_text().contains("EXIT VIA MOUSE OR KEYBOARD"));
        assert!(!frame.to_text().contains("TO QUIT"));
        assert!(frame.cell(10, 10).is_some_and(|c| !c.dim));
    }

    #[test]
    fn narrow_terminal_keeps_only_the_quit_keys() {
        let state = sample();
        let tree = presentation::build(Some(&state), &booted(false), PulseFlags::default());
        let frame = compose(&tree, 40, 20, 0);
        let hint_row = frame.row_text(18);
        assert!(hint_row.contains("Q / ESC / CTRL-C TO QUIT"));
        assert!(!hint_row.contains("EXIT VIA"));
    }

    #[test]
    fn pulsing_values_are_bold() {
        let state = sample();
        let pulse = PulseFlags {
            second: true,
            ..PulseFlags::default()
        };
        let tree = presentation::build(Some(&state), &booted(true), pulse);
        let frame = compose(&tree, 140, 44, 0);
        let pulsing = (0..44)
            .flat_map(|y| (0..140).map(move |x| (x, y)))
            .filter_map(|(x, y)| frame.cell(x, y))
            .any(|c| c.tone == Tone::Pulse && c.bold);
        assert!(pulsing);
    }

    #[test]
    fn particles_drift_between_frames() {
        let state = sample();
        let tree = presentation::build(Some(&state), &booted(true), PulseFlags::default());
        let a = compose(&tree, 40, 10, 0);
        let b = compose(&tree, 40, 10, 3);
        assert_ne!(a.row_text(0), b.row_text(0));
    }

    #[test]
    fn tiny_terminal_does_not_panic() {
        let state = sample();
        for flags in [UiFlags::default(), booted(true), booted(false)] {
            let tree = presentation::build(Some(&state), &flags, PulseFlags::default());
            for (w, h) in [(0, 0), (1, 1), (5, 3), (20, 6)] {
                let frame = compose(&tree, w, h, 7);
                assert_eq!(frame.size(), (w, h));
            }
        }
    }

    #[test]
    fn gauge_rounds_to_width() {
        assert_eq!(gauge(62, 10), "[██████░░░░] 62%");
        assert_eq!(gauge(100, 4), "[████] 100%");
        assert_eq!(gauge(0, 4), "[░░░░] 0%");
    }

    #[test]
    fn draw_without_color_emits_no_color_codes() {
        let state = sample();
        let tree = presentation::build(Some(&state), &booted(true), PulseFlags::default());
        let frame = compose(&tree, 80, 24, 0);
        let theme = Theme::new(AccessibilityProfile::from_flags(true, false));
        let mut out = Vec::new();
        draw(&mut out, &frame, &theme).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("SystemClock.java"));
        assert!(!text.contains("38;2;"));
    }
}

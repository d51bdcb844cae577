//! Theme tokens and accessibility profile for terminal rendering.

#![allow(missing_docs)]

use std::env;

use crossterm::style::Color;

use crate::core::config::ThemeConfig;
use crate::presentation::BACKGROUND_RGB;
use crate::presentation::panels::{FieldTone, LogLevel};
use crate::presentation::syntax::TokenKind;

/// Contrast profile used by palette selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContrastMode {
    Standard,
    High,
}

/// Color output mode for compatibility with `NO_COLOR` and terminal policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Enabled,
    Disabled,
}

/// Accessibility knobs consumed by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessibilityProfile {
    pub contrast: ContrastMode,
    pub color: ColorMode,
}

impl Default for AccessibilityProfile {
    fn default() -> Self {
        Self {
            contrast: ContrastMode::Standard,
            color: ColorMode::Enabled,
        }
    }
}

impl AccessibilityProfile {
    #[must_use]
    pub const fn from_flags(no_color: bool, high_contrast: bool) -> Self {
        Self {
            contrast: if high_contrast {
                ContrastMode::High
            } else {
                ContrastMode::Standard
            },
            color: if no_color {
                ColorMode::Disabled
            } else {
                ColorMode::Enabled
            },
        }
    }

    /// Profile from the `[theme]` section; `NO_COLOR` in the environment
    /// always wins.
    #[must_use]
    pub fn from_config(theme: &ThemeConfig) -> Self {
        let no_color = theme.no_color || env::var_os("NO_COLOR").is_some();
        Self::from_flags(no_color, theme.high_contrast)
    }

    #[must_use]
    pub const fn no_color(self) -> bool {
        matches!(self.color, ColorMode::Disabled)
    }
}

/// Semantic paint category for one rendered cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Code(TokenKind),
    Field(FieldTone),
    Log(LogLevel),
    Border,
    Title,
    Muted,
    Gauge,
    Pulse,
    Hint,
    Grid,
    Particle,
}

/// Concrete colors for every tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemePalette {
    pub background: Color,
    pub keyword: Color,
    pub type_name: Color,
    pub variable: Color,
    pub value: Color,
    pub comment: Color,
    pub string: Color,
    pub method: Color,
    pub plain: Color,
    pub border: Color,
    pub title: Color,
    pub muted: Color,
    pub ok: Color,
    pub pulse: Color,
    pub hint: Color,
    pub faint: Color,
}

impl ThemePalette {
    #[must_use]
    pub const fn standard() -> Self {
        let (r, g, b) = BACKGROUND_RGB;
        Self {
            background: Color::Rgb { r, g, b },
            keyword: Color::Rgb { r: 0xff, g: 0x7b, b: 0x72 },
            type_name: Color::Rgb { r: 0xd2, g: 0xa8, b: 0xff },
            variable: Color::Rgb { r: 0x79, g: 0xc0, b: 0xff },
            value: Color::Rgb { r: 0xff, g: 0xa6, b: 0x57 },
            comment: Color::Rgb { r: 0x8b, g: 0x94, b: 0x9e },
            string: Color::Rgb { r: 0xa5, g: 0xd6, b: 0xff },
            method: Color::Rgb { r: 0xd2, g: 0xa8, b: 0xff },
            plain: Color::Rgb { r: 0xc9, g: 0xd1, b: 0xd9 },
            border: Color::Rgb { r: 0x30, g: 0x36, b: 0x3d },
            title: Color::Rgb { r: 0x58, g: 0xa6, b: 0xff },
            muted: Color::Rgb { r: 0x48, g: 0x4f, b: 0x58 },
            ok: Color::Rgb { r: 0x3f, g: 0xb9, b: 0x50 },
            pulse: Color::Rgb { r: 0xff, g: 0xff, b: 0xff },
            hint: Color::Rgb { r: 0x58, g: 0xa6, b: 0xff },
            faint: Color::Rgb { r: 0x0d, g: 0x11, b: 0x17 },
        }
    }

    #[must_use]
    pub const fn high_contrast() -> Self {
        Self {
            background: Color::Black,
            keyword: Color::Red,
            type_name: Color::Magenta,
            variable: Color::Cyan,
            value: Color::Yellow,
            comment: Color::Grey,
            string: Color::Green,
            method: Color::Magenta,
            plain: Color::White,
            border: Color::White,
            title: Color::Cyan,
            muted: Color::Grey,
            ok: Color::Green,
            pulse: Color::Yellow,
            hint: Color::White,
            faint: Color::DarkGrey,
        }
    }

    #[must_use]
    pub const fn from_contrast(mode: ContrastMode) -> Self {
        match mode {
            ContrastMode::Standard => Self::standard(),
            ContrastMode::High => Self::high_contrast(),
        }
    }

    #[must_use]
    pub const fn color(&self, tone: Tone) -> Color {
        match tone {
            Tone::Code(kind) => match kind {
                TokenKind::Keyword | TokenKind::Operator => self.keyword,
                TokenKind::Type => self.type_name,
                TokenKind::Variable => self.variable,
                TokenKind::Value => self.value,
                TokenKind::Comment => self.comment,
                TokenKind::Str => self.string,
                TokenKind::Method => self.method,
                TokenKind::Brace | TokenKind::Plain => self.plain,
            },
            Tone::Field(FieldTone::Number) => self.value,
            Tone::Field(FieldTone::Str) => self.string,
            Tone::Field(FieldTone::Boolean) => self.keyword,
            Tone::Log(LogLevel::Info) => self.title,
            Tone::Log(LogLevel::Ok) => self.ok,
            Tone::Log(LogLevel::Jvm) => self.type_name,
            Tone::Log(LogLevel::Log) => self.comment,
            Tone::Border => self.border,
            Tone::Title | Tone::Gauge => self.title,
            Tone::Muted => self.muted,
            Tone::Pulse => self.pulse,
            Tone::Hint => self.hint,
            Tone::Grid | Tone::Particle => self.faint,
        }
    }
}

/// Full render theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub accessibility: AccessibilityProfile,
    pub palette: ThemePalette,
}

impl Theme {
    #[must_use]
    pub const fn new(accessibility: AccessibilityProfile) -> Self {
        Self {
            palette: ThemePalette::from_contrast(accessibility.contrast),
            accessibility,
        }
    }

    /// Foreground for a tone, or `None` when color is disabled.
    #[must_use]
    pub const fn foreground(&self, tone: Tone) -> Option<Color> {
        if self.accessibility.no_color() {
            None
        } else {
            Some(self.palette.color(tone))
        }
    }

    #[must_use]
    pub const fn background(&self) -> Option<Color> {
        if self.accessibility.no_color() {
            None
        } else {
            Some(self.palette.background)
        }
    }
}

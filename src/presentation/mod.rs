//! Pure presentation tree: `(Option<&ClockState>, &UiFlags, PulseFlags)` in,
//! nested panels out. No timers, no I/O; the terminal renderer walks the
//! result.

pub mod panels;
pub mod syntax;

use crate::clock::ClockState;
use crate::display::pulse::PulseFlags;

pub use panels::ClassPanel;

/// Page background, `#010409`.
pub const BACKGROUND_RGB: (u8, u8, u8) = (0x01, 0x04, 0x09);

/// Number of drifting code rows behind the stage.
pub const PARTICLE_ROWS: usize = 8;

/// Cosmetic flags that evolve independently of the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiFlags {
    pub idle: bool,
    pub booting: bool,
    pub show_exit_hint: bool,
}

impl Default for UiFlags {
    fn default() -> Self {
        Self {
            idle: true,
            booting: true,
            show_exit_hint: false,
        }
    }
}

/// Decorative background: a faint grid and rows of drifting code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Backdrop {
    pub rgb: (u8, u8, u8),
    /// Grid spacing in cells; zero means no grid.
    pub grid_spacing: u16,
    pub particles: Vec<Particle>,
}

/// One drifting row of code text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Particle {
    /// Vertical position as a percentage of the screen height.
    pub top_pct: u8,
    /// Drift direction; rows alternate.
    pub rightward: bool,
    /// Phase offset so rows do not move in lockstep.
    pub phase: u16,
    pub text: String,
}

impl Backdrop {
    /// Background color only.
    #[must_use]
    pub const fn bare() -> Self {
        Self {
            rgb: BACKGROUND_RGB,
            grid_spacing: 0,
            particles: Vec::new(),
        }
    }

    #[must_use]
    pub fn decorated() -> Self {
        let particles = (0..PARTICLE_ROWS)
            .map(|i| Particle {
                top_pct: u8::try_from(i * 15).unwrap_or(u8::MAX),
                rightward: i % 2 == 0,
                phase: u16::try_from(i * 15).unwrap_or(0),
                text: format!(
                    "public class Logic {{ private final int id = {i}; @Override public void run() {{ \
                     System.out.println(\"Executing thread: \" + id); }} }}    \
                     interface Temporal {{ long getTimestamp(); }}"
                ),
            })
            .collect();
        Self {
            rgb: BACKGROUND_RGB,
            grid_spacing: 8,
            particles,
        }
    }
}

/// How the main stage is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Nobody around: the panel floats like a screensaver.
    Floating,
    /// Someone is active: the panel shrinks and dims behind the exit hint.
    Dimmed,
}

/// Full-screen loader shown while booting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootOverlay {
    pub title: &'static str,
    pub build: &'static str,
    pub progress_pct: u8,
    pub caption: &'static str,
}

impl BootOverlay {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            title: "BOOTING CLOCK_V3",
            build: "STABLE_BUILD",
            progress_pct: 100,
            caption: "Allocating Object Space...",
        }
    }
}

impl Default for BootOverlay {
    fn default() -> Self {
        Self::new()
    }
}

/// Bottom prompt revealed while the user is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitHint {
    pub visible: bool,
    pub text: &'static str,
}

/// Everything drawn once a clock state exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    pub backdrop: Backdrop,
    pub stage: Stage,
    /// Hidden while booting.
    pub class_panel: Option<ClassPanel>,
    /// Shown only while booting.
    pub boot_overlay: Option<BootOverlay>,
    pub exit_hint: ExitHint,
    /// Display string of the state this scene was built from.
    pub display_string: String,
}

/// Root of the visual tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresentationTree {
    /// Before the first sample: background only, never placeholder numbers.
    Placeholder(Backdrop),
    Scene(Box<Scene>),
}

impl PresentationTree {
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder(_))
    }

    #[must_use]
    pub fn scene(&self) -> Option<&Scene> {
        match self {
            Self::Placeholder(_) => None,
            Self::Scene(scene) => Some(scene),
        }
    }
}

/// Build the tree for the current state and flags.
#[must_use]
pub fn build(state: Option<&ClockState>, flags: &UiFlags, pulse: PulseFlags) -> PresentationTree {
    let Some(state) = state else {
        return PresentationTree::Placeholder(Backdrop::bare());
    };

    PresentationTree::Scene(Box::new(Scene {
        backdrop: Backdrop::decorated(),
        stage: if flags.idle {
            Stage::Floating
        } else {
            Stage::Dimmed
        },
        class_panel: (!flags.booting).then(|| ClassPanel::build(state, pulse)),
        boot_overlay: flags.booting.then(BootOverlay::new),
        exit_hint: ExitHint {
            visible: flags.show_exit_hint,
            text: "EXIT VIA MOUSE OR KEYBOARD",
        },
        display_string: state.display_string(),
    }))
}

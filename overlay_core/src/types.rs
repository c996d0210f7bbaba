// Strong typing over strings. Newtypes for timestamps, screen points, and colours.
// Everything that crosses the host boundary is serde-friendly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OverlayError;

/// Timestamp in microseconds. Newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn from_micros(us: u64) -> Self {
        Timestamp(us)
    }

    pub fn from_millis(ms: u64) -> Self {
        Timestamp(ms.saturating_mul(1000))
    }

    pub fn as_micros(&self) -> u64 {
        self.0
    }

    pub fn as_millis(&self) -> f64 {
        self.0 as f64 / 1000.0
    }

    /// Microseconds elapsed since `earlier`. Zero if the clock went backwards.
    pub fn micros_since(&self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// Point in overlay surface coordinates (pixels, origin top-left).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn new(x: f32, y: f32) -> Self {
        ScreenPoint { x, y }
    }

    pub fn distance_to(&self, other: ScreenPoint) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Straight (non-premultiplied) RGBA colour.
///
/// Deserialises from `[r, g, b, a]` or from the `"r, g, b, a"` string form
/// used by presenter config files. Always serialises as an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(try_from = "RgbaRepr", into = "[u8; 4]")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }

    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub fn with_alpha(self, a: u8) -> Self {
        Rgba { a, ..self }
    }

    /// Scale this colour's alpha by `factor` in [0, 1].
    pub fn fade(self, factor: f32) -> Self {
        let a = (self.a as f32 * factor.clamp(0.0, 1.0)).round() as u8;
        self.with_alpha(a)
    }
}

impl From<Rgba> for [u8; 4] {
    fn from(c: Rgba) -> Self {
        [c.r, c.g, c.b, c.a]
    }
}

impl FromStr for Rgba {
    type Err = OverlayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let channels = s
            .split(',')
            .map(|part| part.trim().parse::<u8>())
            .collect::<Result<Vec<u8>, _>>()
            .map_err(|e| OverlayError::InvalidConfig(format!("colour '{}': {}", s, e)))?;

        match channels.as_slice() {
            [r, g, b, a] => Ok(Rgba::new(*r, *g, *b, *a)),
            _ => Err(OverlayError::InvalidConfig(format!(
                "colour '{}' needs exactly 4 channels",
                s
            ))),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RgbaRepr {
    Channels([u8; 4]),
    Text(String),
}

impl TryFrom<RgbaRepr> for Rgba {
    type Error = OverlayError;

    fn try_from(repr: RgbaRepr) -> Result<Self, Self::Error> {
        match repr {
            RgbaRepr::Channels([r, g, b, a]) => Ok(Rgba::new(r, g, b, a)),
            RgbaRepr::Text(text) => text.parse(),
        }
    }
}

/// Behaviour selected by the erase button. Closed set, matched exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PresenterMode {
    /// Spotlight visible while the button is held.
    SpotlightHold,
    /// Laser trail visible while the button is held.
    Laser,
    /// Each press flips the spotlight on or off.
    SpotlightToggle,
}

impl PresenterMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PresenterMode::SpotlightHold => "SPOTLIGHT_HOLD",
            PresenterMode::Laser => "LASER",
            PresenterMode::SpotlightToggle => "SPOTLIGHT_TOGGLE",
        }
    }

    pub fn is_spotlight(&self) -> bool {
        matches!(
            self,
            PresenterMode::SpotlightHold | PresenterMode::SpotlightToggle
        )
    }
}

impl fmt::Display for PresenterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PresenterMode {
    type Err = OverlayError;

    /// Case-insensitive, whitespace-tolerant: `" laser "` parses as `Laser`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SPOTLIGHT_HOLD" => Ok(PresenterMode::SpotlightHold),
            "LASER" => Ok(PresenterMode::Laser),
            "SPOTLIGHT_TOGGLE" => Ok(PresenterMode::SpotlightToggle),
            _ => Err(OverlayError::UnknownMode(s.trim().to_string())),
        }
    }
}

/// Abstract presenter button action decoded from raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SemanticEvent {
    SpotlightPress,
    SpotlightRelease,
    Erase,
    AnnotatePress,
    AnnotateRelease,
    SpotlightDoubleClick,
    /// Ctrl+Q: host should shut the overlay down.
    Quit,
}

/// Keyboard key as reported by the OS hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    /// Printable key, as the character it types.
    Char(char),
    /// Anything else (function keys, arrows, ...) by platform name.
    Named(String),
}

impl Key {
    /// Build a key from a host key code: one character is `Char`, else `Named`.
    pub fn from_code(code: &str) -> Self {
        let mut chars = code.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Key::Char(c),
            _ => Key::Named(code.to_string()),
        }
    }

    /// True if this is the character `c`, ignoring ASCII case.
    pub fn is_char(&self, c: char) -> bool {
        matches!(self, Key::Char(k) if k.eq_ignore_ascii_case(&c))
    }
}

/// Type of raw input event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RawInputKind {
    KeyDown { key: Key, ctrl: bool },
    KeyUp { key: Key, ctrl: bool },
    MouseClick { button: u8 },
}

/// Single raw event delivered by the OS input hook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
    pub timestamp: Timestamp,
    pub kind: RawInputKind,
}

impl RawInput {
    pub fn key_down(timestamp: Timestamp, key: Key, ctrl: bool) -> Self {
        RawInput {
            timestamp,
            kind: RawInputKind::KeyDown { key, ctrl },
        }
    }

    pub fn key_up(timestamp: Timestamp, key: Key, ctrl: bool) -> Self {
        RawInput {
            timestamp,
            kind: RawInputKind::KeyUp { key, ctrl },
        }
    }

    /// Ctrl+`c` pressed at `timestamp`.
    pub fn ctrl_char(timestamp: Timestamp, c: char) -> Self {
        RawInput::key_down(timestamp, Key::Char(c), true)
    }
}

/// Read-only view of engine state handed to the compositor once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub active_mode: PresenterMode,
    pub active_mode_index: usize,
    pub indicator_on: bool,
}

/// Drawing instruction for the overlay surface, in paint order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum DrawCommand {
    /// Fill the whole surface.
    Fill { color: Rgba },
    /// Punch a fully transparent disc.
    ClearCircle { center: ScreenPoint, radius: f32 },
    /// Feathered band between two radii, strongest midway.
    Ring {
        center: ScreenPoint,
        inner_radius: f32,
        outer_radius: f32,
        color: Rgba,
    },
    /// Solid disc, blended source-over.
    Dot {
        center: ScreenPoint,
        radius: f32,
        color: Rgba,
    },
}

/// Everything the host needs to present one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub timestamp: Timestamp,
    pub snapshot: EngineSnapshot,
    pub pointer: ScreenPoint,
    pub commands: Vec<DrawCommand>,
    /// Set when an erase press switched mode since the previous tick.
    pub mode_changed: Option<PresenterMode>,
}

impl Frame {
    /// A frame with no commands leaves the surface fully transparent.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

// Overlay configuration: General / Spotlight / Laser sections.
// Loaded once by the host, validated up front, immutable afterwards.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::OverlayError;
use crate::types::{PresenterMode, Rgba};

/// Full overlay configuration passed in by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct OverlayConfig {
    #[serde(default)]
    pub general: GeneralSettings,
    #[serde(default)]
    pub spotlight: SpotlightSettings,
    #[serde(default)]
    pub laser: LaserSettings,
}

/// Mode cycle and button timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Ordered modes cycled by the erase button. Accepts a list or a
    /// comma-separated string.
    #[serde(default = "default_modes", deserialize_with = "deserialize_modes")]
    pub modes: Vec<PresenterMode>,
    /// Two spotlight presses closer than this become a double click.
    #[serde(default = "default_double_click_ms")]
    pub double_click_ms: u64,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        GeneralSettings {
            modes: default_modes(),
            double_click_ms: default_double_click_ms(),
        }
    }
}

fn default_modes() -> Vec<PresenterMode> {
    vec![PresenterMode::SpotlightHold, PresenterMode::Laser]
}

fn default_double_click_ms() -> u64 {
    350
}

/// Spotlight mask appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotlightSettings {
    /// Cutout radius in pixels.
    #[serde(default = "default_spot_radius")]
    pub spot_radius: f32,
    /// Alpha of the darkened background.
    #[serde(default = "default_background_alpha")]
    pub background_alpha: u8,
    /// Ring thickness as a fraction of `spot_radius`.
    #[serde(default = "default_ring_thickness")]
    pub ring_thickness: f32,
    #[serde(default = "default_ring_color", alias = "ring_color")]
    pub ring_color_rgba: Rgba,
}

impl Default for SpotlightSettings {
    fn default() -> Self {
        SpotlightSettings {
            spot_radius: default_spot_radius(),
            background_alpha: default_background_alpha(),
            ring_thickness: default_ring_thickness(),
            ring_color_rgba: default_ring_color(),
        }
    }
}

fn default_spot_radius() -> f32 {
    150.0
}

fn default_background_alpha() -> u8 {
    220
}

fn default_ring_thickness() -> f32 {
    0.05
}

fn default_ring_color() -> Rgba {
    Rgba::new(255, 105, 180, 255) // hot pink
}

/// Laser trail appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaserSettings {
    #[serde(default = "default_max_trail_length")]
    pub max_trail_length: usize,
    /// Dot radius in pixels.
    #[serde(default = "default_base_radius")]
    pub base_radius: f32,
    /// Head dot is `base_radius * head_multiplier`.
    #[serde(default = "default_head_multiplier")]
    pub head_multiplier: f32,
    #[serde(default = "default_laser_color", alias = "color")]
    pub color_rgba: Rgba,
    /// Alpha of the oldest dot.
    #[serde(default = "default_min_alpha")]
    pub min_alpha: u8,
    /// Shrink the trail onto the pointer while it is not moving.
    #[serde(default = "default_true")]
    pub idle_decay: bool,
}

impl Default for LaserSettings {
    fn default() -> Self {
        LaserSettings {
            max_trail_length: default_max_trail_length(),
            base_radius: default_base_radius(),
            head_multiplier: default_head_multiplier(),
            color_rgba: default_laser_color(),
            min_alpha: default_min_alpha(),
            idle_decay: default_true(),
        }
    }
}

fn default_max_trail_length() -> usize {
    15
}

fn default_base_radius() -> f32 {
    7.0
}

fn default_head_multiplier() -> f32 {
    1.5
}

fn default_laser_color() -> Rgba {
    Rgba::new(255, 0, 0, 255)
}

fn default_min_alpha() -> u8 {
    25
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ModesRepr {
    List(Vec<String>),
    Csv(String),
}

fn deserialize_modes<'de, D>(deserializer: D) -> Result<Vec<PresenterMode>, D::Error>
where
    D: Deserializer<'de>,
{
    let names = match ModesRepr::deserialize(deserializer)? {
        ModesRepr::List(names) => names,
        ModesRepr::Csv(text) => text.split(',').map(str::to_string).collect(),
    };

    names
        .iter()
        .filter(|name| !name.trim().is_empty())
        .map(|name| name.parse::<PresenterMode>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(serde::de::Error::custom)
}

impl OverlayConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, OverlayError> {
        let config: OverlayConfig = serde_json::from_str(json)?;
        config.validate()?;
        log::info!(
            "[CONFIG] Loaded overlay config, modes: {:?}",
            config.general.modes
        );
        Ok(config)
    }

    /// Reject values the engine cannot render meaningfully.
    pub fn validate(&self) -> Result<(), OverlayError> {
        let invalid =
            |msg: String| -> Result<(), OverlayError> { Err(OverlayError::InvalidConfig(msg)) };

        if self.general.modes.is_empty() {
            return invalid("General.modes must list at least one mode".to_string());
        }
        if self.general.double_click_ms == 0 {
            return invalid("General.double_click_ms must be positive".to_string());
        }

        let s = &self.spotlight;
        if !s.spot_radius.is_finite() || s.spot_radius <= 0.0 {
            return invalid(format!("Spotlight.spot_radius {} must be > 0", s.spot_radius));
        }
        if !s.ring_thickness.is_finite() || !(0.0..=1.0).contains(&s.ring_thickness) {
            return invalid(format!(
                "Spotlight.ring_thickness {} must be within [0, 1]",
                s.ring_thickness
            ));
        }

        let l = &self.laser;
        if l.max_trail_length == 0 {
            return invalid("Laser.max_trail_length must be positive".to_string());
        }
        if !l.base_radius.is_finite() || l.base_radius <= 0.0 {
            return invalid(format!("Laser.base_radius {} must be > 0", l.base_radius));
        }
        if !l.head_multiplier.is_finite() || l.head_multiplier < 0.0 {
            return invalid(format!(
                "Laser.head_multiplier {} must be >= 0",
                l.head_multiplier
            ));
        }

        Ok(())
    }
}

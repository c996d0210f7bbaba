// Spotlight mask: darkened surface with a transparent disc at the pointer
// and a feathered ring along the inside of the disc edge.

use crate::config::SpotlightSettings;
use crate::types::*;

/// Builds spotlight draw commands. Stateless apart from its settings.
pub struct SpotlightRenderer {
    settings: SpotlightSettings,
}

impl SpotlightRenderer {
    pub fn new(settings: SpotlightSettings) -> Self {
        SpotlightRenderer { settings }
    }

    pub fn settings(&self) -> &SpotlightSettings {
        &self.settings
    }

    /// Cutout radius, clamped to non-negative.
    pub fn spot_radius(&self) -> f32 {
        self.settings.spot_radius.max(0.0)
    }

    /// Ring width in pixels.
    pub fn ring_width(&self) -> f32 {
        self.spot_radius() * self.settings.ring_thickness.clamp(0.0, 1.0)
    }

    /// Draw commands for a spotlight centred on `center`, in paint order.
    pub fn render(&self, center: ScreenPoint) -> Vec<DrawCommand> {
        let radius = self.spot_radius();
        let mut commands = vec![
            DrawCommand::Fill {
                color: Rgba::new(0, 0, 0, self.settings.background_alpha),
            },
            DrawCommand::ClearCircle { center, radius },
        ];

        let ring_width = self.ring_width();
        if ring_width > 0.0 && self.settings.ring_color_rgba.a > 0 {
            commands.push(DrawCommand::Ring {
                center,
                inner_radius: radius - ring_width,
                outer_radius: radius,
                color: self.settings.ring_color_rgba,
            });
        }

        commands
    }
}

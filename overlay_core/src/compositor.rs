// Per-tick overlay composition.
// Reads the engine snapshot and pointer, feeds the laser trail, and emits draw
// commands for whichever indicator is active. Indicator off means an empty frame.

use serde::{Deserialize, Serialize};

use crate::config::{LaserSettings, OverlayConfig};
use crate::error::OverlayError;
use crate::spotlight::SpotlightRenderer;
use crate::trail::LaserTrail;
use crate::types::*;

/// Properties the windowing layer must give the overlay surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSpec {
    pub width: u32,
    pub height: u32,
    /// Pointer and keyboard events pass through to the application below.
    pub click_through: bool,
    pub always_on_top: bool,
    pub transparent: bool,
}

impl SurfaceSpec {
    /// Full-screen surface for a screen of the given size.
    pub fn fullscreen(width: u32, height: u32) -> Result<Self, OverlayError> {
        if width == 0 || height == 0 {
            return Err(OverlayError::Surface {
                width,
                height,
                message: "overlay surface needs a non-empty screen".to_string(),
            });
        }

        Ok(SurfaceSpec {
            width,
            height,
            click_through: true,
            always_on_top: true,
            transparent: true,
        })
    }
}

/// Composes one frame of draw commands per display tick.
pub struct OverlayCompositor {
    spotlight: SpotlightRenderer,
    laser: LaserSettings,
    last_sampled: Option<ScreenPoint>,
}

impl OverlayCompositor {
    pub fn new(config: &OverlayConfig) -> Self {
        OverlayCompositor {
            spotlight: SpotlightRenderer::new(config.spotlight.clone()),
            laser: config.laser.clone(),
            last_sampled: None,
        }
    }

    /// Draw commands for this tick, in paint order.
    pub fn compose(
        &mut self,
        snapshot: &EngineSnapshot,
        trail: &mut LaserTrail,
        pointer: ScreenPoint,
        now: Timestamp,
    ) -> Vec<DrawCommand> {
        if !snapshot.indicator_on {
            self.last_sampled = None;
            return Vec::new();
        }

        match snapshot.active_mode {
            PresenterMode::Laser => self.compose_laser(trail, pointer, now),
            PresenterMode::SpotlightHold | PresenterMode::SpotlightToggle => {
                self.last_sampled = None;
                self.spotlight.render(pointer)
            }
        }
    }

    fn compose_laser(
        &mut self,
        trail: &mut LaserTrail,
        pointer: ScreenPoint,
        now: Timestamp,
    ) -> Vec<DrawCommand> {
        let moved = self.last_sampled != Some(pointer);
        if !self.laser.idle_decay || moved || trail.is_empty() {
            trail.sample(pointer, now);
            self.last_sampled = Some(pointer);
        } else {
            trail.decay();
        }

        // Oldest first so the head is painted on top.
        trail
            .render_list()
            .into_iter()
            .rev()
            .map(|dot| DrawCommand::Dot {
                center: dot.position,
                radius: dot.radius,
                color: self.laser.color_rgba.fade(dot.alpha as f32 / 255.0),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(mode: PresenterMode, on: bool) -> EngineSnapshot {
        EngineSnapshot {
            active_mode: mode,
            active_mode_index: 0,
            indicator_on: on,
        }
    }

    fn setup(idle_decay: bool) -> (OverlayCompositor, LaserTrail) {
        let mut config = OverlayConfig::default();
        config.laser.idle_decay = idle_decay;
        (
            OverlayCompositor::new(&config),
            LaserTrail::new(&config.laser),
        )
    }

    #[test]
    fn indicator_off_draws_nothing() {
        let (mut compositor, mut trail) = setup(true);
        for mode in [
            PresenterMode::SpotlightHold,
            PresenterMode::Laser,
            PresenterMode::SpotlightToggle,
        ] {
            let commands = compositor.compose(
                &snapshot(mode, false),
                &mut trail,
                ScreenPoint::new(1.0, 1.0),
                Timestamp::default(),
            );
            assert!(commands.is_empty());
        }
        assert!(trail.is_empty());
    }

    #[test]
    fn spotlight_modes_draw_mask_at_pointer() {
        let (mut compositor, mut trail) = setup(true);
        let pointer = ScreenPoint::new(640.0, 360.0);
        let commands = compositor.compose(
            &snapshot(PresenterMode::SpotlightToggle, true),
            &mut trail,
            pointer,
            Timestamp::default(),
        );

        assert!(matches!(
            commands[1],
            DrawCommand::ClearCircle { center, .. } if center == pointer
        ));
        assert!(trail.is_empty());
    }

    #[test]
    fn laser_samples_moves_and_paints_head_last() {
        let (mut compositor, mut trail) = setup(true);
        let on = snapshot(PresenterMode::Laser, true);
        for i in 0..3 {
            compositor.compose(
                &on,
                &mut trail,
                ScreenPoint::new(i as f32, 0.0),
                Timestamp::from_millis(i * 30),
            );
        }
        assert_eq!(trail.len(), 3);

        let commands = compositor.compose(
            &on,
            &mut trail,
            ScreenPoint::new(3.0, 0.0),
            Timestamp::from_millis(90),
        );
        match commands.last() {
            Some(DrawCommand::Dot {
                center,
                radius,
                color,
            }) => {
                assert_eq!(*center, ScreenPoint::new(3.0, 0.0));
                assert_eq!(*radius, 10.5);
                assert_eq!(color.a, 255);
            }
            other => panic!("expected head dot, got {:?}", other),
        }
        match commands.first() {
            Some(DrawCommand::Dot { color, .. }) => assert_eq!(color.a, 25),
            other => panic!("expected tail dot, got {:?}", other),
        }
    }

    #[test]
    fn stationary_pointer_decays_trail() {
        let (mut compositor, mut trail) = setup(true);
        let on = snapshot(PresenterMode::Laser, true);
        for i in 0..4 {
            compositor.compose(
                &on,
                &mut trail,
                ScreenPoint::new(i as f32, 0.0),
                Timestamp::default(),
            );
        }
        for _ in 0..10 {
            compositor.compose(&on, &mut trail, ScreenPoint::new(3.0, 0.0), Timestamp::default());
        }

        assert_eq!(trail.len(), 1);
        assert_eq!(trail.head().map(|s| s.position), Some(ScreenPoint::new(3.0, 0.0)));
    }

    #[test]
    fn without_idle_decay_every_tick_samples() {
        let (mut compositor, mut trail) = setup(false);
        let on = snapshot(PresenterMode::Laser, true);
        for _ in 0..4 {
            compositor.compose(&on, &mut trail, ScreenPoint::new(5.0, 5.0), Timestamp::default());
        }
        assert_eq!(trail.len(), 4);
    }

    #[test]
    fn surface_is_click_through_and_topmost() {
        let surface = SurfaceSpec::fullscreen(1920, 1080).unwrap();
        assert!(surface.click_through && surface.always_on_top && surface.transparent);
        assert!(matches!(
            SurfaceSpec::fullscreen(0, 1080),
            Err(OverlayError::Surface { width: 0, .. })
        ));
    }
}

// Presenter mode state machine.
// Owns the active mode index, the indicator flag and the laser trail.
// Every (state, event) pair resolves to a defined state; unmatched events are no-ops.

use crate::config::OverlayConfig;
use crate::trail::LaserTrail;
use crate::types::*;

/// Mutable engine state. One per process, owned by the state machine.
pub struct EngineState {
    pub active_mode_index: usize,
    pub indicator_on: bool,
    pub trail: LaserTrail,
}

/// What an event changed, for logging and host notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Transition {
    pub mode_changed: Option<PresenterMode>,
    pub indicator_changed: Option<bool>,
}

impl Transition {
    pub fn is_noop(&self) -> bool {
        self.mode_changed.is_none() && self.indicator_changed.is_none()
    }
}

pub struct ModeStateMachine {
    modes: Vec<PresenterMode>,
    state: EngineState,
}

impl ModeStateMachine {
    /// Start at the first configured mode with the indicator off.
    pub fn new(config: &OverlayConfig) -> Self {
        let modes = if config.general.modes.is_empty() {
            vec![PresenterMode::SpotlightHold]
        } else {
            config.general.modes.clone()
        };

        ModeStateMachine {
            modes,
            state: EngineState {
                active_mode_index: 0,
                indicator_on: false,
                trail: LaserTrail::new(&config.laser),
            },
        }
    }

    pub fn modes(&self) -> &[PresenterMode] {
        &self.modes
    }

    pub fn active_mode(&self) -> PresenterMode {
        self.modes[self.state.active_mode_index]
    }

    pub fn active_mode_index(&self) -> usize {
        self.state.active_mode_index
    }

    pub fn indicator_on(&self) -> bool {
        self.state.indicator_on
    }

    pub fn trail(&self) -> &LaserTrail {
        &self.state.trail
    }

    pub fn trail_mut(&mut self) -> &mut LaserTrail {
        &mut self.state.trail
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            active_mode: self.active_mode(),
            active_mode_index: self.state.active_mode_index,
            indicator_on: self.state.indicator_on,
        }
    }

    /// Apply one semantic event.
    pub fn apply(&mut self, event: SemanticEvent) -> Transition {
        let mode = self.active_mode();

        let transition = match (event, mode) {
            (SemanticEvent::Erase, _) => self.cycle_mode(),

            (
                SemanticEvent::SpotlightPress,
                PresenterMode::SpotlightHold | PresenterMode::Laser,
            ) => self.set_indicator(true),

            (
                SemanticEvent::SpotlightRelease,
                PresenterMode::SpotlightHold | PresenterMode::Laser,
            ) => self.set_indicator(false),

            (SemanticEvent::SpotlightPress, PresenterMode::SpotlightToggle) => {
                let on = !self.state.indicator_on;
                self.set_indicator(on)
            }

            // Toggle is press-driven; the device's own double click and the
            // annotate button only affect the device. Quit is handled by the host.
            (SemanticEvent::SpotlightRelease, PresenterMode::SpotlightToggle)
            | (SemanticEvent::AnnotatePress, _)
            | (SemanticEvent::AnnotateRelease, _)
            | (SemanticEvent::SpotlightDoubleClick, _)
            | (SemanticEvent::Quit, _) => Transition::default(),
        };

        if !transition.is_noop() {
            log::debug!("[MODE] {:?} in {} -> {:?}", event, mode, transition);
        }
        transition
    }

    /// Force the indicator off and clear the trail.
    pub fn deactivate(&mut self) -> Transition {
        self.set_indicator(false)
    }

    fn cycle_mode(&mut self) -> Transition {
        let indicator = self.set_indicator(false);

        self.state.active_mode_index = (self.state.active_mode_index + 1) % self.modes.len();
        let mode = self.active_mode();
        log::info!("[MODE] Switched to {}", mode);

        Transition {
            mode_changed: Some(mode),
            indicator_changed: indicator.indicator_changed,
        }
    }

    fn set_indicator(&mut self, on: bool) -> Transition {
        if !on {
            self.state.trail.clear();
        }
        if self.state.indicator_on == on {
            return Transition::default();
        }

        self.state.indicator_on = on;
        Transition {
            mode_changed: None,
            indicator_changed: Some(on),
        }
    }
}

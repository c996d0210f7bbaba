// Presenter button decoding.
// The remote types keyboard shortcuts: spotlight Ctrl+L / Ctrl+A, erase 'e',
// annotate Ctrl+P / Ctrl+A. Raw events are observed, never consumed.

use crate::types::*;

/// Which button last produced a press that has not been released yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeldButton {
    Spotlight,
    Annotate,
}

/// Maps raw key codes to semantic presenter events.
pub struct InputMapper {
    double_click_us: u64,
    held: Option<HeldButton>,
    last_spotlight_press: Option<Timestamp>,
}

impl InputMapper {
    pub fn new(double_click_ms: u64) -> Self {
        InputMapper {
            double_click_us: double_click_ms.saturating_mul(1000),
            held: None,
            last_spotlight_press: None,
        }
    }

    /// Map a batch of raw events in order, skipping unrecognised ones.
    pub fn process(&mut self, events: &[RawInput]) -> Vec<SemanticEvent> {
        events.iter().filter_map(|event| self.map(event)).collect()
    }

    /// Map one raw event to at most one semantic event.
    pub fn map(&mut self, event: &RawInput) -> Option<SemanticEvent> {
        let mapped = match &event.kind {
            RawInputKind::KeyDown { key, ctrl: true } => self.map_ctrl_key(key, event.timestamp),
            RawInputKind::KeyDown { key, ctrl: false } if key.is_char('e') => {
                Some(SemanticEvent::Erase)
            }
            // Presses carry all the meaning; key-ups and clicks pass through.
            RawInputKind::KeyDown { .. }
            | RawInputKind::KeyUp { .. }
            | RawInputKind::MouseClick { .. } => None,
        };

        if let Some(semantic) = mapped {
            log::trace!("[INPUT] {:?} -> {:?}", event.kind, semantic);
        }
        mapped
    }

    fn map_ctrl_key(&mut self, key: &Key, now: Timestamp) -> Option<SemanticEvent> {
        if key.is_char('l') {
            return Some(self.spotlight_press(now));
        }

        if key.is_char('a') {
            return Some(match self.held.take() {
                Some(HeldButton::Annotate) => SemanticEvent::AnnotateRelease,
                _ => {
                    self.last_spotlight_press = None;
                    SemanticEvent::SpotlightRelease
                }
            });
        }

        if key.is_char('p') {
            self.held = Some(HeldButton::Annotate);
            return Some(SemanticEvent::AnnotatePress);
        }

        if key.is_char('q') {
            return Some(SemanticEvent::Quit);
        }

        None
    }

    fn spotlight_press(&mut self, now: Timestamp) -> SemanticEvent {
        self.held = Some(HeldButton::Spotlight);

        match self.last_spotlight_press.take() {
            Some(previous) if now.micros_since(previous) <= self.double_click_us => {
                SemanticEvent::SpotlightDoubleClick
            }
            _ => {
                self.last_spotlight_press = Some(now);
                SemanticEvent::SpotlightPress
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: u64) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    #[test]
    fn device_shortcuts_map_to_events() {
        let mut mapper = InputMapper::new(350);
        let events = [
            RawInput::ctrl_char(at(0), 'l'),
            RawInput::ctrl_char(at(100), 'a'),
            RawInput::key_down(at(200), Key::Char('e'), false),
            RawInput::ctrl_char(at(300), 'q'),
        ];

        assert_eq!(
            mapper.process(&events),
            vec![
                SemanticEvent::SpotlightPress,
                SemanticEvent::SpotlightRelease,
                SemanticEvent::Erase,
                SemanticEvent::Quit,
            ]
        );
    }

    #[test]
    fn ctrl_a_releases_annotate_when_annotate_is_held() {
        let mut mapper = InputMapper::new(350);
        let events = [
            RawInput::ctrl_char(at(0), 'p'),
            RawInput::ctrl_char(at(50), 'a'),
            RawInput::ctrl_char(at(100), 'a'),
        ];

        assert_eq!(
            mapper.process(&events),
            vec![
                SemanticEvent::AnnotatePress,
                SemanticEvent::AnnotateRelease,
                SemanticEvent::SpotlightRelease,
            ]
        );
    }

    #[test]
    fn spotlight_press_after_annotate_takes_over_ctrl_a() {
        let mut mapper = InputMapper::new(350);
        let events = [
            RawInput::ctrl_char(at(0), 'p'),
            RawInput::ctrl_char(at(10), 'l'),
            RawInput::ctrl_char(at(20), 'a'),
        ];

        assert_eq!(mapper.process(&events)[2], SemanticEvent::SpotlightRelease);
    }

    #[test]
    fn quick_second_press_is_double_click() {
        let mut mapper = InputMapper::new(350);
        let events = [
            RawInput::ctrl_char(at(0), 'l'),
            RawInput::ctrl_char(at(200), 'l'),
            RawInput::ctrl_char(at(300), 'l'),
        ];

        assert_eq!(
            mapper.process(&events),
            vec![
                SemanticEvent::SpotlightPress,
                SemanticEvent::SpotlightDoubleClick,
                SemanticEvent::SpotlightPress,
            ]
        );
    }

    #[test]
    fn release_in_between_prevents_double_click() {
        let mut mapper = InputMapper::new(350);
        let events = [
            RawInput::ctrl_char(at(0), 'l'),
            RawInput::ctrl_char(at(50), 'a'),
            RawInput::ctrl_char(at(100), 'l'),
        ];

        assert_eq!(mapper.process(&events)[2], SemanticEvent::SpotlightPress);
    }

    #[test]
    fn slow_second_press_is_a_plain_press() {
        let mut mapper = InputMapper::new(350);
        let events = [
            RawInput::ctrl_char(at(0), 'l'),
            RawInput::ctrl_char(at(1_000), 'l'),
        ];

        assert_eq!(
            mapper.process(&events),
            vec![SemanticEvent::SpotlightPress, SemanticEvent::SpotlightPress]
        );
    }

    #[test]
    fn unrecognised_input_is_ignored() {
        let mut mapper = InputMapper::new(350);
        let events = [
            RawInput::key_down(at(0), Key::Char('l'), false),
            RawInput::key_down(at(0), Key::Char('e'), true),
            RawInput::key_down(at(0), Key::Named("F5".to_string()), false),
            RawInput::key_up(at(0), Key::Char('e'), false),
            RawInput {
                timestamp: at(0),
                kind: RawInputKind::MouseClick { button: 0 },
            },
        ];

        assert!(mapper.process(&events).is_empty());
    }
}

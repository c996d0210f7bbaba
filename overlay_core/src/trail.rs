// Laser trail: bounded history of pointer samples, newest first.
// Fade is driven by index position, not wall-clock time, so it is frame-rate independent.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::config::LaserSettings;
use crate::types::*;

/// One recorded pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailSample {
    pub position: ScreenPoint,
    pub inserted_at: Timestamp,
}

impl TrailSample {
    /// Microseconds since this sample was recorded.
    pub fn age_at(&self, now: Timestamp) -> u64 {
        now.micros_since(self.inserted_at)
    }
}

/// Radius and opacity for one trail dot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailDot {
    pub position: ScreenPoint,
    pub radius: f32,
    pub alpha: u8,
}

/// FIFO-bounded laser trail. Index 0 is the newest sample.
pub struct LaserTrail {
    samples: VecDeque<TrailSample>,
    max_len: usize,
    base_radius: f32,
    head_multiplier: f32,
    min_alpha: u8,
}

impl LaserTrail {
    pub fn new(settings: &LaserSettings) -> Self {
        let max_len = settings.max_trail_length.max(1);
        LaserTrail {
            samples: VecDeque::with_capacity(max_len + 1),
            max_len,
            base_radius: settings.base_radius,
            head_multiplier: settings.head_multiplier,
            min_alpha: settings.min_alpha,
        }
    }

    /// Record a pointer position at the head, evicting the oldest past the bound.
    pub fn sample(&mut self, position: ScreenPoint, now: Timestamp) {
        self.samples.push_front(TrailSample {
            position,
            inserted_at: now,
        });
        self.samples.truncate(self.max_len);
    }

    /// Drop the oldest sample while keeping the head. Returns true if one was dropped.
    pub fn decay(&mut self) -> bool {
        if self.samples.len() > 1 {
            self.samples.pop_back();
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_len
    }

    /// Newest sample, if any.
    pub fn head(&self) -> Option<&TrailSample> {
        self.samples.front()
    }

    pub fn samples(&self) -> impl Iterator<Item = &TrailSample> {
        self.samples.iter()
    }

    /// Dots from newest (index 0) to oldest.
    ///
    /// The head is `base_radius * head_multiplier`, every other dot `base_radius`.
    /// Alpha falls linearly from 255 at the head to `min_alpha` at the tail:
    /// `alpha(i) = 255 - i / (n - 1) * (255 - min_alpha)`, or 255 for a lone sample.
    pub fn render_list(&self) -> Vec<TrailDot> {
        let n = self.samples.len();
        let base_radius = self.base_radius.max(0.0);
        let head_radius = (self.base_radius * self.head_multiplier).max(0.0);
        let span = 255.0 - self.min_alpha as f32;

        self.samples
            .iter()
            .enumerate()
            .map(|(i, sample)| {
                let alpha = if n > 1 {
                    let t = i as f32 / (n - 1) as f32;
                    (255.0 - t * span).round().clamp(0.0, 255.0) as u8
                } else {
                    255
                };
                TrailDot {
                    position: sample.position,
                    radius: if i == 0 { head_radius } else { base_radius },
                    alpha,
                }
            })
            .collect()
    }
}

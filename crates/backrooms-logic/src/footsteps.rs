//! Footstep ripples — short-lived expanding rings left by the player.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::config::FootstepConfig;

/// One expanding ring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FootstepRipple {
    pub x: f32,
    pub y: f32,
    pub age: u32,
    pub lifetime: u32,
    pub max_radius: f32,
}

impl FootstepRipple {
    pub fn new(x: f32, y: f32, config: &FootstepConfig) -> Self {
        Self {
            x,
            y,
            age: 0,
            lifetime: config.lifetime,
            max_radius: config.max_radius,
        }
    }

    /// Age by one tick. Returns false once the ripple has expired.
    pub fn update(&mut self) -> bool {
        self.age += 1;
        self.is_alive()
    }

    pub fn is_alive(&self) -> bool {
        self.age < self.lifetime
    }

    /// Grows linearly from 0 to `max_radius` over the lifetime.
    pub fn radius(&self) -> f32 {
        self.age as f32 / self.lifetime as f32 * self.max_radius
    }

    /// Fades 4 per tick, so it is invisible from tick 64 onward.
    pub fn alpha(&self) -> u8 {
        255u32.saturating_sub(self.age.saturating_mul(4)) as u8
    }
}

/// Bounded FIFO of live ripples. Pushing past capacity drops the oldest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootstepTracker {
    ripples: VecDeque<FootstepRipple>,
    config: FootstepConfig,
}

impl FootstepTracker {
    pub fn new(config: FootstepConfig) -> Self {
        Self {
            ripples: VecDeque::with_capacity(config.capacity + 1),
            config,
        }
    }

    pub fn push(&mut self, x: f32, y: f32) {
        self.ripples.push_back(FootstepRipple::new(x, y, &self.config));
        while self.ripples.len() > self.config.capacity {
            self.ripples.pop_front();
        }
    }

    /// Age every ripple and drop the expired ones.
    pub fn update(&mut self) {
        self.ripples.retain_mut(|r| r.update());
    }

    pub fn clear(&mut self) {
        self.ripples.clear();
    }

    /// Oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &FootstepRipple> {
        self.ripples.iter()
    }

    pub fn len(&self) -> usize {
        self.ripples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ripples.is_empty()
    }
}

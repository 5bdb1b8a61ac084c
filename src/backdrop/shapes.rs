use rand::Rng;

use crate::config::BackdropConfig;
use crate::types::Viewport;

/// A heart that drifts upward and re-enters from below once it leaves the top
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartMarker {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub speed: f64,
    pub opacity: f64,
}

impl HeartMarker {
    pub fn spawn<R: Rng + ?Sized>(viewport: Viewport, config: &BackdropConfig, rng: &mut R) -> Self {
        Self {
            x: rng.gen::<f64>() * viewport.width,
            y: rng.gen::<f64>() * viewport.height,
            size: config.heart_size.sample(rng),
            speed: config.heart_speed.sample(rng),
            opacity: config.heart_opacity.sample(rng),
        }
    }

    /// Fully above the top edge
    pub fn has_exited(&self) -> bool {
        self.y + self.size < 0.0
    }

    /// One frame of motion. Size, speed and opacity never change.
    pub fn advance<R: Rng + ?Sized>(self, viewport: Viewport, rng: &mut R) -> Self {
        let moved = Self {
            y: self.y - self.speed,
            ..self
        };
        if moved.has_exited() {
            Self {
                x: rng.gen::<f64>() * viewport.width,
                y: viewport.height + moved.size,
                ..moved
            }
        } else {
            moved
        }
    }
}

/// An ECG-style trace that relocates each time its progress wraps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PulseTrace {
    pub x: f64,
    pub y: f64,
    /// In [0, 1)
    pub progress: f64,
}

impl PulseTrace {
    pub fn spawn<R: Rng + ?Sized>(viewport: Viewport, rng: &mut R) -> Self {
        Self {
            x: rng.gen::<f64>() * viewport.width,
            y: rng.gen::<f64>() * viewport.height,
            progress: rng.gen::<f64>(),
        }
    }

    pub fn advance<R: Rng + ?Sized>(self, increment: f64, viewport: Viewport, rng: &mut R) -> Self {
        let progress = self.progress + increment;
        if progress >= 1.0 {
            Self {
                x: rng.gen::<f64>() * viewport.width,
                y: rng.gen::<f64>() * viewport.height,
                progress: 0.0,
            }
        } else {
            Self { progress, ..self }
        }
    }
}

/// The fixed set of animated shapes. Members are recycled, never removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    pub hearts: Vec<HeartMarker>,
    pub pulses: Vec<PulseTrace>,
}

impl Population {
    pub fn spawn<R: Rng + ?Sized>(viewport: Viewport, config: &BackdropConfig, rng: &mut R) -> Self {
        let hearts = (0..config.heart_count)
            .map(|_| HeartMarker::spawn(viewport, config, rng))
            .collect();
        let pulses = (0..config.pulse_count)
            .map(|_| PulseTrace::spawn(viewport, rng))
            .collect();
        Self { hearts, pulses }
    }

    /// Advance every shape by one frame
    pub fn step<R: Rng + ?Sized>(&mut self, viewport: Viewport, config: &BackdropConfig, rng: &mut R) {
        for heart in &mut self.hearts {
            *heart = heart.advance(viewport, rng);
        }
        for pulse in &mut self.pulses {
            *pulse = pulse.advance(config.pulse_increment, viewport, rng);
        }
    }
}

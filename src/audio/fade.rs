//! Linear music volume fades

/// Direction of a [`MusicFade`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    In,
    Out,
}

/// Volume fade between silence and full base volume
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MusicFade {
    direction: FadeDirection,
    elapsed: f32,
    duration: f32,
}

/// Result of advancing a fade by one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeTick {
    /// Base volume for this frame, in [0, 1]
    pub volume: f32,
    pub finished: bool,
}

impl MusicFade {
    pub fn fade_in(duration: f32) -> Self {
        Self {
            direction: FadeDirection::In,
            elapsed: 0.0,
            duration,
        }
    }

    pub fn fade_out(duration: f32) -> Self {
        Self {
            direction: FadeDirection::Out,
            elapsed: 0.0,
            duration,
        }
    }

    pub fn direction(&self) -> FadeDirection {
        self.direction
    }

    /// Volume at the start of the fade
    pub fn start_volume(&self) -> f32 {
        match self.direction {
            FadeDirection::In => 0.0,
            FadeDirection::Out => 1.0,
        }
    }

    /// Advances by `dt` seconds
    ///
    /// A non-positive duration finishes on the first tick.
    pub fn advance(&mut self, dt: f32) -> FadeTick {
        self.elapsed += dt.max(0.0);
        let progress = if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        };

        let volume = match self.direction {
            FadeDirection::In => progress,
            FadeDirection::Out => 1.0 - progress,
        };

        FadeTick {
            volume,
            finished: progress >= 1.0,
        }
    }
}

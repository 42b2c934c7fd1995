//=========================================================================
// Frame Animator
//=========================================================================

/// Cycles through a list of sprite frames at a fixed frame duration.
#[derive(Debug, Clone)]
pub struct FrameAnimator {
    frames: Vec<usize>,
    frame_duration: u64,
    elapsed: u64,
    current: usize,
    paused: bool,
}

impl FrameAnimator {
    /// `frames` are sprite indices in play order.
    pub fn new(frames: Vec<usize>, frame_duration: u64) -> Self {
        assert!(!frames.is_empty(), "Animator needs at least one frame");
        assert!(frame_duration > 0, "Frame duration must be positive");

        Self {
            frames,
            frame_duration,
            elapsed: 0,
            current: 0,
            paused: false,
        }
    }

    pub fn update(&mut self, dt: u64) {
        if self.paused {
            return;
        }

        self.elapsed += dt;
        if self.elapsed > self.frame_duration {
            let skipped = (self.elapsed / self.frame_duration) as usize;
            self.current = (self.current + skipped) % self.frames.len();
            self.elapsed %= self.frame_duration;
        }
    }

    /// Sprite index to draw.
    pub fn frame(&self) -> usize {
        self.frames[self.current]
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn reset(&mut self) {
        self.current = 0;
        self.elapsed = 0;
        self.paused = false;
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_after_frame_duration() {
        let mut animator = FrameAnimator::new(vec![0, 1, 2, 1], 55);
        animator.update(55);
        assert_eq!(animator.frame(), 0);
        animator.update(1);
        assert_eq!(animator.frame(), 1);
    }

    #[test]
    fn skips_frames_and_wraps() {
        let mut animator = FrameAnimator::new(vec![0, 1, 2, 1], 10);
        animator.update(35);
        assert_eq!(animator.frame(), 1); // index 3
        animator.update(10);
        assert_eq!(animator.frame(), 0); // 5 + 10 → one more, wraps
    }

    #[test]
    fn paused_animator_holds_frame() {
        let mut animator = FrameAnimator::new(vec![4, 5], 10);
        animator.pause();
        animator.update(100);
        assert_eq!(animator.frame(), 4);

        animator.resume();
        animator.update(11);
        assert_eq!(animator.frame(), 5);
    }
}

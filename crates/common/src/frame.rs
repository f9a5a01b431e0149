use std::time::{Duration, Instant};

/// Caps the frame rate: a frame is due once `1 / max_fps` has passed since
/// the previous one started.
#[derive(Debug, Clone)]
pub struct FrameLimiter {
    frame_time: Option<Duration>,
    next: Option<Instant>,
    last: Option<Instant>,
}

impl FrameLimiter {
    /// `max_fps == 0` disables the cap.
    pub fn new(max_fps: u32) -> Self {
        let frame_time = (max_fps > 0).then(|| Duration::from_secs_f64(1.0 / max_fps as f64));
        Self {
            frame_time,
            next: None,
            last: None,
        }
    }

    pub fn frame_time(&self) -> Option<Duration> {
        self.frame_time
    }

    /// Earliest instant the next frame may start, if capped.
    pub fn deadline(&self) -> Option<Instant> {
        self.next
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.next.is_none_or(|next| now >= next)
    }

    /// Record the start of a frame; returns the time since the previous one.
    pub fn mark_frame(&mut self, now: Instant) -> Duration {
        let dt = self
            .last
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        self.last = Some(now);
        self.next = self.frame_time.map(|ft| now + ft);
        dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_is_due_immediately() {
        let limiter = FrameLimiter::new(60);
        assert!(limiter.is_due(Instant::now()));
        assert!(limiter.deadline().is_none());
    }

    #[test]
    fn caps_at_frame_time() {
        let mut limiter = FrameLimiter::new(60);
        let t0 = Instant::now();
        assert_eq!(limiter.mark_frame(t0), Duration::ZERO);

        assert!(!limiter.is_due(t0 + Duration::from_millis(10)));
        assert!(limiter.is_due(t0 + Duration::from_millis(17)));
        assert_eq!(limiter.deadline(), Some(t0 + limiter.frame_time().unwrap()));
    }

    #[test]
    fn reports_elapsed_between_frames() {
        let mut limiter = FrameLimiter::new(60);
        let t0 = Instant::now();
        limiter.mark_frame(t0);
        let dt = limiter.mark_frame(t0 + Duration::from_millis(20));
        assert_eq!(dt, Duration::from_millis(20));
    }

    #[test]
    fn zero_fps_is_uncapped() {
        let mut limiter = FrameLimiter::new(0);
        let t0 = Instant::now();
        limiter.mark_frame(t0);
        assert!(limiter.is_due(t0));
        assert!(limiter.frame_time().is_none());
    }
}

use std::time::{Duration, Instant};

use crate::models::{Movie, MovieDetails};
use crate::timer::Countdown;

pub const AUTO_ADVANCE: Duration = Duration::from_millis(8000);
pub const CAROUSEL_WINDOW: usize = 5;
/// Horizontal drag distance (points) before a gesture counts as a swipe.
pub const SWIPE_THRESHOLD: f32 = 50.0;

/// A detail fetch the carousel wants issued for its current movie. The
/// generation lets a late response for an index the user already left be
/// recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailRequest {
    pub generation: u64,
    pub id: u64,
}

/// Auto-advancing carousel over the first few entries of the lead feed.
/// Manual navigation re-arms the auto-advance timer so a pending tick can't
/// immediately undo the user's action.
pub struct HeroCarousel {
    movies: Vec<Movie>,
    index: usize,
    details: Option<MovieDetails>,
    auto_advance: Countdown,
    generation: u64,
    drag_accum: f32,
}

impl HeroCarousel {
    pub fn new(movies: Vec<Movie>, now: Instant) -> Self {
        let mut movies = movies;
        movies.truncate(CAROUSEL_WINDOW);
        let mut auto_advance = Countdown::idle();
        if !movies.is_empty() {
            auto_advance.arm(now, AUTO_ADVANCE);
        }
        Self {
            movies,
            index: 0,
            details: None,
            auto_advance,
            generation: 0,
            drag_accum: 0.0,
        }
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Option<&Movie> {
        self.movies.get(self.index)
    }

    pub fn details(&self) -> Option<&MovieDetails> {
        self.details.as_ref()
    }

    /// Detail request for the initial movie, issued once after construction.
    pub fn initial_request(&mut self) -> Option<DetailRequest> {
        self.request_for_current()
    }

    fn request_for_current(&mut self) -> Option<DetailRequest> {
        let id = self.current()?.id;
        self.generation += 1;
        Some(DetailRequest {
            generation: self.generation,
            id,
        })
    }

    fn advance(&mut self, step: isize, now: Instant) -> Option<DetailRequest> {
        let n = self.movies.len();
        if n == 0 {
            return None;
        }
        self.index = (self.index as isize + step).rem_euclid(n as isize) as usize;
        self.auto_advance.arm(now, AUTO_ADVANCE);
        self.request_for_current()
    }

    pub fn next(&mut self, now: Instant) -> Option<DetailRequest> {
        self.advance(1, now)
    }

    pub fn prev(&mut self, now: Instant) -> Option<DetailRequest> {
        self.advance(-1, now)
    }

    pub fn jump(&mut self, index: usize, now: Instant) -> Option<DetailRequest> {
        if index >= self.movies.len() {
            return None;
        }
        self.index = index;
        self.auto_advance.arm(now, AUTO_ADVANCE);
        self.request_for_current()
    }

    /// Frame tick: advances automatically when the timer fires.
    pub fn tick(&mut self, now: Instant) -> Option<DetailRequest> {
        if self.auto_advance.fire(now) {
            return self.advance(1, now);
        }
        None
    }

    /// Accumulate horizontal drag movement while a gesture is in progress.
    pub fn drag_by(&mut self, delta_x: f32) {
        self.drag_accum += delta_x;
    }

    /// Gesture ended: a leftward drag past the threshold advances, a
    /// rightward one goes back, anything shorter is a no-op.
    pub fn end_drag(&mut self, now: Instant) -> Option<DetailRequest> {
        let delta = self.drag_accum;
        self.drag_accum = 0.0;
        if delta <= -SWIPE_THRESHOLD {
            self.next(now)
        } else if delta >= SWIPE_THRESHOLD {
            self.prev(now)
        } else {
            None
        }
    }

    /// Accept a resolved detail payload; the previous payload stays on screen
    /// until a response for the current position lands. Stale generations are
    /// dropped so a slow fetch can't overwrite a newer one.
    pub fn apply_details(&mut self, generation: u64, details: Option<MovieDetails>) {
        if generation != self.generation {
            return;
        }
        if let Some(details) = details {
            self.details = Some(details);
        }
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.auto_advance.remaining(now)
    }

    /// Teardown: make sure no armed timer outlives the view.
    pub fn cancel_timers(&mut self) {
        self.auto_advance.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movies(n: u64) -> Vec<Movie> {
        (1..=n)
            .map(|id| Movie {
                id,
                title: format!("Movie {}", id),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn window_is_capped_at_five() {
        let h = HeroCarousel::new(movies(9), Instant::now());
        assert_eq!(h.movies().len(), 5);
    }

    #[test]
    fn index_wraps_both_directions() {
        let t0 = Instant::now();
        let mut h = HeroCarousel::new(movies(5), t0);
        h.jump(4, t0);
        h.next(t0);
        assert_eq!(h.index(), 0);
        h.prev(t0);
        assert_eq!(h.index(), 4);
    }

    #[test]
    fn auto_tick_advances_after_interval() {
        let t0 = Instant::now();
        let mut h = HeroCarousel::new(movies(3), t0);
        assert_eq!(h.tick(t0 + AUTO_ADVANCE - Duration::from_millis(1)), None);
        let req = h.tick(t0 + AUTO_ADVANCE).unwrap();
        assert_eq!(h.index(), 1);
        assert_eq!(req.id, 2);
    }

    #[test]
    fn manual_navigation_resets_auto_advance() {
        let t0 = Instant::now();
        let mut h = HeroCarousel::new(movies(3), t0);
        let manual_at = t0 + Duration::from_millis(7900);
        h.next(manual_at);
        assert_eq!(h.index(), 1);
        // The original schedule would have fired here; the reset must hold.
        assert_eq!(h.tick(t0 + AUTO_ADVANCE), None);
        assert_eq!(h.index(), 1);
        assert!(h.tick(manual_at + AUTO_ADVANCE).is_some());
        assert_eq!(h.index(), 2);
    }

    #[test]
    fn swipe_below_threshold_is_a_no_op() {
        let t0 = Instant::now();
        let mut h = HeroCarousel::new(movies(3), t0);
        h.drag_by(-30.0);
        assert_eq!(h.end_drag(t0), None);
        assert_eq!(h.index(), 0);
    }

    #[test]
    fn swipe_direction_maps_to_next_and_prev() {
        let t0 = Instant::now();
        let mut h = HeroCarousel::new(movies(3), t0);
        h.drag_by(-40.0);
        h.drag_by(-20.0);
        assert!(h.end_drag(t0).is_some());
        assert_eq!(h.index(), 1);
        h.drag_by(60.0);
        assert!(h.end_drag(t0).is_some());
        assert_eq!(h.index(), 0);
    }

    #[test]
    fn stale_details_do_not_overwrite_newer_request() {
        let t0 = Instant::now();
        let mut h = HeroCarousel::new(movies(3), t0);
        let first = h.initial_request().unwrap();
        let second = h.next(t0).unwrap();
        let late = MovieDetails {
            movie: Movie {
                id: first.id,
                ..Default::default()
            },
            ..Default::default()
        };
        h.apply_details(first.generation, Some(late));
        assert!(h.details().is_none(), "stale payload must be dropped");
        let fresh = MovieDetails {
            movie: Movie {
                id: second.id,
                ..Default::default()
            },
            runtime: Some(101),
            ..Default::default()
        };
        h.apply_details(second.generation, Some(fresh));
        assert_eq!(h.details().unwrap().runtime, Some(101));
    }

    #[test]
    fn failed_detail_fetch_keeps_previous_payload() {
        let t0 = Instant::now();
        let mut h = HeroCarousel::new(movies(2), t0);
        let first = h.initial_request().unwrap();
        h.apply_details(
            first.generation,
            Some(MovieDetails {
                runtime: Some(90),
                ..Default::default()
            }),
        );
        let second = h.next(t0).unwrap();
        h.apply_details(second.generation, None);
        assert_eq!(h.details().unwrap().runtime, Some(90));
    }

    #[test]
    fn empty_feed_has_no_current_and_no_timer() {
        let t0 = Instant::now();
        let mut h = HeroCarousel::new(Vec::new(), t0);
        assert!(h.current().is_none());
        assert_eq!(h.initial_request(), None);
        assert_eq!(h.tick(t0 + AUTO_ADVANCE * 2), None);
        assert_eq!(h.remaining(t0), None);
    }
}

use std::time::{Duration, Instant};

use crate::models::Movie;
use crate::timer::Countdown;

pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);
pub const MAX_RESULTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Pending,
    Populated,
}

/// A search the controller wants issued. The generation ties the eventual
/// response back to the keystroke burst that caused it; stale responses are
/// dropped instead of overwriting fresher results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub generation: u64,
    pub query: String,
}

/// Debounced incremental search over the catalog. Each keystroke cancels the
/// pending debounce; only the most recently armed timer ever issues a request.
pub struct SearchController {
    pub query: String,
    pub active: bool,
    phase: SearchPhase,
    results: Vec<Movie>,
    debounce: Countdown,
    generation: u64,
}

impl Default for SearchController {
    fn default() -> Self {
        Self {
            query: String::new(),
            active: false,
            phase: SearchPhase::Idle,
            results: Vec::new(),
            debounce: Countdown::idle(),
            generation: 0,
        }
    }
}

impl SearchController {
    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn results(&self) -> &[Movie] {
        &self.results
    }

    pub fn open(&mut self) {
        self.active = true;
    }

    /// Record the current text-field contents. A blank query drops straight
    /// back to Idle with no request; anything else re-arms the debounce.
    pub fn on_input(&mut self, text: &str, now: Instant) {
        self.query = text.to_string();
        self.debounce.cancel();
        if self.query.trim().is_empty() {
            self.phase = SearchPhase::Idle;
            self.results.clear();
            return;
        }
        self.debounce.arm(now, SEARCH_DEBOUNCE);
    }

    /// Frame tick: when the debounce fires, hand back the one request to
    /// issue and move to Pending.
    pub fn poll(&mut self, now: Instant) -> Option<SearchRequest> {
        if self.debounce.fire(now) {
            self.generation += 1;
            self.phase = SearchPhase::Pending;
            return Some(SearchRequest {
                generation: self.generation,
                query: self.query.clone(),
            });
        }
        None
    }

    /// Accept a response, keeping the first `MAX_RESULTS` entries in provider
    /// order. Responses from superseded requests are discarded.
    pub fn apply_results(&mut self, generation: u64, mut results: Vec<Movie>) {
        if generation != self.generation || self.phase == SearchPhase::Idle {
            return;
        }
        results.truncate(MAX_RESULTS);
        self.results = results;
        self.phase = SearchPhase::Populated;
    }

    /// A result was clicked: hand the movie to the caller and reset to Idle.
    pub fn select(&mut self, index: usize) -> Option<Movie> {
        let picked = self.results.get(index).cloned();
        if picked.is_some() {
            self.close();
        }
        picked
    }

    /// Reset unconditionally: query, results, pending debounce, visibility.
    pub fn close(&mut self) {
        self.active = false;
        self.query.clear();
        self.results.clear();
        self.debounce.cancel();
        self.phase = SearchPhase::Idle;
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.debounce.remaining(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: u64, title: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn burst_of_keystrokes_issues_one_request_with_final_text() {
        let t0 = Instant::now();
        let mut s = SearchController::default();
        s.on_input("a", t0);
        s.on_input("al", t0 + Duration::from_millis(100));
        s.on_input("ali", t0 + Duration::from_millis(200));
        // Still inside the window measured from the last keystroke.
        assert_eq!(s.poll(t0 + Duration::from_millis(600)), None);
        let req = s.poll(t0 + Duration::from_millis(700)).unwrap();
        assert_eq!(req.query, "ali");
        assert_eq!(s.phase(), SearchPhase::Pending);
        // One-shot: no second request without new input.
        assert_eq!(s.poll(t0 + Duration::from_secs(5)), None);
    }

    #[test]
    fn blank_query_clears_without_request() {
        let t0 = Instant::now();
        let mut s = SearchController::default();
        s.on_input("alien", t0);
        s.on_input("   ", t0 + Duration::from_millis(50));
        assert_eq!(s.poll(t0 + Duration::from_secs(1)), None);
        assert_eq!(s.phase(), SearchPhase::Idle);
        assert!(s.results().is_empty());
    }

    #[test]
    fn results_are_truncated_to_first_five() {
        let t0 = Instant::now();
        let mut s = SearchController::default();
        s.on_input("star", t0);
        let req = s.poll(t0 + SEARCH_DEBOUNCE).unwrap();
        let results: Vec<Movie> = (1..=8).map(|i| movie(i, "Star")).collect();
        s.apply_results(req.generation, results);
        assert_eq!(s.phase(), SearchPhase::Populated);
        assert_eq!(s.results().len(), 5);
        assert_eq!(s.results()[0].id, 1);
    }

    #[test]
    fn stale_generation_is_discarded() {
        let t0 = Instant::now();
        let mut s = SearchController::default();
        s.on_input("first", t0);
        let old = s.poll(t0 + SEARCH_DEBOUNCE).unwrap();
        s.on_input("second", t0 + Duration::from_secs(1));
        let new = s.poll(t0 + Duration::from_secs(1) + SEARCH_DEBOUNCE).unwrap();
        s.apply_results(old.generation, vec![movie(1, "old")]);
        assert!(s.results().is_empty(), "stale response must not land");
        s.apply_results(new.generation, vec![movie(2, "new")]);
        assert_eq!(s.results()[0].id, 2);
    }

    #[test]
    fn response_after_close_is_ignored() {
        let t0 = Instant::now();
        let mut s = SearchController::default();
        s.on_input("alien", t0);
        let req = s.poll(t0 + SEARCH_DEBOUNCE).unwrap();
        s.close();
        s.apply_results(req.generation, vec![movie(1, "Alien")]);
        assert!(s.results().is_empty());
        assert_eq!(s.phase(), SearchPhase::Idle);
    }

    #[test]
    fn selecting_a_result_returns_it_and_resets() {
        let t0 = Instant::now();
        let mut s = SearchController::default();
        s.open();
        s.on_input("alien", t0);
        let req = s.poll(t0 + SEARCH_DEBOUNCE).unwrap();
        s.apply_results(req.generation, vec![movie(1, "Alien"), movie(2, "Aliens")]);
        let picked = s.select(1).unwrap();
        assert_eq!(picked.id, 2);
        assert!(!s.active);
        assert!(s.query.is_empty());
        assert!(s.results().is_empty());
        assert_eq!(s.phase(), SearchPhase::Idle);
    }
}

//! Debounced student search.
//!
//! A keystroke never talks to the network directly. Each input (re)arms a
//! settle deadline; only input that survives the quiet window untouched
//! fires a lookup, so a burst of typing costs one request. At most one
//! pending lookup exists at a time.
//!
//! Every state change bumps a generation counter and a fired lookup is
//! tagged with it. A result set is accepted only while its generation is
//! still current, so a slow response for a superseded query can never
//! clobber newer results, and a completion arriving after the form closed
//! is a no-op.
//!
//! The caller owns the clock: the event loop passes `Instant::now()` on
//! every tick and keystroke, which keeps the whole machine deterministic
//! under test.

use std::time::{Duration, Instant};

use tequio_core::record::StudentHit;
use tracing::debug;

/// Quiet period after the last keystroke before a lookup fires.
pub const SETTLE_WINDOW: Duration = Duration::from_millis(300);

/// Queries shorter than this never reach the network; the result set is
/// cleared immediately instead.
pub const MIN_QUERY_LEN: usize = 2;

/// A lookup whose settle window has elapsed, tagged with the generation
/// that must still be current when its results come back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLookup {
  pub query:      String,
  pub generation: u64,
}

/// State machine for the search box.
#[derive(Debug, Default)]
pub struct SearchDebouncer {
  query:      String,
  deadline:   Option<Instant>,
  generation: u64,
  results:    Vec<StudentHit>,
}

impl SearchDebouncer {
  pub fn new() -> Self {
    Self::default()
  }

  /// Record a keystroke. Cancels any pending lookup; schedules a new one
  /// unless the query is below the minimum length, in which case the
  /// result set is cleared on the spot.
  pub fn input(&mut self, query: &str, now: Instant) {
    self.query = query.to_owned();
    self.generation += 1;
    if query.chars().count() < MIN_QUERY_LEN {
      self.deadline = None;
      self.results.clear();
    } else {
      self.deadline = Some(now + SETTLE_WINDOW);
    }
  }

  /// Replace the query and result set outright, cancelling anything
  /// pending or in flight. Used when the form opens on an existing record
  /// and when the operator picks a hit.
  pub fn seed(&mut self, query: &str, hits: Vec<StudentHit>) {
    self.generation += 1;
    self.deadline = None;
    self.query = query.to_owned();
    self.results = hits;
  }

  /// The lookup whose settle window has elapsed, if any. Fires at most
  /// once per scheduled input.
  pub fn due(&mut self, now: Instant) -> Option<PendingLookup> {
    match self.deadline {
      Some(deadline) if now >= deadline => {
        self.deadline = None;
        debug!(query = %self.query, generation = self.generation, "search query settled");
        Some(PendingLookup {
          query:      self.query.clone(),
          generation: self.generation,
        })
      }
      _ => None,
    }
  }

  /// Install the results of a completed lookup unless a newer input or a
  /// cancellation superseded it. Replacement is wholesale; result sets are
  /// never merged. Returns whether the results were kept.
  pub fn accept(&mut self, generation: u64, hits: Vec<StudentHit>) -> bool {
    if generation != self.generation {
      debug!(
        generation,
        current = self.generation,
        "discarding stale search results"
      );
      return false;
    }
    self.results = hits;
    true
  }

  /// Invalidate any pending deadline and mark in-flight lookups stale.
  /// Closing the form (escape, backdrop, explicit cancel) calls this.
  pub fn cancel(&mut self) {
    self.generation += 1;
    self.deadline = None;
  }

  pub fn query(&self) -> &str {
    &self.query
  }

  pub fn results(&self) -> &[StudentHit] {
    &self.results
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use tequio_core::id::StudentId;

  use super::*;

  fn hit(id: i64, name: &str) -> StudentHit {
    StudentHit {
      id:         StudentId(id),
      first_name: name.into(),
      last_name:  "Pérez".into(),
    }
  }

  #[test]
  fn burst_of_keystrokes_fires_once_for_the_last_query() {
    let mut search = SearchDebouncer::new();
    let t0 = Instant::now();

    search.input("a", t0);
    search.input("ab", t0 + Duration::from_millis(50));
    search.input("abc", t0 + Duration::from_millis(100));

    // Inside the settle window of the last keystroke: nothing fires.
    assert_eq!(search.due(t0 + Duration::from_millis(350)), None);

    let fired = search.due(t0 + Duration::from_millis(401)).unwrap();
    assert_eq!(fired.query, "abc");

    // The same settle only fires once.
    assert_eq!(search.due(t0 + Duration::from_millis(500)), None);
  }

  #[test]
  fn short_query_never_fires_and_clears_results() {
    let mut search = SearchDebouncer::new();
    let t0 = Instant::now();

    search.input("ab", t0);
    let fired = search.due(t0 + SETTLE_WINDOW).unwrap();
    assert!(search.accept(fired.generation, vec![hit(1, "Ana")]));
    assert_eq!(search.results().len(), 1);

    search.input("a", t0 + Duration::from_millis(400));
    assert!(search.results().is_empty());
    assert_eq!(search.due(t0 + Duration::from_secs(10)), None);
  }

  #[test]
  fn stale_generation_is_discarded() {
    let mut search = SearchDebouncer::new();
    let t0 = Instant::now();

    search.input("ana", t0);
    let first = search.due(t0 + SETTLE_WINDOW).unwrap();

    // A newer keystroke lands while the first lookup is in flight.
    search.input("anab", t0 + Duration::from_millis(400));

    assert!(!search.accept(first.generation, vec![hit(1, "Ana")]));
    assert!(search.results().is_empty());

    let second = search.due(t0 + Duration::from_millis(701)).unwrap();
    assert_eq!(second.query, "anab");
    assert!(search.accept(second.generation, vec![hit(2, "Anabel")]));
    assert_eq!(search.results()[0].id, StudentId(2));
  }

  #[test]
  fn cancel_invalidates_pending_and_in_flight_lookups() {
    let mut search = SearchDebouncer::new();
    let t0 = Instant::now();

    search.input("ana", t0);
    let fired = search.due(t0 + SETTLE_WINDOW).unwrap();
    search.cancel();

    assert!(!search.accept(fired.generation, vec![hit(1, "Ana")]));
    assert_eq!(search.due(t0 + Duration::from_secs(5)), None);
  }

  #[test]
  fn seed_replaces_results_and_supersedes_in_flight_lookups() {
    let mut search = SearchDebouncer::new();
    let t0 = Instant::now();

    search.input("ana", t0);
    let fired = search.due(t0 + SETTLE_WINDOW).unwrap();

    // Operator picks a hit before the lookup returns.
    search.seed("Ana Pérez", vec![hit(1, "Ana")]);
    assert!(!search.accept(fired.generation, vec![hit(2, "Anabel")]));
    assert_eq!(search.results().len(), 1);
    assert_eq!(search.query(), "Ana Pérez");
  }

  #[test]
  fn results_are_replaced_wholesale() {
    let mut search = SearchDebouncer::new();
    let t0 = Instant::now();

    search.input("pe", t0);
    let first = search.due(t0 + SETTLE_WINDOW).unwrap();
    assert!(search.accept(first.generation, vec![hit(1, "Ana"), hit(2, "Beto")]));

    search.input("per", t0 + Duration::from_secs(1));
    let second = search.due(t0 + Duration::from_secs(2)).unwrap();
    assert!(search.accept(second.generation, vec![hit(3, "Carla")]));

    let ids: Vec<_> = search.results().iter().map(|h| h.id).collect();
    assert_eq!(ids, [StudentId(3)]);
  }
}

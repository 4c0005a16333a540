//! Delayed events resolved against an externally advanced clock

/// A scheduled event
#[derive(Debug, Clone)]
struct Scheduled<E> {
    due: f64,
    event: E,
}

/// Ordered list of `(delay, event)` pairs.
///
/// Time only moves when the owner calls `advance`, so tests can step it
/// deterministically. Events with equal due times fire in insertion order.
#[derive(Debug, Clone)]
pub struct Timeline<E> {
    elapsed: f64,
    events: Vec<Scheduled<E>>,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Timeline<E> {
    pub fn new() -> Self {
        Self {
            elapsed: 0.0,
            events: Vec::new(),
        }
    }

    /// Schedule `event` to fire `delay_ms` from the current elapsed time
    pub fn schedule(&mut self, delay_ms: f64, event: E) {
        let due = self.elapsed + delay_ms.max(0.0);
        let idx = self.events.partition_point(|s| s.due <= due);
        self.events.insert(idx, Scheduled { due, event });
    }

    /// Move the clock forward and return every event now due, in order
    pub fn advance(&mut self, dt_ms: f64) -> Vec<E> {
        self.elapsed += dt_ms.max(0.0);
        let ready = self.events.partition_point(|s| s.due <= self.elapsed);
        self.events.drain(..ready).map(|s| s.event).collect()
    }

    /// Drop every pending event and rewind the clock
    pub fn clear(&mut self) {
        self.events.clear();
        self.elapsed = 0.0;
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Time until the next event fires, if any
    pub fn next_due_in(&self) -> Option<f64> {
        self.events.first().map(|s| (s.due - self.elapsed).max(0.0))
    }
}

use std::time::{Duration, Instant};

/// Run `f` and return its result together with the wall-clock time it took.
pub fn time_it<T, F: FnOnce() -> T>(f: F) -> (T, Duration) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed())
}

//! Crossover detection between two value streams.
//!
//! Fed one `(a, b)` pair per bar. `crossed_above()` is true exactly on the
//! bar where `a` transitions from <= b to > b, with both streams defined on
//! the current bar and the previous one — a crossing cannot fire off the
//! warm-up edge where the prior values were still undefined.

/// Tracks the relative ordering of two streams bar over bar.
#[derive(Debug, Clone, Default)]
pub struct Crossover {
    prev: Option<(f64, f64)>,
    curr: Option<(f64, f64)>,
}

impl Crossover {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this bar's pair of values. Either side may still be warming up.
    pub fn update(&mut self, a: Option<f64>, b: Option<f64>) {
        self.prev = self.curr;
        self.curr = match (a, b) {
            (Some(a), Some(b)) => Some((a, b)),
            _ => None,
        };
    }

    /// True exactly on the bar where `a` moved from <= b to > b.
    pub fn crossed_above(&self) -> bool {
        match (self.prev, self.curr) {
            (Some((pa, pb)), Some((ca, cb))) => pa <= pb && ca > cb,
            _ => false,
        }
    }

    /// True exactly on the bar where `a` moved from >= b to < b.
    pub fn crossed_below(&self) -> bool {
        match (self.prev, self.curr) {
            (Some((pa, pb)), Some((ca, cb))) => pa >= pb && ca < cb,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(pairs: &[(Option<f64>, Option<f64>)]) -> Vec<(bool, bool)> {
        let mut cross = Crossover::new();
        pairs
            .iter()
            .map(|&(a, b)| {
                cross.update(a, b);
                (cross.crossed_above(), cross.crossed_below())
            })
            .collect()
    }

    #[test]
    fn fires_exactly_on_the_crossing_bar() {
        let events = feed(&[
            (Some(9.0), Some(10.0)),
            (Some(9.5), Some(10.0)),
            (Some(10.5), Some(10.0)), // crosses above here
            (Some(11.0), Some(10.0)),
        ]);
        assert_eq!(events, vec![
            (false, false),
            (false, false),
            (true, false),
            (false, false),
        ]);
    }

    #[test]
    fn cross_below_mirrors() {
        let events = feed(&[
            (Some(11.0), Some(10.0)),
            (Some(9.0), Some(10.0)), // crosses below here
            (Some(8.0), Some(10.0)),
        ]);
        assert_eq!(events, vec![(false, false), (false, true), (false, false)]);
    }

    #[test]
    fn touch_then_break_counts_as_cross() {
        // Equality belongs to the "below" side: a == b then a > b fires.
        let events = feed(&[(Some(10.0), Some(10.0)), (Some(10.1), Some(10.0))]);
        assert_eq!(events[1], (true, false));
    }

    #[test]
    fn never_both_on_same_bar() {
        let pairs: Vec<(Option<f64>, Option<f64>)> = [9.0, 11.0, 9.0, 11.0, 10.0, 10.0, 12.0]
            .iter()
            .map(|&a| (Some(a), Some(10.0)))
            .collect();
        for (above, below) in feed(&pairs) {
            assert!(!(above && below));
        }
    }

    #[test]
    fn constant_equal_streams_never_fire() {
        let pairs = vec![(Some(10.0), Some(10.0)); 6];
        for (above, below) in feed(&pairs) {
            assert!(!above);
            assert!(!below);
        }
    }

    #[test]
    fn no_fire_off_warmup_edge() {
        // Previous bar undefined: even though a > b now, nothing fires.
        let events = feed(&[(Some(9.0), None), (Some(11.0), Some(10.0))]);
        assert_eq!(events[1], (false, false));
    }

    #[test]
    fn undefined_gap_resets_history() {
        let events = feed(&[
            (Some(9.0), Some(10.0)),
            (None, Some(10.0)),
            (Some(11.0), Some(10.0)),
        ]);
        // The gap bar broke continuity; the third bar has no defined prior.
        assert_eq!(events[2], (false, false));
    }
}

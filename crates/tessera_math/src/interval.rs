/// A closed range of real numbers, used to bound the ray parameter `t`.
///
/// `min <= max` is assumed, not enforced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    /// A universe interval (contains everything).
    pub const UNIVERSE: Interval = Interval {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };

    /// Create a new interval given min and max values.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f64 {
        self.max - self.min
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f64) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f64) -> bool {
        self.min < x && x < self.max
    }

    /// Saturates x to [min, max].
    ///
    /// NaN saturates to `min` so the result is always inside the interval.
    pub fn clamp(&self, x: f64) -> f64 {
        if x > self.max {
            self.max
        } else if x >= self.min {
            x
        } else {
            self.min
        }
    }

    /// Same interval with its upper bound replaced.
    pub fn with_max(&self, max: f64) -> Interval {
        Interval::new(self.min, max)
    }
}

use std::collections::VecDeque;

/// Mean of the last `window` values pushed.
///
/// Used to report rolling performance (fraction of correct answers, steps to goal)
/// while training.
#[derive(Debug, Clone)]
pub struct MovingAverage {
    window: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl MovingAverage {
    /// # Panics
    ///
    /// Panics if `window` is zero.
    #[must_use]
    pub fn new(window: usize) -> Self {
        assert!(window > 0, "window must be positive");
        Self {
            window,
            values: VecDeque::with_capacity(window),
            sum: 0.0,
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.values.len() == self.window {
            if let Some(oldest) = self.values.pop_front() {
                self.sum -= oldest;
            }
        }
        self.values.push_back(value);
        self.sum += value;
    }

    /// Returns `None` until at least one value has been pushed.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.sum / self.values.len() as f64)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

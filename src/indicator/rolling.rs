/// Standard deviations at or below this are treated as zero dispersion.
pub const MIN_STD: f64 = 1.0e-12;

/// Fixed-length window over the most recent values, ring buffer for O(1) push.
///
/// Missing values occupy a slot; statistics are only reported once the window
/// is full and holds no missing values. The running sums are rebuilt from the
/// buffer each time the ring wraps so rounding error cannot accumulate.
#[derive(Debug, Clone)]
pub struct TrailingWindow {
    period: usize,
    buffer: Vec<Option<f64>>,
    head: usize,
    count: usize,
    sum: f64,
    sum_sq: f64,
    missing: usize,
}

impl TrailingWindow {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "window period must be > 0");
        Self {
            period,
            buffer: vec![None; period],
            head: 0,
            count: 0,
            sum: 0.0,
            sum_sq: 0.0,
            missing: 0,
        }
    }

    pub fn push(&mut self, value: Option<f64>) {
        if self.count >= self.period {
            match self.buffer[self.head] {
                Some(old) => {
                    self.sum -= old;
                    self.sum_sq -= old * old;
                }
                None => self.missing -= 1,
            }
        }
        match value {
            Some(v) => {
                self.sum += v;
                self.sum_sq += v * v;
            }
            None => self.missing += 1,
        }
        self.buffer[self.head] = value;
        self.head = (self.head + 1) % self.period;
        if self.count < self.period {
            self.count += 1;
        }
        if self.head == 0 {
            self.resync();
        }
    }

    fn resync(&mut self) {
        self.sum = self.buffer.iter().flatten().sum();
        self.sum_sq = self.buffer.iter().flatten().map(|v| v * v).sum();
    }

    pub fn is_ready(&self) -> bool {
        self.count >= self.period && self.missing == 0
    }

    pub fn mean(&self) -> Option<f64> {
        self.is_ready().then(|| self.sum / self.period as f64)
    }

    /// Sample standard deviation (divisor `period - 1`); `None` for a one-slot window.
    ///
    /// A variance within rounding noise of `sum_sq` is reported as exactly zero.
    pub fn sample_std(&self) -> Option<f64> {
        if self.period < 2 {
            return None;
        }
        let mean = self.mean()?;
        let dof = (self.period - 1) as f64;
        let var = (self.sum_sq - self.sum * mean) / dof;
        let noise = 16.0 * self.period as f64 * f64::EPSILON * self.sum_sq / dof;
        Some(if var <= noise { 0.0 } else { var.sqrt() })
    }
}

/// Z-score each value against the `window` values strictly before it.
///
/// A row is `None` when its own value is missing, when fewer than `window`
/// complete prior values exist, or when the trailing std is below [`MIN_STD`].
pub fn trailing_zscore(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let mut trailing = TrailingWindow::new(window);
    values
        .iter()
        .map(|&value| {
            let z = match (value, trailing.mean(), trailing.sample_std()) {
                (Some(x), Some(mean), Some(std)) if std > MIN_STD => {
                    Some((x - mean) / std).filter(|z| z.is_finite())
                }
                _ => None,
            };
            trailing.push(value);
            z
        })
        .collect()
}

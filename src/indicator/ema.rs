/// Exponential Moving Average, recursive form.
///
/// The first pushed value seeds the recursion directly (pandas
/// `ewm(span, adjust=False)` semantics), so every push yields a value and
/// the output sequence stays index-aligned with the input.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    multiplier: f64,
    ema: Option<f64>,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "EMA period must be > 0");
        Self {
            period,
            multiplier: 2.0 / (period as f64 + 1.0),
            ema: None,
        }
    }

    /// Push a new value and return the updated EMA.
    pub fn push(&mut self, value: f64) -> f64 {
        let new_ema = match self.ema {
            Some(prev) => (value - prev) * self.multiplier + prev,
            None => value,
        };
        self.ema = Some(new_ema);
        new_ema
    }

    pub fn value(&self) -> Option<f64> {
        self.ema
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_push_seeds_from_value() {
        let mut ema = Ema::new(20);
        assert_eq!(ema.value(), None);
        assert!((ema.push(100.0) - 100.0).abs() < f64::EPSILON);
        assert!((ema.value().unwrap() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn recursive_update() {
        // period 3 -> multiplier 0.5
        let mut ema = Ema::new(3);
        ema.push(2.0);
        assert!((ema.push(4.0) - 3.0).abs() < f64::EPSILON);
        assert!((ema.push(5.0) - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn constant_input_is_fixed_point() {
        let mut ema = Ema::new(20);
        for _ in 0..50 {
            assert!((ema.push(42.0) - 42.0).abs() < 1e-12);
        }
    }

    #[test]
    #[should_panic(expected = "EMA period must be > 0")]
    fn zero_period_panics() {
        Ema::new(0);
    }
}

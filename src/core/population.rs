/// Running statistics over a population of unsigned values: count,
/// average, min, max and standard deviation.
#[derive(Debug, Default, Clone)]
pub struct Population {
    count: u64,
    min: u64,
    max: u64,
    sum: f64,
    sum_sq: f64,
}

impl Population {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, value: u64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        self.sum += value as f64;
        self.sum_sq += (value as f64) * (value as f64);
    }

    #[allow(dead_code)]
    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn min(&self) -> u64 {
        self.min
    }

    pub fn max(&self) -> u64 {
        self.max
    }

    pub fn avg(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    pub fn dev(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let mean = self.sum / self.count as f64;
        let variance = (self.sum_sq / self.count as f64 - mean * mean).max(0.0);
        variance.sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::Population;

    #[test]
    fn test_empty_population() {
        let pop = Population::new();
        assert_eq!(pop.count(), 0);
        assert_eq!(pop.avg(), 0.0);
        assert_eq!(pop.dev(), 0.0);
    }

    #[test]
    fn test_population_statistics() {
        let mut pop = Population::new();
        for value in [2, 4, 4, 4, 5, 5, 7, 9] {
            pop.insert(value);
        }
        assert_eq!(pop.count(), 8);
        assert_eq!(pop.min(), 2);
        assert_eq!(pop.max(), 9);
        assert!((pop.avg() - 5.0).abs() < 1e-9);
        assert!((pop.dev() - 2.0).abs() < 1e-9);
    }
}

//! Shot sampling results

use std::collections::HashMap;
use std::fmt;

/// Classical register outcomes tallied over repeated runs
///
/// Each outcome key renders the dits of the classical register in order,
/// one character per dit when every dit is below 10 and comma-separated
/// otherwise. Basis measurements store column indices up to `d^k - 1`, so the
/// width of a dit is not bounded by `d`.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementCounts {
    counts: HashMap<String, usize>,
    total_shots: usize,
}

impl MeasurementCounts {
    /// Empty tally
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
            total_shots: 0,
        }
    }

    /// Render a dit vector as an outcome key
    pub fn key(dits: &[usize]) -> String {
        if dits.iter().all(|&dit| dit < 10) {
            dits.iter().map(|dit| dit.to_string()).collect()
        } else {
            dits.iter().map(|dit| dit.to_string()).collect::<Vec<_>>().join(",")
        }
    }

    /// Record one shot
    pub fn record(&mut self, outcome: String) {
        *self.counts.entry(outcome).or_insert(0) += 1;
        self.total_shots += 1;
    }

    /// Times `outcome` was observed
    pub fn get(&self, outcome: &str) -> usize {
        self.counts.get(outcome).copied().unwrap_or(0)
    }

    /// Observed frequency of `outcome`
    pub fn probability(&self, outcome: &str) -> f64 {
        if self.total_shots == 0 {
            0.0
        } else {
            self.get(outcome) as f64 / self.total_shots as f64
        }
    }

    pub fn counts(&self) -> &HashMap<String, usize> {
        &self.counts
    }

    pub fn total_shots(&self) -> usize {
        self.total_shots
    }

    /// Number of distinct outcomes observed
    pub fn num_outcomes(&self) -> usize {
        self.counts.len()
    }

    /// Most frequent outcome; ties resolve to the smallest key
    pub fn most_common(&self) -> Option<(&str, usize)> {
        self.sorted().into_iter().next()
    }

    /// Outcomes by descending count, then ascending key
    pub fn sorted(&self) -> Vec<(&str, usize)> {
        let mut sorted: Vec<_> = self.counts.iter().map(|(k, &n)| (k.as_str(), n)).collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        sorted
    }
}

impl Default for MeasurementCounts {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MeasurementCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Measurement Counts ({} shots):", self.total_shots)?;

        let sorted = self.sorted();
        for (outcome, count) in sorted.iter().take(10) {
            writeln!(f, "  {}: {} ({:.2}%)", outcome, count, self.probability(outcome) * 100.0)?;
        }
        if sorted.len() > 10 {
            writeln!(f, "  ... and {} more outcomes", sorted.len() - 10)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_record_and_get() {
        let mut counts = MeasurementCounts::new();
        for key in ["00", "11", "00", "01"] {
            counts.record(key.to_string());
        }
        assert_eq!(counts.get("00"), 2);
        assert_eq!(counts.get("10"), 0);
        assert_eq!(counts.total_shots(), 4);
        assert_eq!(counts.num_outcomes(), 3);
        assert_relative_eq!(counts.probability("00"), 0.5);
        assert_eq!(counts.most_common(), Some(("00", 2)));
    }

    #[test]
    fn test_sorted_breaks_ties_by_key() {
        let mut counts = MeasurementCounts::new();
        counts.record("2".to_string());
        counts.record("1".to_string());
        assert_eq!(counts.sorted(), vec![("1", 1), ("2", 1)]);
    }

    #[test]
    fn test_key_rendering() {
        assert_eq!(MeasurementCounts::key(&[1, 0, 2]), "102");
        assert_eq!(MeasurementCounts::key(&[11, 0]), "11,0");
        assert_eq!(MeasurementCounts::key(&[]), "");
    }

    #[test]
    fn test_multi_digit_keys_stay_distinct() {
        assert_eq!(MeasurementCounts::key(&[1, 11]), "1,11");
        assert_eq!(MeasurementCounts::key(&[11, 1]), "11,1");
        assert_ne!(MeasurementCounts::key(&[1, 11]), MeasurementCounts::key(&[11, 1]));
        assert_ne!(MeasurementCounts::key(&[1, 1, 1]), MeasurementCounts::key(&[1, 11]));
    }

    #[test]
    fn test_empty_probability() {
        let counts = MeasurementCounts::default();
        assert_eq!(counts.probability("0"), 0.0);
        assert!(counts.most_common().is_none());
        assert!(counts.to_string().contains("0 shots"));
    }
}

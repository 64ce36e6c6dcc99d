//! Symbol frequency analysis.

use std::collections::BTreeMap;

/// Occurrence count per distinct symbol, ordered by symbol value.
///
/// Every stored count is at least 1.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<char, u64>,
}

impl FrequencyTable {
    /// Build a table from explicit `(symbol, count)` pairs.
    ///
    /// Zero counts are skipped and repeated symbols are summed, saturating at `u64::MAX`.
    pub fn from_counts<I: IntoIterator<Item = (char, u64)>>(counts: I) -> Self {
        let mut table = Self::default();
        for (symbol, count) in counts {
            if count > 0 {
                let entry = table.counts.entry(symbol).or_insert(0);
                *entry = entry.saturating_add(count);
            }
        }
        table
    }

    /// Count of `symbol`, if present.
    pub fn get(&self, symbol: char) -> Option<u64> {
        self.counts.get(&symbol).copied()
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// True if no symbol was seen.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts (the input length), saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.counts.values().fold(0u64, |acc, &c| acc.saturating_add(c))
    }

    /// `(symbol, count)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (char, u64)> + '_ {
        self.counts.iter().map(|(&s, &c)| (s, c))
    }
}

/// Count every symbol of `symbols` in a single pass.
pub fn count_frequencies(symbols: &[char]) -> FrequencyTable {
    let counts = symbols.iter().fold(BTreeMap::new(), |mut acc, &symbol| {
        *acc.entry(symbol).or_insert(0u64) += 1;
        acc
    });
    FrequencyTable { counts }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_count_aaabbc() {
        let symbols: Vec<char> = "aaabbc".chars().collect();
        let freq = count_frequencies(&symbols);
        assert_eq!(freq.len(), 3);
        assert_eq!(freq.get('a'), Some(3));
        assert_eq!(freq.get('b'), Some(2));
        assert_eq!(freq.get('c'), Some(1));
        assert_eq!(freq.get('d'), None);
        assert_eq!(freq.total(), 6);
    }

    #[test]
    fn test_empty_input() {
        let freq = count_frequencies(&[]);
        assert!(freq.is_empty());
        assert_eq!(freq.total(), 0);
    }

    #[test]
    fn test_from_counts_skips_zero_and_merges() {
        let freq = FrequencyTable::from_counts([('x', 0), ('y', 2), ('y', 3)]);
        assert_eq!(freq.len(), 1);
        assert_eq!(freq.get('y'), Some(5));
    }

    #[test]
    fn test_from_counts_saturates() {
        let freq = FrequencyTable::from_counts([('a', u64::MAX), ('a', 7), ('b', 1)]);
        assert_eq!(freq.get('a'), Some(u64::MAX));
        assert_eq!(freq.total(), u64::MAX);
    }

    #[test]
    fn test_iter_in_symbol_order() {
        let symbols: Vec<char> = "zebra".chars().collect();
        let order: Vec<char> = count_frequencies(&symbols).iter().map(|(s, _)| s).collect();
        assert_eq!(order, vec!['a', 'b', 'e', 'r', 'z']);
    }

    proptest! {
        #[test]
        fn prop_total_equals_length(text in ".{0,200}") {
            let symbols: Vec<char> = text.chars().collect();
            let freq = count_frequencies(&symbols);
            prop_assert_eq!(freq.total(), symbols.len() as u64);
            prop_assert!(freq.iter().all(|(_, c)| c >= 1));
        }
    }
}

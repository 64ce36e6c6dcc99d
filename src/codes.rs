//! Prefix code extraction and the code table.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::tree::MergeNode;

/// A bit path from the root to a leaf. Each element is 0 (left) or 1 (right).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code(Vec<u8>);

impl Code {
    /// Build a code from 0/1 values.
    ///
    /// # Errors
    /// Returns `Error::Decode` if `bits` is empty or holds a value other than 0 or 1.
    pub fn from_bits(bits: Vec<u8>) -> Result<Self> {
        if bits.is_empty() {
            return Err(Error::Decode("empty code".into()));
        }
        if let Some(bad) = bits.iter().find(|&&b| b > 1) {
            return Err(Error::Decode(format!("bit value {bad} is not 0 or 1")));
        }
        Ok(Self(bits))
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for the zero-length path. Never true for a code in a `CodeTable`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Bits in transmission order.
    pub fn bits(&self) -> &[u8] {
        &self.0
    }

    /// True if `self` is a (non-strict) prefix of `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.0.starts_with(&self.0)
    }

    /// The zero-length path at the root of a merge tree.
    fn root() -> Code {
        Code(Vec::new())
    }

    fn child(&self, bit: u8) -> Code {
        let mut bits = Vec::with_capacity(self.0.len() + 1);
        bits.extend_from_slice(&self.0);
        bits.push(bit);
        Code(bits)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit == 0 { "0" } else { "1" })?;
        }
        Ok(())
    }
}

impl FromStr for Code {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let bits = s
            .chars()
            .map(|c| match c {
                '0' => Ok(0),
                '1' => Ok(1),
                other => Err(Error::Decode(format!("invalid code character {other:?}"))),
            })
            .collect::<Result<Vec<u8>>>()?;
        Self::from_bits(bits)
    }
}

/// Symbol to code mapping, ordered by symbol value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<char, Code>,
}

impl CodeTable {
    /// Build a table from `(symbol, code)` pairs, e.g. parsed from a code table file.
    ///
    /// # Errors
    /// Returns `Error::InvalidTree` on a repeated symbol or if the codes are not prefix-free.
    pub fn from_entries<I: IntoIterator<Item = (char, Code)>>(entries: I) -> Result<Self> {
        let mut codes = BTreeMap::new();
        for (symbol, code) in entries {
            if code.is_empty() {
                return Err(Error::InvalidTree(format!("symbol {symbol:?} has an empty code")));
            }
            if codes.insert(symbol, code).is_some() {
                return Err(Error::InvalidTree(format!("symbol {symbol:?} appears twice")));
            }
        }
        let table = Self { codes };
        if !table.is_prefix_free() {
            let mut symbols: Vec<char> = conflicting_symbols(&table).into_iter().collect();
            symbols.sort_unstable();
            return Err(Error::InvalidTree(format!(
                "codes are not prefix-free, conflicting symbols: {symbols:?}"
            )));
        }
        Ok(table)
    }

    /// Code for `symbol`.
    pub fn get(&self, symbol: char) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    /// Number of symbols.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// True if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// `(symbol, code)` pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (char, &Code)> + '_ {
        self.codes.iter().map(|(&s, c)| (s, c))
    }

    /// Length of the longest code, 0 for an empty table.
    pub fn max_code_len(&self) -> usize {
        self.codes.values().map(Code::len).max().unwrap_or(0)
    }

    /// True if no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        // After sorting, a prefix sorts immediately before some code it prefixes,
        // so checking neighbours is enough.
        let mut sorted: Vec<&Code> = self.codes.values().collect();
        sorted.sort();
        sorted.windows(2).all(|w| !w[0].is_prefix_of(w[1]))
    }

    /// Total encoded length in bits: Σ frequency × code length.
    ///
    /// Symbols missing from the table contribute nothing. Saturates at `u64::MAX`.
    pub fn weighted_length(&self, frequencies: &FrequencyTable) -> u64 {
        frequencies
            .iter()
            .filter_map(|(s, f)| self.get(s).map(|c| f.saturating_mul(c.len() as u64)))
            .fold(0u64, u64::saturating_add)
    }
}

/// Walk `root` depth-first and assign each leaf its path (left = 0, right = 1).
///
/// A tree that is a single leaf gets the one-bit code `0`, since an empty code
/// cannot be told apart in a packed stream.
///
/// # Errors
/// Returns `Error::InvalidTree` if a symbol sits at two leaves or an internal
/// weight is not the sum of its children.
pub fn extract_codes(root: &MergeNode) -> Result<CodeTable> {
    let mut codes = BTreeMap::new();
    match root {
        MergeNode::Leaf { symbol, .. } => {
            codes.insert(*symbol, Code(vec![0]));
        }
        MergeNode::Internal { .. } => walk(root, Code::root(), &mut codes)?,
    }
    Ok(CodeTable { codes })
}

fn walk(node: &MergeNode, path: Code, codes: &mut BTreeMap<char, Code>) -> Result<()> {
    match node {
        MergeNode::Leaf { symbol, .. } => {
            if codes.insert(*symbol, path).is_some() {
                return Err(Error::InvalidTree(format!(
                    "symbol {symbol:?} appears at more than one leaf"
                )));
            }
            Ok(())
        }
        MergeNode::Internal {
            weight,
            left,
            right,
        } => {
            let children = left.weight().checked_add(right.weight());
            if children != Some(*weight) {
                return Err(Error::InvalidTree(format!(
                    "internal node at {path} has weight {weight}, children are {} and {}",
                    left.weight(),
                    right.weight()
                )));
            }
            walk(left, path.child(0), codes)?;
            walk(right, path.child(1), codes)
        }
    }
}

/// Symbols that share a code prefix with another symbol. Empty for a valid table.
fn conflicting_symbols(table: &CodeTable) -> HashSet<char> {
    let mut out = HashSet::new();
    for (a, ca) in table.iter() {
        for (b, cb) in table.iter() {
            if a != b && ca.is_prefix_of(cb) {
                out.insert(a);
                out.insert(b);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::count_frequencies;
    use crate::tree::build_tree;
    use proptest::prelude::*;

    fn codes_for(text: &str) -> CodeTable {
        let symbols: Vec<char> = text.chars().collect();
        extract_codes(&build_tree(&count_frequencies(&symbols)).unwrap()).unwrap()
    }

    #[test]
    fn test_aaabbc_codes() {
        let table = codes_for("aaabbc");
        assert_eq!(table.get('a').unwrap().to_string(), "0");
        assert_eq!(table.get('c').unwrap().to_string(), "10");
        assert_eq!(table.get('b').unwrap().to_string(), "11");
        assert!(table.is_prefix_free());
        assert_eq!(table.max_code_len(), 2);
    }

    #[test]
    fn test_single_symbol_gets_one_bit() {
        let table = codes_for("aaaa");
        assert_eq!(table.len(), 1);
        assert_eq!(table.get('a').unwrap().to_string(), "0");
    }

    #[test]
    fn test_duplicate_leaf_is_invalid_tree() {
        let root = MergeNode::Internal {
            weight: 2,
            left: Box::new(MergeNode::Leaf { symbol: 'x', weight: 1 }),
            right: Box::new(MergeNode::Leaf { symbol: 'x', weight: 1 }),
        };
        assert!(matches!(extract_codes(&root), Err(Error::InvalidTree(_))));
    }

    #[test]
    fn test_weight_mismatch_is_invalid_tree() {
        let root = MergeNode::Internal {
            weight: 5,
            left: Box::new(MergeNode::Leaf { symbol: 'x', weight: 1 }),
            right: Box::new(MergeNode::Leaf { symbol: 'y', weight: 1 }),
        };
        assert!(matches!(extract_codes(&root), Err(Error::InvalidTree(_))));
    }

    #[test]
    fn test_overflowing_children_are_invalid_tree() {
        let root = MergeNode::Internal {
            weight: 0,
            left: Box::new(MergeNode::Leaf { symbol: 'x', weight: u64::MAX }),
            right: Box::new(MergeNode::Leaf { symbol: 'y', weight: 1 }),
        };
        assert!(matches!(extract_codes(&root), Err(Error::InvalidTree(_))));
    }

    #[test]
    fn test_codes_are_never_empty() {
        assert!(Code::from_bits(Vec::new()).is_err());
        assert!(matches!(
            CodeTable::from_entries([('a', Code::root())]),
            Err(Error::InvalidTree(_))
        ));
    }

    #[test]
    fn test_weighted_length_saturates() {
        let freq = FrequencyTable::from_counts([('a', u64::MAX), ('b', u64::MAX)]);
        let table = CodeTable::from_entries([
            ('a', "0".parse::<Code>().unwrap()),
            ('b', "1".parse::<Code>().unwrap()),
        ])
        .unwrap();
        assert_eq!(table.weighted_length(&freq), u64::MAX);
    }

    #[test]
    fn test_from_entries_rejects_prefix() {
        let entries = [
            ('a', "0".parse::<Code>().unwrap()),
            ('b', "01".parse::<Code>().unwrap()),
        ];
        assert!(matches!(
            CodeTable::from_entries(entries),
            Err(Error::InvalidTree(_))
        ));
    }

    #[test]
    fn test_code_parse() {
        let code: Code = "1011".parse().unwrap();
        assert_eq!(code.bits(), &[1, 0, 1, 1]);
        assert!("".parse::<Code>().is_err());
        assert!("102".parse::<Code>().is_err());
    }

    #[test]
    fn test_weighted_length() {
        let symbols: Vec<char> = "aaabbc".chars().collect();
        let freq = count_frequencies(&symbols);
        let table = codes_for("aaabbc");
        assert_eq!(table.weighted_length(&freq), 9);
    }

    proptest! {
        #[test]
        fn prop_codes_prefix_free(text in "[a-z0-9 ]{1,300}") {
            let table = codes_for(&text);
            prop_assert!(table.is_prefix_free());
            prop_assert!(conflicting_symbols(&table).is_empty());
            prop_assert!(table.iter().all(|(_, c)| !c.is_empty()));
        }
    }
}

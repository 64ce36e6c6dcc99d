//! Reversal of the bit packing.

use std::collections::HashMap;

use crate::codes::{Code, CodeTable};
use crate::error::{Error, Result};
use crate::pack::PackedStream;

/// Decode `packed` back into symbols using `codes`.
///
/// Only the significant bits are read, and decoding stops after exactly
/// `packed.symbol_count()` symbols.
///
/// # Errors
/// Returns `Error::Decode` if the bits run out before every symbol is
/// decoded, if a path grows longer than any code, or if significant bits
/// remain after the last symbol.
pub fn decode(packed: &PackedStream, codes: &CodeTable) -> Result<Vec<char>> {
    let expected = packed.symbol_count();
    if packed.is_empty() {
        return Ok(Vec::new());
    }
    if codes.is_empty() {
        return Err(Error::Decode(format!(
            "{expected} symbols packed but the code table is empty"
        )));
    }

    let lookup: HashMap<&[u8], char> = codes.iter().map(|(s, c)| (c.bits(), s)).collect();
    let max_len = codes.max_code_len();
    let total_bits = packed.total_bits();

    let mut out = Vec::with_capacity(expected.min(total_bits) as usize);
    let mut path: Vec<u8> = Vec::with_capacity(max_len);
    let mut index = 0u64;

    while (out.len() as u64) < expected {
        if index >= total_bits {
            return Err(Error::Decode(format!(
                "bits exhausted after {} of {expected} symbols (pending path {:?})",
                out.len(),
                path_string(&path)
            )));
        }
        path.push(packed.bit(index));
        index += 1;

        if let Some(&symbol) = lookup.get(path.as_slice()) {
            out.push(symbol);
            path.clear();
        } else if path.len() >= max_len {
            return Err(Error::Decode(format!(
                "bit path {} at bit {index} matches no code",
                path_string(&path)
            )));
        }
    }

    if index != total_bits {
        return Err(Error::Decode(format!(
            "{} significant bits left after {expected} symbols",
            total_bits - index
        )));
    }

    Ok(out)
}

fn path_string(path: &[u8]) -> String {
    Code::from_bits(path.to_vec())
        .map(|c| c.to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::extract_codes;
    use crate::frequency::count_frequencies;
    use crate::pack::pack;
    use crate::tree::build_tree;
    use proptest::prelude::*;

    fn roundtrip(text: &str) -> Vec<char> {
        let symbols: Vec<char> = text.chars().collect();
        let codes = extract_codes(&build_tree(&count_frequencies(&symbols)).unwrap()).unwrap();
        let packed = pack(&symbols, &codes).unwrap();
        decode(&packed, &codes).unwrap()
    }

    #[test]
    fn test_huffman_roundtrip() {
        let data = "abracadabra";
        assert_eq!(roundtrip(data), data.chars().collect::<Vec<_>>());
    }

    #[test]
    fn test_single_symbol_uses_symbol_count() {
        assert_eq!(roundtrip("aaaa"), vec!['a'; 4]);
    }

    #[test]
    fn test_padding_not_read_as_symbols() {
        // 'a' has code 0, and the last byte holds 7 zero padding bits.
        let symbols: Vec<char> = "aaabbc".chars().collect();
        let codes = extract_codes(&build_tree(&count_frequencies(&symbols)).unwrap()).unwrap();
        let packed = pack(&symbols, &codes).unwrap();
        assert_eq!(packed.padding_bits(), 7);
        assert_eq!(decode(&packed, &codes).unwrap(), symbols);
    }

    #[test]
    fn test_empty_stream() {
        let decoded = decode(&PackedStream::default(), &CodeTable::default()).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_overstated_symbol_count_fails() {
        let symbols: Vec<char> = "aaabbc".chars().collect();
        let codes = extract_codes(&build_tree(&count_frequencies(&symbols)).unwrap()).unwrap();
        let packed = pack(&symbols, &codes).unwrap();
        let tampered =
            PackedStream::from_parts(packed.bytes().to_vec(), packed.valid_bits_in_last_byte(), 7)
                .unwrap();
        assert!(matches!(decode(&tampered, &codes), Err(Error::Decode(_))));
    }

    #[test]
    fn test_understated_symbol_count_fails() {
        let symbols: Vec<char> = "aaabbc".chars().collect();
        let codes = extract_codes(&build_tree(&count_frequencies(&symbols)).unwrap()).unwrap();
        let packed = pack(&symbols, &codes).unwrap();
        let tampered =
            PackedStream::from_parts(packed.bytes().to_vec(), packed.valid_bits_in_last_byte(), 5)
                .unwrap();
        assert!(matches!(decode(&tampered, &codes), Err(Error::Decode(_))));
    }

    #[test]
    fn test_unmatched_path_fails() {
        let codes = CodeTable::from_entries([
            ('a', "0".parse::<Code>().unwrap()),
            ('b', "10".parse::<Code>().unwrap()),
        ])
        .unwrap();
        // 11 matches nothing.
        let packed = PackedStream::from_parts(vec![0b1100_0000], 2, 1).unwrap();
        assert!(matches!(decode(&packed, &codes), Err(Error::Decode(_))));
    }

    #[test]
    fn test_empty_table_with_data_fails() {
        let packed = PackedStream::from_parts(vec![0], 1, 1).unwrap();
        assert!(decode(&packed, &CodeTable::default()).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_roundtrip(text in "\\PC{1,200}") {
            prop_assert_eq!(roundtrip(&text), text.chars().collect::<Vec<_>>());
        }
    }
}

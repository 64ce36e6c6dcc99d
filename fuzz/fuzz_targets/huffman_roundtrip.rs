#![no_main]
use huffpack::artifact::{decode_packed, encode_packed, format_code_table, parse_code_table};
use huffpack::{decode, encode, SourceText};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes as a packed file must either be rejected or decode
    // against a real table without panicking.
    if let Ok(packed) = decode_packed(&mut &data[..]) {
        let codes = encode(&SourceText::new("etaoin shrdlu"))
            .unwrap()
            .codes;
        if let Ok(symbols) = decode(&packed, &codes) {
            assert_eq!(symbols.chars().count() as u64, packed.symbol_count());
        }
    }

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let encoded = encode(&SourceText::new(text)).unwrap();

    let mut buf = Vec::new();
    encode_packed(&mut buf, &encoded.packed).unwrap();
    let packed = decode_packed(&mut buf.as_slice()).unwrap();
    let codes = parse_code_table(&format_code_table(&encoded.codes)).unwrap();

    assert_eq!(decode(&packed, &codes).unwrap(), text);
});

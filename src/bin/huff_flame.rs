use huffpack::{decode, encode, SourceText};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), huffpack::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let text: String = (0..100_000)
        .map(|i| match i % 7 {
            0..=2 => 'e',
            3 => 't',
            4 => ' ',
            _ => char::from(b'a' + (i % 26) as u8),
        })
        .collect();
    let source = SourceText::new(&text);

    let mut total_bytes = 0usize;
    for _ in 0..200 {
        let encoded = encode(&source)?;
        let decoded = decode(&encoded.packed, &encoded.codes)?;
        assert_eq!(decoded.len(), text.len());
        total_bytes += encoded.packed.bytes().len();
    }
    info!(total_bytes, "done");
    Ok(())
}

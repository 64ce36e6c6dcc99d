use criterion::{criterion_group, criterion_main, Criterion};
use huffpack::{
    build_tree, count_frequencies, decode, encode, extract_codes, pack, SourceText,
};

fn corpus() -> String {
    // Skewed alphabet so code lengths differ.
    (0..20_000)
        .map(|i| match i % 10 {
            0..=4 => 'e',
            5..=6 => 't',
            7 => 'a',
            8 => ' ',
            _ => char::from(b'a' + (i % 26) as u8),
        })
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("huffman_encode");
    let source = SourceText::new(&corpus());

    group.bench_function("count_frequencies", |b| {
        b.iter(|| count_frequencies(source.symbols()))
    });

    let freq = count_frequencies(source.symbols());
    group.bench_function("build_codes", |b| {
        b.iter(|| extract_codes(&build_tree(&freq).unwrap()).unwrap())
    });

    let codes = extract_codes(&build_tree(&freq).unwrap()).unwrap();
    group.bench_function("pack", |b| b.iter(|| pack(source.symbols(), &codes).unwrap()));

    group.bench_function("full", |b| b.iter(|| encode(&source).unwrap()));
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("huffman_decode");
    let encoded = encode(&SourceText::new(&corpus())).unwrap();

    group.bench_function("decode", |b| {
        b.iter(|| decode(&encoded.packed, &encoded.codes).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);

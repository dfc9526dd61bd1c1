use criterion::{criterion_group, criterion_main};


criterion_group!(
    benches,
    parser::bench_parse_number,
    parser::bench_split,
    shell::bench_execute,
    shell::bench_typing
);
criterion_main!(benches);

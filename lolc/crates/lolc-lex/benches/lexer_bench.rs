//! Lexer benchmarks.
//!
//! Run with: `cargo bench --package lolc-lex`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use lolc_lex::lex;

fn token_count(source: &[u8]) -> usize {
    lex(source).len()
}

fn bench_lexer_statements(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer");

    let source = b"HAI 1.2\nI HAS A x ITZ NUMBER\nx R SUM OF 1 AN 2\nVISIBLE x\nKTHXBYE\n";
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("minimal_program", |b| {
        b.iter(|| token_count(black_box(b"HAI 1.2\nKTHXBYE\n")))
    });

    group.bench_function("arithmetic_program", |b| {
        b.iter(|| token_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_heavy(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_heavy");

    // Many statements with strings and comments.
    let mut source = String::from("HAI 1.2\n");
    for i in 0..200 {
        source.push_str(&format!(
            "I HAS A var{i} ITZ NUMBER, var{i} R {i} BTW trailing\n"
        ));
        source.push_str("VISIBLE \"teh result:)\"!\n");
    }
    source.push_str("KTHXBYE\n");

    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("200_statements", |b| {
        b.iter(|| token_count(black_box(source.as_bytes())))
    });

    group.finish();
}

criterion_group!(benches, bench_lexer_statements, bench_lexer_heavy);
criterion_main!(benches);

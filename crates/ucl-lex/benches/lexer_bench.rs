//! Lexer benchmarks.
//!
//! Run with: `cargo bench --package ucl-lex`

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use ucl_lex::{Lexer, Token};

fn token_count(source: &[u8]) -> usize {
    let mut lexer = Lexer::new(source);
    let mut count = 0;
    loop {
        match lexer.next_token() {
            Ok(Token::Eof) => break,
            Ok(_) => count += 1,
            Err(_) => break,
        }
    }
    count
}

fn bench_lexer_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_document");

    let source = br#"
        server {
            host = "0.0.0.0";
            port = 8080;
            timeout = 30s;
            max_body = 10mb;
        }
        backends [
            { name = primary; weight = 10; }
            { name = backup; weight = 1; }
        ]
    "#;
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("small_document", |b| {
        b.iter(|| token_count(black_box(source)))
    });

    group.finish();
}

fn bench_lexer_numbers(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_numbers");

    group.bench_function("plain_integer", |b| {
        b.iter(|| token_count(black_box(b"123456;")))
    });
    group.bench_function("time_suffix", |b| {
        b.iter(|| token_count(black_box(b"500ms;")))
    });
    group.bench_function("size_suffix", |b| {
        b.iter(|| token_count(black_box(b"10mb;")))
    });
    group.bench_function("backtrack_to_bare_string", |b| {
        b.iter(|| token_count(black_box(b"10potatoes;")))
    });

    group.finish();
}

fn bench_lexer_strings(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_strings");

    group.bench_function("short_quoted", |b| {
        b.iter(|| token_count(black_box(br#""hello";"#)))
    });
    group.bench_function("escaped_quoted", |b| {
        b.iter(|| token_count(black_box(br#""a\nb\tcé";"#)))
    });
    group.bench_function("bare_string", |b| {
        b.iter(|| token_count(black_box(b"hello world;")))
    });
    group.bench_function("heredoc", |b| {
        b.iter(|| token_count(black_box(b"<<EOF\nline one\nline two\nEOF\n")))
    });

    group.finish();
}

fn bench_lexer_comments(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_comments");

    group.bench_function("line_comment", |b| {
        b.iter(|| token_count(black_box(b"# comment\nkey = 1;")))
    });
    group.bench_function("nested_block_comment", |b| {
        b.iter(|| token_count(black_box(b"/* outer /* inner */ outer */key = 1;")))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_lexer_document,
    bench_lexer_numbers,
    bench_lexer_strings,
    bench_lexer_comments
);
criterion_main!(benches);

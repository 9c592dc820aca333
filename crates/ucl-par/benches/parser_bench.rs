//! Parser benchmarks. Run with `cargo bench --package ucl-par`.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use ucl_par::{Parser, ParserFlags};

fn parse_source(source: &str) {
    let mut parser = Parser::new(ParserFlags::empty());
    parser.add_string(source).expect("benchmark input must parse");
}

fn bench_flat_object(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_flat_object");

    let source = r#"
        name = "example";
        port = 8080;
        timeout = 30s;
        enabled = true;
        ratio = 0.75;
    "#;
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("flat_object", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_nested_objects(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_nested_objects");

    let source = r#"
        server {
            host = "0.0.0.0";
            port = 8080;
            tls {
                cert = "/etc/ssl/cert.pem";
                key = "/etc/ssl/key.pem";
            }
        }
        logging {
            level = "info";
            outputs = ["stdout", "file"];
        }
    "#;
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("nested_objects", |b| b.iter(|| parse_source(black_box(source))));

    group.finish();
}

fn bench_repeated_keys(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_repeated_keys");

    let source = (0..50)
        .map(|i| format!("worker = \"node-{i}\";\n"))
        .collect::<String>();
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("repeated_keys", |b| b.iter(|| parse_source(black_box(&source))));

    group.finish();
}

fn bench_arrays(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_arrays");

    let items: Vec<String> = (0..200).map(|i| i.to_string()).collect();
    let source = format!("values = [{}];", items.join(", "));
    group.throughput(Throughput::Bytes(source.len() as u64));
    group.bench_function("large_array", |b| b.iter(|| parse_source(black_box(&source))));

    group.finish();
}

criterion_group!(
    benches,
    bench_flat_object,
    bench_nested_objects,
    bench_repeated_keys,
    bench_arrays
);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ton_format::{parse, serialize_with_options, validate, SerializeOptions};

const SMALL_DOC: &str = "{(User) id = 123, name = 'Alice', email = 'alice@example.com', active = true}";

const RICH_DOC: &str = "#@ tonVersion = '1'
{(Server)
    host = 'db01.internal',
    port = 5432,
    flags = 0b1011,
    limit = 0xFF,
    id = 550e8400-e29b-41d4-a716-446655440000,
    started = ^'2024-01-15T10:30:00Z',
    status = |active|,
    tags = |primary|replica|,
    pools = [
        {name = 'read', size = 8},
        {name = 'write', size = 4}
    ]
}
#! enum(status) [active, inactive, draining]
#! {(Server) /host = string(required), /port = int(min(1), max(65535))}";

fn make_wide_doc(properties: usize) -> String {
    let mut text = String::from("{");
    for i in 0..properties {
        if i > 0 {
            text.push_str(", ");
        }
        text.push_str(&format!("key{} = 'value{}'", i, i));
    }
    text.push('}');
    text
}

fn benchmark_parse(c: &mut Criterion) {
    c.bench_function("parse_small", |b| {
        b.iter(|| parse(black_box(SMALL_DOC)).unwrap());
    });
    c.bench_function("parse_rich", |b| {
        b.iter(|| parse(black_box(RICH_DOC)).unwrap());
    });
}

fn benchmark_parse_wide(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_wide");
    for size in [10, 100, 1000] {
        let text = make_wide_doc(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| parse(black_box(text)).unwrap());
        });
    }
    group.finish();
}

fn benchmark_serialize(c: &mut Criterion) {
    let doc = parse(RICH_DOC).unwrap();
    let pretty = SerializeOptions::pretty();
    let compact = SerializeOptions::compact();

    c.bench_function("serialize_pretty", |b| {
        b.iter(|| serialize_with_options(black_box(&doc), &pretty).unwrap());
    });
    c.bench_function("serialize_compact", |b| {
        b.iter(|| serialize_with_options(black_box(&doc), &compact).unwrap());
    });
}

fn benchmark_validate(c: &mut Criterion) {
    let doc = parse(RICH_DOC).unwrap();
    c.bench_function("validate_rich", |b| {
        b.iter(|| validate(black_box(&doc)));
    });
}

fn benchmark_round_trip(c: &mut Criterion) {
    let options = SerializeOptions::compact();
    c.bench_function("round_trip_rich", |b| {
        b.iter(|| {
            let doc = parse(black_box(RICH_DOC)).unwrap();
            serialize_with_options(&doc, &options).unwrap()
        });
    });
}

criterion_group!(
    benches,
    benchmark_parse,
    benchmark_parse_wide,
    benchmark_serialize,
    benchmark_validate,
    benchmark_round_trip
);
criterion_main!(benches);

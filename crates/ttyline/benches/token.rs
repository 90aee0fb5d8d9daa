use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ttyline::{KeyReader, ReadKey, Token};

const TEXT: &str = "The quick \x1b[1;31mbrown\x1b[0m fox \u{2018}jumps\u{2019} over \
                    the lazy 中文 dog \x1b[A\x1b[1;5D\x1bOP and pays 5\u{20ac}.";

pub fn run_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("token");

    group.bench_function("from_bytes", |b| {
        b.iter(|| {
            let mut bytes = black_box(TEXT.as_bytes());
            let mut count = 0;
            while let Some(token) = Token::from_bytes(bytes) {
                bytes = &bytes[token.len()..];
                count += 1;
            }
            count
        })
    });

    group.bench_function("display_width", |b| {
        b.iter(|| Token::display_width_of(black_box(TEXT.as_bytes())))
    });

    group.bench_function("last_from_bytes", |b| {
        b.iter(|| Token::last_from_bytes(black_box(TEXT.as_bytes())))
    });

    group.bench_function("read_key", |b| {
        b.iter(|| {
            let mut reader = KeyReader::new(black_box(TEXT.as_bytes()));
            let mut count = 0;
            while reader.read_key().is_ok_and(|token| token != Token::EOT) {
                count += 1;
            }
            count
        })
    });

    group.finish();
}

criterion_group!(benches, run_benchmarks);
criterion_main!(benches);

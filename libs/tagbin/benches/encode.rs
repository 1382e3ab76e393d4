#![allow(unused_crate_dependencies)]
use std::hint::black_box;

use criterion::{Bencher, Criterion, criterion_group, criterion_main};
use tagbin::Encoder;
use tagbin::combinator::{Str, list, nullable};

fn bench_lengths(c: &mut Criterion) {
    fn bench(value: usize) -> impl Fn(&mut Bencher<'_>) {
        move |b| {
            b.iter(|| {
                let mut enc = Encoder::with_capacity(4);
                enc.encode_length_uint30(black_box(value))
                    .expect("value must fit");
                enc.into_bytes()
            });
        }
    }

    c.bench_function("uint30_1_byte", bench(63));
    c.bench_function("uint30_2_bytes", bench(16383));
    c.bench_function("uint30_3_bytes", bench(4194303));
    c.bench_function("uint30_4_bytes", bench(1073741823));
}

fn bench_leb128(c: &mut Criterion) {
    c.bench_function("sleb128_i64", |b| {
        b.iter(|| {
            let mut enc = Encoder::with_capacity(16);
            for v in [-1i64, 64, -65, i64::MIN, i64::MAX] {
                enc.encode_varint(black_box(v));
            }
            enc.into_bytes()
        });
    });
}

fn bench_nested(c: &mut Criterion) {
    let names: Vec<Option<String>> = (0..256)
        .map(|i| (i % 3 != 0).then(|| format!("name-{i}")))
        .collect();

    c.bench_function("list_nullable_str", |b| {
        b.iter(|| {
            let mut enc = Encoder::new();
            enc.encode_with(&list(nullable(Str)), black_box(&names))
                .expect("short list");
            enc.into_bytes()
        });
    });
}

criterion_group!(benches, bench_lengths, bench_leb128, bench_nested);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use memolazy::{BoxError, Ident, LazyField, Memoizer};

struct Row {
    id: u64,
}

fn bench_memoized_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("memoized_get");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("hit_1k_keys", |b| {
        let memoizer =
            Memoizer::new(|key: Ident| -> Result<u64, BoxError> { Ok(key.into_raw() as u64) });
        let keys: Vec<Ident> = (1..=1000usize).map(|i| Ident::from_raw(i << 4)).collect();

        // Warm every key so the loop below only measures hits
        for &key in &keys {
            memoizer.get(key).unwrap();
        }

        let mut counter = 0;
        b.iter(|| {
            black_box(memoizer.get(keys[counter % 1000]).unwrap());
            counter += 1;
        });
    });

    group.finish();
}

fn bench_lazy_field_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("lazy_field_get");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    group.bench_function("hit_100_owners", |b| {
        let field: LazyField<Row, u64> = LazyField::new(|row: &Row| Ok(row.id * 2));
        let rows: Vec<Row> = (0..100u64).map(|id| Row { id }).collect();

        for row in &rows {
            field.get(row).unwrap();
        }

        let mut counter = 0;
        b.iter(|| {
            black_box(field.get(&rows[counter % 100]).unwrap());
            counter += 1;
        });
    });

    group.finish();
}

criterion_group!(benches, bench_memoized_get, bench_lazy_field_get);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use polyval::{Backend, FieldElement, Polyval, BLOCK_SIZE, KEY_SIZE};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn criterion_benchmark(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    let key: [u8; KEY_SIZE] = rng.random();

    let mut group = c.benchmark_group("polyval");
    for len in [BLOCK_SIZE, 1024, 16 * 1024] {
        let mut msg = vec![0u8; len];
        rng.fill(msg.as_mut_slice());
        group.throughput(Throughput::Bytes(len as u64));

        for backend in [Backend::detect(), Backend::soft()] {
            group.bench_function(format!("update_{backend}_{len}"), |b| {
                let mut p = Polyval::from_key(&key, backend);
                b.iter(|| {
                    p.update(black_box(&msg)).unwrap();
                    black_box(p.sum())
                })
            });
        }
    }
    group.finish();

    c.bench_function("double", |b| {
        let mut x = FieldElement::from(rng.random::<u128>());
        b.iter(|| {
            x = black_box(x).double();
            x
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);

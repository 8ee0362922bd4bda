use criterion::{criterion_group, criterion_main, Criterion};
use prettyscope::effect::{BLUE, BOLD, GREEN, RED, UNDERLINED};
use prettyscope::opt::{Mirroring, Options};
use prettyscope::{imbue, Registry, Stream};

fn registry() -> Registry {
    Registry::with_writers(
        Options::builder()
            .mirroring(Mirroring::Always)
            .auto_flush(false)
            .build(),
        std::io::sink(),
        std::io::sink(),
    )
}

pub fn run_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("scopes");

    group.bench_function("nested", |b| {
        let registry = registry();
        b.iter(|| {
            let _outer = registry.apply(Stream::Stdout, RED | BOLD);
            let _middle = registry.apply(Stream::Stderr, UNDERLINED);
            let _inner = registry.apply(Stream::Stdout, BLUE);
        })
    });

    group.bench_function("out-of-order", |b| {
        let registry = registry();
        b.iter(|| {
            let guards = [RED, GREEN, BLUE, BOLD]
                .map(|effect| registry.apply(Stream::Stdout, effect));
            let [w, x, y, z] = guards;
            drop(x);
            drop(z);
            drop(w);
            drop(y);
        })
    });

    group.bench_function("render", |b| {
        let registry = registry();
        let _guard = registry.apply(Stream::Stdout, GREEN);
        let text = imbue(BLUE | BOLD, "blue") + " and " + imbue(UNDERLINED, "underlined");
        b.iter(|| registry.render(Stream::Stdout, &text))
    });

    group.finish();
}

criterion_group!(benches, run_benchmarks);
criterion_main!(benches);

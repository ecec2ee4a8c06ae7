use criterion::{Criterion, black_box, criterion_group, criterion_main};
use wordserve::levenshtein;

fn bench_distance(c: &mut Criterion) {
    c.bench_function("levenshtein_short", |b| {
        b.iter(|| levenshtein(black_box("speling"), black_box("spelling")))
    });

    let long_a = "thequickbrownfoxjumpsoverthelazydog".repeat(3);
    let long_b = "thequickbrownfoxjumpedoverthelazycat".repeat(3);
    c.bench_function("levenshtein_max_input", |b| {
        b.iter(|| levenshtein(black_box(&long_a), black_box(&long_b)))
    });
}

criterion_group!(benches, bench_distance);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use reed_lex::tokenize;

const SAMPLE: &str = r#"
# fibonacci
func fib(n) {
    if n < 2 {
        return n;
    }
    return fib(n - 1) + fib(n - 2);
}

define Point {
    x, y
}

p := Point(3, 4);
total := 0;
range i in (0, 100) {
    total += i;
}

print fib(10) + p.x * p.y + total;
"#;

fn bench_tokenize(c: &mut Criterion) {
    c.bench_function("tokenize_sample", |b| {
        b.iter(|| tokenize(black_box(SAMPLE)).unwrap())
    });
}

criterion_group!(benches, bench_tokenize);
criterion_main!(benches);

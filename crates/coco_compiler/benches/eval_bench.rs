//! Benchmark harness for the coco pipeline.
//!
//! Uses criterion for reliable benchmarking.
//! Run with: cargo bench -p coco_compiler

use coco_binder::bind_global_scope;
use coco_compiler::Compilation;
use coco_evaluator::Variables;
use coco_parser::parse;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// Small source for micro-benchmarks.
const SMALL_SOURCE: &str = r#"
{
    var a = 10
    var b = a * 3 + 4
    if b > 30 b = b - 30 else b = b + 1
    b
}
"#;

/// A loop-heavy program exercising lowering, the label map, and goto
/// dispatch in the evaluator.
const LOOP_SOURCE: &str = r#"
{
    var total = 0
    for i = 1 to 1000 {
        if i / 3 * 3 == i continue
        total = total + i
    }
    total
}
"#;

const FUNCTION_SOURCE: &str = r#"
function fib(n: int): int {
    if n <= 1 return n
    return fib(n - 1) + fib(n - 2)
}
fib(15)
"#;

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_small", |b| {
        b.iter(|| parse(black_box(SMALL_SOURCE)));
    });
}

fn bench_bind(c: &mut Criterion) {
    c.bench_function("bind_small", |b| {
        b.iter(|| {
            let tree = parse(black_box(SMALL_SOURCE));
            bind_global_scope(None, &tree)
        });
    });
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    for (name, source) in [
        ("straight_line", SMALL_SOURCE),
        ("counted_loop", LOOP_SOURCE),
        ("recursive_calls", FUNCTION_SOURCE),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), source, |b, source| {
            let compilation = Compilation::new(parse(source));
            b.iter(|| {
                let mut variables = Variables::default();
                black_box(compilation.evaluate(&mut variables))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_parse, bench_bind, bench_evaluate);
criterion_main!(benches);

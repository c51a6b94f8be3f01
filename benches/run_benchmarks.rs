use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lint_fixtures::{lint_document, BuiltinLinter, FixtureRegistry};
use std::hint::black_box;

/// Generate Python-like source mixing clean and offending lines
fn generate_source(functions: usize) -> String {
    let mut content = String::new();

    for i in 0..functions {
        content.push_str(&format!("def handler_{}(request, items):\n", i));
        match i % 4 {
            0 => content.push_str("    unused = request.body\n"),
            1 => content.push_str("    total=len(items)+1\n    return total\n"),
            2 => content.push_str("    print(f\"handling {request}\")\n"),
            _ => content.push_str("    list = [1,2,3]\n    return list\n"),
        }
        content.push_str(&format!(
            "    return {{'id': {}, 'name': request.user.name, 'email': request.user.email, 'items': items}}\n\n",
            i
        ));
    }

    content
}

fn bench_lint_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("lint_document");

    for functions in [10, 100, 1000] {
        let source = generate_source(functions);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(functions),
            &source,
            |b, source| b.iter(|| lint_document(black_box(source), 88)),
        );
    }

    group.finish();
}

fn bench_registry_run(c: &mut Criterion) {
    let mut registry = FixtureRegistry::new();
    registry
        .add_embedded_fixtures()
        .expect("embedded fixtures load");
    for i in 0..50 {
        registry
            .register(format!("generated-{}", i), generate_source(20), vec![])
            .expect("register generated fixture");
    }

    let linter = BuiltinLinter::default();
    c.bench_function("registry_run", |b| {
        b.iter(|| registry.run(black_box(&linter)))
    });
}

criterion_group!(benches, bench_lint_document, bench_registry_run);
criterion_main!(benches);

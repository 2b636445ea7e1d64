//! Layout generation benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vaultcrawl_core::{DocumentGraph, DocumentNode};
use vaultcrawl_procedural::LayoutGenerator;

fn corpus(n: usize) -> DocumentGraph {
    let mut graph = DocumentGraph::new();
    for i in 0..n {
        let id = format!("vault/{:03}/note-{i}.md", i % 37);
        graph.insert_node(DocumentNode::new(id.clone(), id)).unwrap();
    }
    let ids = graph.sorted_ids();
    for (i, id) in ids.iter().enumerate() {
        let target = &ids[(i * 7 + 3) % ids.len()];
        graph.add_link(id, target).unwrap();
    }
    graph
}

fn bench_generate(c: &mut Criterion) {
    let generator = LayoutGenerator::default();
    for n in [100, 1_000, 3_000] {
        let graph = corpus(n);
        c.bench_function(&format!("generate_{n}_documents"), |b| {
            b.iter(|| generator.build_or_reuse(black_box(&graph), None));
        });
    }
}

fn bench_reuse(c: &mut Criterion) {
    let generator = LayoutGenerator::default();
    let graph = corpus(1_000);
    let record = generator.build_or_reuse(&graph, None).map(|l| l.to_persisted());
    c.bench_function("reuse_1000_documents", |b| {
        b.iter(|| generator.build_or_reuse(black_box(&graph), record.as_ref()));
    });
}

criterion_group!(benches, bench_generate, bench_reuse);
criterion_main!(benches);

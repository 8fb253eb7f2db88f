use autolink_core::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn create_names(count: usize) -> NameSet {
    (0..count)
        .map(|i| format!("Entity {i}"))
        .chain(["Paris", "Paris Commune", "Lyon", "New York City"].map(String::from))
        .collect()
}

fn create_article(paragraphs: usize) -> String {
    let paragraph = "The Paris Commune ruled Paris in 1871. {{Infobox|name=Lyon}} \
                     Lyon and Entity 42 appear in <ref>Entity 7, p. 3</ref> and \
                     https://example.org/Entity_9 while New York City __NOTOC__ grew.\n\n";
    paragraph.repeat(paragraphs)
}

fn bench_protect(c: &mut Criterion) {
    let masker = SyntaxMasker::new().unwrap();
    let text = create_article(200);

    c.bench_function("protect 200 paragraphs", |b| {
        b.iter(|| masker.protect(black_box(&text)));
    });
}

fn bench_annotate_small_inventory(c: &mut Criterion) {
    let annotator = Annotator::new().unwrap();
    let terms = TermIndex::from_names(&create_names(100));
    let text = create_article(50);

    c.bench_function("annotate 50 paragraphs / 100 names", |b| {
        b.iter(|| annotator.annotate(black_box(&text), &terms));
    });
}

fn bench_annotate_large_inventory(c: &mut Criterion) {
    let annotator = Annotator::new().unwrap();
    let terms = TermIndex::from_names(&create_names(50_000));
    let text = create_article(20);

    c.bench_function("annotate 20 paragraphs / 50000 names", |b| {
        b.iter(|| annotator.annotate(black_box(&text), &terms));
    });
}

criterion_group!(
    benches,
    bench_protect,
    bench_annotate_small_inventory,
    bench_annotate_large_inventory
);
criterion_main!(benches);

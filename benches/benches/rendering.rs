use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use graphql_query::{Aliased, Literal, Query, Selection, Value, Variable};
use serde_json::json;
use std::hint::black_box;

/// Builds a pull request query shaped like a typical GitHub API call.
fn build_document() -> Query {
    let query = Query::new().named("PullRequest", [("owner", "String!"), ("number", "Int!")]);
    let author = Query::new().field("author").values(["login", "url"]).unwrap();
    query
        .field("repository")
        .args([
            ("owner", Value::from(Variable::new("owner"))),
            ("name", Value::from("rome")),
        ])
        .field("pullRequest")
        .args([("number", Variable::new("number"))])
        .values([
            Selection::from("title"),
            Aliased::new("url", "link").into(),
            author.into(),
        ])
        .unwrap()
        .field("commits")
        .args([("last", 250)])
        .field("edges")
        .field("node")
        .field("commit")
        .values(["url", "message", "committedDate"])
        .unwrap();
    query
}

/// A wide node with many heterogeneous arguments.
fn build_wide_document() -> Query {
    let query = Query::new();
    for i in 0..50 {
        query
            .field(format!("search{i}"))
            .args([
                ("query", Value::from(format!("is:open label:\"bug {i}\""))),
                ("type", Value::from(Literal::new("ISSUE"))),
                ("first", Value::from(i)),
                ("filter", Value::from(json!({"states": ["OPEN"], "score": 0.5}))),
            ])
            .values(["issueCount"])
            .unwrap();
    }
    query
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("build_document", |b| b.iter(|| black_box(build_document())));
}

fn bench_render_compact(c: &mut Criterion) {
    let query = build_document();
    c.bench_function("render_compact", |b| {
        b.iter(|| black_box(query.to_graphql(0)));
    });
}

fn bench_render_pretty(c: &mut Criterion) {
    let query = build_document();
    c.bench_function("render_pretty", |b| {
        b.iter(|| black_box(query.to_graphql(2)));
    });
}

fn bench_render_wide_arguments(c: &mut Criterion) {
    let query = build_wide_document();
    c.bench_function("render_wide_arguments", |b| {
        b.iter(|| black_box(query.to_graphql(2)));
    });
}

fn bench_nested_selection_copy(c: &mut Criterion) {
    c.bench_function("nested_selection_copy", |b| {
        b.iter_batched(
            || (Query::new(), build_wide_document()),
            |(root, wide)| {
                root.field("viewer").values([wide]).unwrap();
                black_box(root)
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    bench_build,
    bench_render_compact,
    bench_render_pretty,
    bench_render_wide_arguments,
    bench_nested_selection_copy,
);

criterion_main!(benches);

use core_policy::{
    derive_rate_limit, Constraint, MatchSettings, Policy, PolicyAuthorizer, RequestContext,
    RequestTarget, Statement,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn create_test_policy(num_statements: usize) -> Policy {
    let mut policy = Policy::new();

    for i in 0..num_statements {
        let statement = Statement::new(
            vec!["data:find".to_string(), format!("data:method{}", i)],
            format!("db{}.*", i),
        )
        .with_constraint(Constraint::max_requests(i as u64 + 1));
        policy = policy.add_statement(statement).unwrap();
    }

    policy
}

fn benchmark_authorization(c: &mut Criterion) {
    let settings = MatchSettings::default();
    let context = RequestContext::new("127.0.0.1", "localhost:80");

    for (size, db) in [(10, "db5"), (100, "db50"), (1000, "db500")] {
        let policy = create_test_policy(size);
        let authorizer = PolicyAuthorizer::new(&policy, &settings);

        c.bench_function(&format!("authorize_{}_statements", size), |b| {
            b.iter(|| {
                authorizer.authorize(
                    black_box(&RequestTarget::new("data", "find").on(db, "users")),
                    black_box(&context),
                )
            });
        });
    }
}

fn benchmark_rate_limit(c: &mut Criterion) {
    let settings = MatchSettings::default();
    let policy = create_test_policy(1000);

    c.bench_function("derive_rate_limit_1000_statements", |b| {
        b.iter(|| {
            derive_rate_limit(
                black_box(policy.statements()),
                black_box(&RequestTarget::new("data", "find").on("db999", "users")),
                &settings,
                60,
            )
        });
    });
}

fn benchmark_statement_match(c: &mut Criterion) {
    let settings = MatchSettings::default();
    let statement = Statement::new(vec!["data:find", "data:update", "user:*"], "acme.*");

    c.bench_function("statement_match", |b| {
        b.iter(|| {
            statement.matches_service_method(black_box("USER"), black_box("activate"), &settings)
                && statement.matches_collection_database(
                    black_box(Some("Acme")),
                    black_box(Some("users")),
                    &settings,
                )
        });
    });
}

criterion_group!(
    benches,
    benchmark_authorization,
    benchmark_rate_limit,
    benchmark_statement_match
);
criterion_main!(benches);

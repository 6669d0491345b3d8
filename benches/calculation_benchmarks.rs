//! Performance benchmarks for the locum calculation engine.
//!
//! Targets:
//! - Single contract over HTTP: < 200μs mean
//! - Single paycheck over HTTP: < 100μs mean
//! - Comparison of 10 contracts: < 2ms mean
//! - Batch of 100 contract calculations: < 20ms mean
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use locum_calc::api::{AppState, create_router};
use locum_calc::calculation::{calculate_contract, compare_contracts};
use locum_calc::config::ConfigLoader;
use locum_calc::models::{ComparisonOptions, ContractInput};

use axum::{Router, body::Body, http::Request};
use tower::ServiceExt;

const STATES: [&str; 6] = ["TX", "MA", "CA", "NY", "WA", "FL"];

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/us_2025").expect("Failed to load config");
    AppState::new(config)
}

/// Creates a 13-week contract with stipends, a bonus and deductions.
fn create_contract(i: usize) -> serde_json::Value {
    serde_json::json!({
        "name": format!("Contract {:03}", i),
        "specialty": "Emergency Medicine",
        "location": { "state": STATES[i % STATES.len()] },
        "contract_type": "locum_tenens",
        "start_date": "2025-01-06",
        "end_date": "2025-04-07",
        "hourly_rate": (100 + i % 50).to_string(),
        "hours_per_week": "48",
        "bonuses": [{ "bonus_type": "completion", "amount": "5000" }],
        "stipends": { "housing": "6000", "travel": "1200", "meals": "1500" },
        "deductions": {
            "insurance": [{ "kind": "health", "amount": "1200" }],
            "retirement": { "percentage": "5" }
        }
    })
}

fn create_contracts(count: usize) -> Vec<ContractInput> {
    (0..count)
        .map(|i| serde_json::from_value(create_contract(i)).expect("Failed to create contract"))
        .collect()
}

async fn post(router: Router, uri: &str, body: String) -> axum::response::Response {
    router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Benchmark: one contract through the HTTP layer.
///
/// Target: < 200μs mean
fn bench_single_contract(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(create_test_state());
    let body = create_contract(0).to_string();

    c.bench_function("single_contract", |b| {
        b.to_async(&rt).iter(|| async {
            black_box(post(router.clone(), "/contracts/calculate", body.clone()).await)
        })
    });
}

/// Benchmark: one paycheck with YTD totals through the HTTP layer.
///
/// Target: < 100μs mean
fn bench_single_paycheck(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let router = create_router(create_test_state());
    let body = serde_json::json!({
        "gross_pay": "7200",
        "pay_frequency": "bi_weekly",
        "pay_date": "2025-06-20",
        "filing_status": "single",
        "work_state": "CA",
        "ytd": { "gross": "79200", "federal_tax": "14000", "state_tax": "5200" },
        "deductions": { "pre_tax": "450", "after_tax": "50" }
    })
    .to_string();

    c.bench_function("single_paycheck", |b| {
        b.to_async(&rt).iter(|| async {
            black_box(post(router.clone(), "/paychecks/calculate", body.clone()).await)
        })
    });
}

/// Benchmark: batch of 100 contracts computed directly.
///
/// Target: < 20ms mean
fn bench_batch_100(c: &mut Criterion) {
    let config = ConfigLoader::builtin().expect("Failed to load config");
    let contracts = create_contracts(100);

    let mut group = c.benchmark_group("batch_processing");
    group.throughput(Throughput::Elements(100));

    group.bench_function("batch_100", |b| {
        b.iter(|| {
            let results: Vec<_> = contracts
                .iter()
                .map(|contract| calculate_contract(contract, &config))
                .collect();
            black_box(results)
        })
    });

    group.finish();
}

/// Benchmark: comparison cost as the number of contracts grows.
fn bench_comparison_scaling(c: &mut Criterion) {
    let config = ConfigLoader::builtin().expect("Failed to load config");
    let options = ComparisonOptions {
        adjust_for_cost_of_living: true,
    };

    let mut group = c.benchmark_group("comparison_scaling");

    for count in [2, 5, 10, 25].iter() {
        let contracts = create_contracts(*count);

        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("contracts", count), count, |b, _| {
            b.iter(|| black_box(compare_contracts(&contracts, &options, &config)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_contract,
    bench_single_paycheck,
    bench_batch_100,
    bench_comparison_scaling,
);
criterion_main!(benches);

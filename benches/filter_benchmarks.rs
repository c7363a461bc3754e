use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use testpick::fuzzy::{fuzzy_filter, fuzzy_match};
use testpick::scanner::{discover, ScanConfig};
use testpick::tui::app::PickerState;
use testpick::tui::events::KeyEvent;
use testpick::tui::ui::render;

// Synthetic test suite paths spread over packages and modules
fn make_candidates(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            format!(
                "tests/pkg_{}/module_{}/test_feature_{}.py",
                i % 37,
                i % 11,
                i
            )
        })
        .collect()
}

fn setup_test_tree(root: &Path, packages: usize, files_per_package: usize) {
    for p in 0..packages {
        let dir = root.join(format!("tests/pkg_{p}"));
        fs::create_dir_all(&dir).expect("Failed to create dir");
        for f in 0..files_per_package {
            fs::write(dir.join(format!("test_mod_{f}.py")), "").expect("Failed to write file");
            fs::write(dir.join(format!("helper_{f}.py")), "").expect("Failed to write file");
        }
    }
}

// 1. Scoring Benchmarks
fn bench_fuzzy_match(c: &mut Criterion) {
    let text = "tests/integration/payments/test_refund_workflow.py";

    c.bench_function("fuzzy_match_single", |b| {
        b.iter(|| black_box(fuzzy_match(black_box("refwork"), black_box(text))))
    });
}

// 2. Filtering Benchmarks
fn bench_fuzzy_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("fuzzy_filter");
    let candidates = make_candidates(10_000);

    for query in ["t", "feat", "pkg_3/test_feature_99"] {
        group.bench_with_input(format!("10k_{}", query.len()), &query, |b, query| {
            b.iter(|| black_box(fuzzy_filter(query, &candidates)));
        });
    }
    group.finish();
}

// 3. Typing a query keystroke by keystroke
fn bench_typing_session(c: &mut Criterion) {
    let candidates = make_candidates(10_000);

    c.bench_function("type_query_and_render_10k", |b| {
        b.iter(|| {
            let mut state = PickerState::new(&candidates);
            for ch in "feat99".chars() {
                state = state.apply(KeyEvent::Char(ch), fuzzy_filter, &candidates);
                black_box(render(&state));
            }
            black_box(state)
        })
    });
}

// 4. Discovery Benchmark
fn bench_discover(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    setup_test_tree(temp_dir.path(), 20, 10); // 200 test files among 400
    let config = ScanConfig::default();

    c.bench_function("discover_400_files", |b| {
        b.iter(|| black_box(discover(temp_dir.path(), &config).unwrap()))
    });
}

criterion_group!(
    benches,
    bench_fuzzy_match,
    bench_fuzzy_filter,
    bench_typing_session,
    bench_discover
);
criterion_main!(benches);

//! Benchmarks for selection and offset hot paths
//!
//! Run with: cargo bench --bench selection

use divan::{black_box, Bencher};
use sheetview::geometry::Rect;
use sheetview::model::{Offsets, SheetId};
use sheetview::selection::Selection;

fn main() {
    divan::main();
}

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn multi_range(ranges: i64) -> Selection {
    let mut sel = Selection::new(SheetId::from("s1"));
    for i in 0..ranges {
        sel.select_rect(1 + i * 3, 1, 2 + i * 3, 40, i > 0);
    }
    sel
}

// ============================================================================
// Selection mutation
// ============================================================================

#[divan::bench(args = [1, 10, 100])]
fn exclude_cells(bencher: Bencher, ranges: i64) {
    bencher
        .with_inputs(|| multi_range(ranges))
        .bench_local_values(|mut sel| {
            sel.exclude_cells(black_box(Rect::new(1, 10, 300, 12)));
            sel
        });
}

#[divan::bench(args = [10, 100])]
fn toggle_columns(bencher: Bencher, count: i64) {
    bencher.bench_local(|| {
        let mut sel = Selection::new(SheetId::from("s1"));
        for column in 1..=count {
            sel.select_column(black_box(column), true, false, None);
        }
        for column in (1..=count).step_by(2) {
            sel.select_column(black_box(column), true, false, None);
        }
        sel
    });
}

// ============================================================================
// Tokens
// ============================================================================

#[divan::bench(args = [1, 10, 100])]
fn token_save(bencher: Bencher, ranges: i64) {
    let sel = multi_range(ranges);
    bencher.bench_local(|| black_box(&sel).save());
}

#[divan::bench(args = [1, 10, 100])]
fn token_load(bencher: Bencher, ranges: i64) {
    let token = multi_range(ranges).save();
    bencher.bench_local(|| Selection::load(black_box(&token)));
}

// ============================================================================
// Offsets
// ============================================================================

#[divan::bench(args = [0, 100, 10_000])]
fn find_index(bencher: Bencher, custom: i64) {
    let mut offsets = Offsets::new(100.0);
    for i in 1..=custom {
        offsets.set_size(i * 2, 40.0 + (i % 7) as f64);
    }
    let far = offsets.position(custom * 2 + 50);
    bencher.bench_local(|| offsets.find_index(black_box(far)));
}

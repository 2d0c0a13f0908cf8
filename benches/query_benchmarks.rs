use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use geo::{Point, polygon};
use geohash_tree::compute::spatial::random_point;
use geohash_tree::index::csv::RecordWriter;
use geohash_tree::{
    BoundingBox, GeohashTree, IndexHeader, compact, create_disk_index, make_polygon_index,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::Path;
use tempfile::TempDir;

const MIN_PRECISION: usize = 2;
const MAX_PRECISION: usize = 6;

fn bounds() -> BoundingBox {
    BoundingBox::new(-130.0, -70.0, 55.0, 10.0)
}

/// Tile the bounds with 10x9 degree rectangles, one id per tile.
fn write_grid_index(path: &Path) {
    let header = IndexHeader::new(MIN_PRECISION, MAX_PRECISION);
    let mut writer = RecordWriter::create(path, &header).unwrap();

    for col in 0..6 {
        for row in 0..5 {
            let west = -130.0 + col as f64 * 10.0;
            let south = 10.0 + row as f64 * 9.0;
            let tile = polygon![
                (x: west, y: south),
                (x: west + 10.0, y: south),
                (x: west + 10.0, y: south + 9.0),
                (x: west, y: south + 9.0),
            ];
            let leaves = make_polygon_index(tile, MIN_PRECISION, MAX_PRECISION).unwrap();
            let id = format!("tile-{}-{}", col, row);
            writer
                .write_records(&compact(&leaves, &id, MIN_PRECISION))
                .unwrap();
        }
    }
    writer.flush().unwrap();
}

fn random_points(count: usize) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(1);
    let bounds = bounds();
    (0..count).map(|_| random_point(&bounds, &mut rng)).collect()
}

fn benchmark_backends(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("grid.csv");
    let db_path = dir.path().join("grid.db");
    write_grid_index(&csv_path);
    create_disk_index(&csv_path, &db_path).unwrap();

    let trees = [
        ("memory", GeohashTree::open_csv(&csv_path).unwrap()),
        ("disk", GeohashTree::open_disk(&db_path).unwrap()),
    ];
    let points = random_points(1024);

    let mut group = c.benchmark_group("query");
    for (name, tree) in &trees {
        group.bench_with_input(BenchmarkId::from_parameter(name), tree, |b, tree| {
            let mut i = 0;
            b.iter(|| {
                let point = &points[i % points.len()];
                i += 1;
                tree.query(black_box(point)).unwrap().is_some()
            })
        });
    }
    group.finish();

    let mut group = c.benchmark_group("get");
    for (name, tree) in &trees {
        group.bench_with_input(BenchmarkId::from_parameter(name), tree, |b, tree| {
            b.iter(|| tree.get(black_box("max")).unwrap().is_some())
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_backends);
criterion_main!(benches);

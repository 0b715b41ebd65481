//! Criterion benchmarks for Bandpaint critical paths
//!
//! Benchmarks the core performance-critical operations:
//! - Palette: color resolution (index, name, hex)
//! - Shapes: scanline polygon fill
//! - Scene: descriptor parsing and full scene builds
//! - Compositor: per-frame sprite compositing over a cached scene

use bandpaint::animator::SpriteInstance;
use bandpaint::arena::SpriteArena;
use bandpaint::compositor::Compositor;
use bandpaint::fingerprint::fingerprint_descriptor;
use bandpaint::framebuffer::{SCREEN_HEIGHT, SCREEN_WIDTH};
use bandpaint::motion::Point2D;
use bandpaint::palette::{resolve, PaletteColor};
use bandpaint::scene::{BuildOptions, RenderedScene, SceneDescriptor};
use bandpaint::shapes::{self, Bounds};
use bandpaint::view::{Cel, Loop, View};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;

// =============================================================================
// Test Data Generators
// =============================================================================

/// Generate scene JSON with n primitives cycling through every kind
fn make_scene_json(n: usize) -> String {
    let primitives: Vec<String> = (0..n)
        .map(|i| {
            let x = (i * 37 % 300) as i32;
            let y = (i * 23 % 180) as i32;
            let c = i % 16;
            match i % 6 {
                0 => format!(
                    r#"{{"type": "rect", "dims": [{}, {}, 40, 20], "color": {}}}"#,
                    x, y, c
                ),
                1 => format!(
                    r#"{{"type": "polygon", "points": [[{}, {}], [{}, {}], [{}, {}]], "color": {}}}"#,
                    x,
                    y,
                    x + 30,
                    y + 15,
                    x - 10,
                    y + 20,
                    c
                ),
                2 => format!(
                    r#"{{"type": "line", "points": [[{}, {}], [{}, {}]], "color": {}}}"#,
                    x,
                    y,
                    319 - x,
                    199 - y,
                    c
                ),
                3 => format!(
                    r#"{{"type": "circle", "center": [{}, {}], "radius": 12, "color": {}}}"#,
                    x, y, c
                ),
                4 => format!(
                    r#"{{"type": "sparkle", "points": [[{}, {}], [{}, {}]], "color": {}}}"#,
                    x,
                    y,
                    y,
                    x % 200,
                    c
                ),
                _ => format!(
                    r#"{{"type": "dithered_gradient", "dims": [{}, {}, 32, 16], "color1": {}, "color2": {}}}"#,
                    x,
                    y,
                    c,
                    (c + 1) % 16
                ),
            }
        })
        .collect();

    format!(
        r#"{{"background_color": "blue", "primitives": [{}]}}"#,
        primitives.join(", ")
    )
}

/// A view with one 16x32 cel
fn make_view() -> Arc<View> {
    let rows: Vec<String> = (0..32)
        .map(|y| (0..16).map(|x| if (x + y) % 5 == 0 { '.' } else { 'E' }).collect())
        .collect();
    let cel = Cel::from_rows(&rows, 100).expect("valid cel");
    let walk = Loop {
        name: "walk".to_string(),
        repeat: true,
        cels: vec![cel],
    };
    Arc::new(View::new("bench", vec![walk]).expect("valid view"))
}

// =============================================================================
// Palette Benchmarks
// =============================================================================

fn bench_palette(c: &mut Criterion) {
    let mut group = c.benchmark_group("palette");

    let colors = [
        ("index", PaletteColor::Index(14)),
        ("name", PaletteColor::from("light_magenta")),
        ("hex", PaletteColor::from("#55FFFF")),
        ("invalid", PaletteColor::from("chartreuse")),
    ];
    for (name, color) in colors.iter() {
        group.bench_with_input(BenchmarkId::new("resolve", name), color, |b, color| {
            b.iter(|| resolve(black_box(color)))
        });
    }

    group.finish();
}

// =============================================================================
// Shape Benchmarks
// =============================================================================

fn bench_shapes(c: &mut Criterion) {
    let mut group = c.benchmark_group("shapes");
    let screen = Bounds::of_size(SCREEN_WIDTH, SCREEN_HEIGHT);

    let triangle = [(10, 10), (300, 40), (120, 190)];
    let star: Vec<(i32, i32)> = (0..10)
        .map(|i| {
            let angle = i as f64 * std::f64::consts::PI / 5.0;
            let r = if i % 2 == 0 { 90.0 } else { 35.0 };
            (160 + (r * angle.cos()) as i32, 100 + (r * angle.sin()) as i32)
        })
        .collect();

    group.bench_function("polygon_triangle", |b| {
        b.iter(|| {
            let mut count = 0usize;
            shapes::polygon(screen, black_box(&triangle), |_, _| count += 1);
            count
        })
    });

    group.bench_function("polygon_star", |b| {
        b.iter(|| {
            let mut count = 0usize;
            shapes::polygon(screen, black_box(&star), |_, _| count += 1);
            count
        })
    });

    group.finish();
}

// =============================================================================
// Scene Benchmarks
// =============================================================================

fn bench_scene(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene");
    let options = BuildOptions::default();

    for size in [10, 100, 500].iter() {
        let text = make_scene_json(*size);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse", size), &text, |b, text| {
            b.iter(|| SceneDescriptor::from_json(black_box(text)))
        });

        let desc = SceneDescriptor::from_json(&text).expect("valid scene");
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("build", size), &desc, |b, desc| {
            b.iter(|| RenderedScene::build(black_box(desc), &options))
        });
        group.bench_with_input(BenchmarkId::new("fingerprint", size), &desc, |b, desc| {
            b.iter(|| fingerprint_descriptor(black_box(desc)))
        });
    }

    group.finish();
}

// =============================================================================
// Compositor Benchmarks
// =============================================================================

fn bench_compositor(c: &mut Criterion) {
    let mut group = c.benchmark_group("compositor");

    let desc = SceneDescriptor::from_json(&make_scene_json(100)).expect("valid scene");
    let scene = RenderedScene::build(&desc, &BuildOptions::default()).expect("scene builds");
    let view = make_view();

    for count in [1, 16, 64].iter() {
        let mut arena = SpriteArena::new();
        for i in 0..*count {
            let position = Point2D::new((i * 19 % 300) as f64, (i * 11 % 170) as f64);
            arena.insert(SpriteInstance::new(Arc::clone(&view), position));
        }
        let mut compositor = Compositor::new();

        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("compose", count), &arena, |b, arena| {
            b.iter(|| {
                compositor.compose(black_box(&scene), arena);
            })
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(
    benches,
    bench_palette,
    bench_shapes,
    bench_scene,
    bench_compositor
);

criterion_main!(benches);

#[macro_use]
extern crate criterion;
extern crate flamegen;
extern crate rand;

use criterion::Criterion;
use flamegen::{FractalImage, Rect, RenderParams, Renderer, SingleThreadRenderer, Variation};

fn bench_render_one_sample(c: &mut Criterion) {
    let params = RenderParams::new(
        20,
        4,
        200,
        1,
        vec![Variation::Spherical, Variation::Linear],
    )
    .unwrap();
    let image = FractalImage::create(256, 256).unwrap();
    let world = Rect::new(-1.777, -1.0, 3.554, 2.0);
    let mut rng = rand::thread_rng();
    let affines = params.generate_affines(&mut rng);
    c.bench_function("render_one_sample", move |b| {
        b.iter(|| params.render_one_sample(&mut rng, &image, &world, &affines))
    });
}

fn bench_small_sequential_render(c: &mut Criterion) {
    c.bench_function("sequential_render_64x64", |b| {
        b.iter(|| {
            let params =
                RenderParams::new(10, 3, 100, 1, vec![Variation::Spherical]).unwrap();
            let renderer = SingleThreadRenderer::new(params, 100);
            renderer
                .render(64, 64, &Rect::new(-2.0, -2.0, 4.0, 4.0))
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_render_one_sample, bench_small_sequential_render);
criterion_main!(benches);

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The chaos-game sampling engine.  A render is a bundle of samples;
//! each sample seeds a random point inside the world rect and walks
//! it through randomly chosen affine-plus-variation compositions.
//! The first iterations of every walk are thrown away so the point
//! can settle onto the attractor; after that, every iteration plots
//! the point (and its symmetry rotations) into the canvas with the
//! color of the affine map that produced it.
//!
//! Two strategies share the per-sample walk: a sequential one, and a
//! worker pool that treats each sample as an independent unit of
//! work.  Samples never talk to each other; the only shared mutable
//! state is the canvas, and that contends per-cell only.

extern crate crossbeam;
extern crate num_cpus;

use std::f64::consts::PI;
use std::sync::{Arc, Mutex};

use rand::prelude::*;

use affine::{AffineCoefficient, AffineTransformation};
use canvas::FractalImage;
use variations::Variation;
use world::{Point, Rect};

/// The chaos-game parameters shared by every rendering strategy.
#[derive(Clone, Debug)]
pub struct RenderParams {
    steps_for_normalization: usize,
    affine_count: usize,
    iter_per_sample: usize,
    symmetry: usize,
    variations: Vec<Variation>,
}

impl RenderParams {
    /// Bundles the parameters, rejecting configurations that could
    /// never render: an empty variation set, an empty affine pool, or
    /// a symmetry count of zero (it divides the full turn).
    pub fn new(
        steps_for_normalization: usize,
        affine_count: usize,
        iter_per_sample: usize,
        symmetry: usize,
        variations: Vec<Variation>,
    ) -> Result<RenderParams, String> {
        if variations.is_empty() {
            return Err("At least one variation must be enabled.".to_string());
        }
        if affine_count == 0 {
            return Err("The affine transformation pool cannot be empty.".to_string());
        }
        if symmetry == 0 {
            return Err("Symmetry must be at least 1.".to_string());
        }
        Ok(RenderParams {
            steps_for_normalization,
            affine_count,
            iter_per_sample,
            symmetry,
            variations,
        })
    }

    /// Generates the per-render pool of random affine maps.  Done
    /// once, then shared read-only by every sample.
    pub fn generate_affines<R: Rng>(&self, rng: &mut R) -> Vec<AffineTransformation> {
        (0..self.affine_count)
            .map(|_| AffineTransformation::new(AffineCoefficient::generate_random(rng)))
            .collect()
    }

    /// Runs one complete random walk into the canvas.
    ///
    /// The step counter starts at `-steps_for_normalization`; steps
    /// up to and including zero are the transient and are not
    /// plotted.  Recorded steps rotate the point around the world
    /// center once per symmetry repetition, accumulating the angle as
    /// they go, and write the active affine map's color into whatever
    /// cell each rotated point resolves to.  Points that resolve
    /// nowhere are dropped without comment.
    pub fn render_one_sample<R: Rng>(
        &self,
        rng: &mut R,
        image: &FractalImage,
        world: &Rect,
        affines: &[AffineTransformation],
    ) {
        let mut current = random_point(rng, world);
        let first_step = -(self.steps_for_normalization as i64);
        for step in first_step..self.iter_per_sample as i64 {
            let affine = &affines[rng.gen_range(0, affines.len())];
            let variation = self.variations[rng.gen_range(0, self.variations.len())];
            current = variation.apply(&affine.apply(&current));
            if step > 0 {
                let mut theta = 0.0;
                for _ in 0..self.symmetry {
                    theta += 2.0 * PI / self.symmetry as f64;
                    let point = world.rotate_point(&current, theta);
                    plot(image, world, &point, affine);
                }
            }
        }
    }
}

fn random_point<R: Rng>(rng: &mut R, world: &Rect) -> Point {
    Point::new(
        world.x + rng.gen_range(0.0, 1.0) * world.width,
        world.y + rng.gen_range(0.0, 1.0) * world.height,
    )
}

fn plot(image: &FractalImage, world: &Rect, point: &Point, affine: &AffineTransformation) {
    if let Some(pixel) = image.resolve_pixel(world, point) {
        pixel.accumulate(affine.coef.color);
    }
}

/// A rendering strategy.  Implementors supply `render_image`; the
/// provided `render` wraps it with canvas creation and affine-pool
/// generation, which every strategy does the same way.
pub trait Renderer {
    /// The shared chaos-game parameters of this strategy.
    fn params(&self) -> &RenderParams;

    /// Drives every sample of the render into the canvas.
    fn render_image(&self, image: &FractalImage, world: &Rect, affines: &[AffineTransformation]);

    /// Runs a full render: creates the canvas, generates the affine
    /// pool, dispatches all samples, and hands the populated canvas
    /// back once every sample has finished.
    fn render(&self, width: usize, height: usize, world: &Rect) -> Result<FractalImage, String> {
        let image = FractalImage::create(width, height)?;
        let affines = self.params().generate_affines(&mut thread_rng());
        self.render_image(&image, world, &affines);
        Ok(image)
    }
}

/// Runs every sample back to back on the calling thread.
pub struct SingleThreadRenderer {
    params: RenderParams,
    samples: usize,
}

impl SingleThreadRenderer {
    /// A sequential renderer for the given parameters and sample
    /// count.
    pub fn new(params: RenderParams, samples: usize) -> SingleThreadRenderer {
        SingleThreadRenderer { params, samples }
    }
}

impl Renderer for SingleThreadRenderer {
    fn params(&self) -> &RenderParams {
        &self.params
    }

    fn render_image(&self, image: &FractalImage, world: &Rect, affines: &[AffineTransformation]) {
        let mut rng = thread_rng();
        for _ in 0..self.samples {
            self.params.render_one_sample(&mut rng, image, world, affines);
        }
    }
}

/// Spreads the samples over a pool of one worker per logical CPU.
/// Workers pull sample indices from a shared iterator until it runs
/// dry; each carries its own RNG so the only cross-thread traffic is
/// the job counter and the per-cell canvas writes.
pub struct MultiThreadRenderer {
    params: RenderParams,
    samples: usize,
}

impl MultiThreadRenderer {
    /// A pooled renderer for the given parameters and sample count.
    pub fn new(params: RenderParams, samples: usize) -> MultiThreadRenderer {
        MultiThreadRenderer { params, samples }
    }
}

impl Renderer for MultiThreadRenderer {
    fn params(&self) -> &RenderParams {
        &self.params
    }

    fn render_image(&self, image: &FractalImage, world: &Rect, affines: &[AffineTransformation]) {
        let threads = num_cpus::get();
        let jobs = Arc::new(Mutex::new(0..self.samples));
        crossbeam::scope(|spawner| {
            for _ in 0..threads {
                let jobs = jobs.clone();
                let params = &self.params;
                spawner.spawn(move |_| {
                    let mut rng = thread_rng();
                    loop {
                        let job = { jobs.lock().unwrap().next() };
                        match job {
                            Some(_) => {
                                params.render_one_sample(&mut rng, image, world, affines);
                            }
                            None => {
                                break;
                            }
                        }
                    }
                });
            }
        })
        .unwrap();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(iter_per_sample: usize, steps: usize) -> RenderParams {
        RenderParams::new(
            steps,
            2,
            iter_per_sample,
            1,
            vec![Variation::Linear, Variation::Spherical],
        )
        .unwrap()
    }

    fn total_hits(image: &FractalImage) -> u64 {
        let mut total = 0;
        for y in 0..image.height {
            for x in 0..image.width {
                total += u64::from(image.pixel(x, y).unwrap().hit_count());
            }
        }
        total
    }

    #[test]
    fn rejects_an_empty_variation_set() {
        assert!(RenderParams::new(10, 2, 100, 1, vec![]).is_err());
    }

    #[test]
    fn rejects_an_empty_affine_pool() {
        assert!(RenderParams::new(10, 0, 100, 1, vec![Variation::Linear]).is_err());
    }

    #[test]
    fn rejects_zero_symmetry() {
        assert!(RenderParams::new(10, 2, 100, 0, vec![Variation::Linear]).is_err());
    }

    #[test]
    fn degenerate_render_terminates_with_an_untouched_canvas() {
        use processor::{ImageProcessor, LogGammaCorrection};
        let params =
            RenderParams::new(0, 1, 0, 1, vec![Variation::Linear]).unwrap();
        let renderer = SingleThreadRenderer::new(params, 1);
        let world = Rect::new(0.0, 0.0, 1.0, 1.0);
        let image = renderer.render(10, 10, &world).unwrap();
        assert_eq!(total_hits(&image), 0);
        // Tone mapping an empty canvas must not divide by zero.
        LogGammaCorrection::new(1.0).unwrap().process(&image);
        for y in 0..image.height {
            for x in 0..image.width {
                assert_eq!(image.pixel(x, y).unwrap().channels(), (0, 0, 0));
            }
        }
    }

    #[test]
    fn render_rejects_an_empty_canvas() {
        let renderer = SingleThreadRenderer::new(params(10, 2), 1);
        assert!(renderer.render(0, 10, &Rect::new(0.0, 0.0, 1.0, 1.0)).is_err());
    }

    #[test]
    fn sequential_render_never_plots_more_than_the_recorded_steps() {
        let samples = 40;
        let iter_per_sample = 50;
        let renderer = SingleThreadRenderer::new(params(iter_per_sample, 5), samples);
        let world = Rect::new(-2.0, -2.0, 4.0, 4.0);
        let image = renderer.render(16, 16, &world).unwrap();
        // Only steps 1..iter_per_sample are recorded, one plot each
        // at symmetry 1.
        let max_plots = (samples * (iter_per_sample - 1)) as u64;
        assert!(total_hits(&image) <= max_plots);
    }

    #[test]
    fn parallel_render_terminates_and_never_plots_more_than_the_recorded_steps() {
        let samples = 40;
        let iter_per_sample = 50;
        let renderer = MultiThreadRenderer::new(params(iter_per_sample, 5), samples);
        let world = Rect::new(-2.0, -2.0, 4.0, 4.0);
        let image = renderer.render(16, 16, &world).unwrap();
        let max_plots = (samples * (iter_per_sample - 1)) as u64;
        assert!(total_hits(&image) <= max_plots);
    }
}

#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Flame fractal renderer
//!
//! A flame fractal is drawn with the chaos game: start from a random
//! point, then over and over pick a random affine map and a random
//! nonlinear "variation", run the point through both, and mark where
//! it lands.  The affine maps are generated so their linear parts
//! are contractions, which pulls the wandering point onto an
//! attractor; the variation bends that attractor into the shapes
//! that give these images their name.  The first iterations of every
//! walk are discarded so the point has time to reach the attractor
//! before anything is recorded.
//!
//! Each recorded landing is rotated around the center of the world
//! region once per symmetry repetition, resolved to a cell of the
//! canvas, and blended into that cell with the color of the affine
//! map that produced it.  Because a cell counts how often it was
//! hit, the raw canvas is a density map; a log-scaled gamma pass
//! turns it into displayable color intensities afterwards.

extern crate crossbeam;
extern crate image;
extern crate itertools;
extern crate num;
extern crate num_cpus;
extern crate rand;

pub mod affine;
pub mod canvas;
pub mod processor;
pub mod renderer;
pub mod saver;
pub mod variations;
pub mod world;

pub use affine::{AffineCoefficient, AffineTransformation};
pub use canvas::{Color, FractalImage, Pixel};
pub use processor::{ImageProcessor, LogGammaCorrection};
pub use renderer::{MultiThreadRenderer, RenderParams, Renderer, SingleThreadRenderer};
pub use saver::{save_image, ImageFormat};
pub use variations::Variation;
pub use world::{Point, Rect};

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The accumulation canvas.  A FractalImage owns a flat, row-major
//! grid of pixels; every surviving chaos-game iteration resolves to
//! one cell and folds a color into it.  Writes from concurrent
//! workers may land on the same cell, so each pixel guards its state
//! with its own lock; cells never contend with each other.

use std::sync::Mutex;

use num::clamp;
use world::{Point, Rect};

/// An 8-bit RGBA color.  Plain value type.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel, fully opaque unless stated otherwise.
    pub a: u8,
}

impl Color {
    /// A fully opaque color from its three channel values.
    pub fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 255 }
    }
}

#[derive(Debug, Default)]
struct PixelState {
    red: u8,
    green: u8,
    blue: u8,
    hit_count: u32,
    normal: f64,
}

/// One cell of the canvas: an accumulated color, the number of times
/// the chaos game has landed here, and a scratch scalar used only by
/// the tone-mapping pass.  All of it sits behind one lock so that
/// `accumulate` is a single indivisible read-modify-write no matter
/// how many workers aim at the same cell.
#[derive(Debug, Default)]
pub struct Pixel {
    state: Mutex<PixelState>,
}

fn midpoint(current: u8, incoming: u8) -> u8 {
    ((u16::from(current) + u16::from(incoming)) / 2) as u8
}

impl Pixel {
    /// Folds a color into the cell.  The first hit takes the color
    /// as-is; every later hit replaces each channel with the integer
    /// midpoint of the current and incoming values, then the hit
    /// count goes up by one.  The midpoint blend decays older
    /// contributions exponentially rather than computing a true mean;
    /// downstream tone mapping expects exactly this blend, so keep it
    /// bit-for-bit as is.
    pub fn accumulate(&self, color: Color) {
        let mut state = self.state.lock().unwrap();
        if state.hit_count == 0 {
            state.red = color.r;
            state.green = color.g;
            state.blue = color.b;
        } else {
            state.red = midpoint(state.red, color.r);
            state.green = midpoint(state.green, color.g);
            state.blue = midpoint(state.blue, color.b);
        }
        state.hit_count += 1;
    }

    /// The accumulated (red, green, blue) channel values.
    pub fn channels(&self) -> (u8, u8, u8) {
        let state = self.state.lock().unwrap();
        (state.red, state.green, state.blue)
    }

    /// How many times the chaos game has landed on this cell.
    pub fn hit_count(&self) -> u32 {
        self.state.lock().unwrap().hit_count
    }

    /// The tone-mapping scratch value.
    pub fn normal(&self) -> f64 {
        self.state.lock().unwrap().normal
    }

    /// Overwrites the tone-mapping scratch value.
    pub fn set_normal(&self, normal: f64) {
        self.state.lock().unwrap().normal = normal;
    }

    /// Scales each channel by `factor` and truncates back to 8 bits.
    /// Used by the tone mapper once sampling is over.
    pub fn scale_channels(&self, factor: f64) {
        let mut state = self.state.lock().unwrap();
        state.red = clamp(f64::from(state.red) * factor, 0.0, 255.0) as u8;
        state.green = clamp(f64::from(state.green) * factor, 0.0, 255.0) as u8;
        state.blue = clamp(f64::from(state.blue) * factor, 0.0, 255.0) as u8;
    }
}

/// The canvas for one render: a width x height grid of pixels stored
/// row-major (`index = y * width + x`), created once, never resized.
/// It is the only shared mutable resource while sampling runs.
#[derive(Debug)]
pub struct FractalImage {
    /// Horizontal pixel count.
    pub width: usize,
    /// Vertical pixel count.
    pub height: usize,
    data: Vec<Pixel>,
}

impl FractalImage {
    /// Builds a canvas with every pixel zeroed.  Both dimensions must
    /// be positive.
    pub fn create(width: usize, height: usize) -> Result<FractalImage, String> {
        if width == 0 || height == 0 {
            return Err(format!(
                "Image dimensions must be positive, got {}x{}.",
                width, height
            ));
        }
        let data = (0..width * height).map(|_| Pixel::default()).collect();
        Ok(FractalImage {
            width,
            height,
            data,
        })
    }

    /// Whether the pixel coordinates fall inside the grid.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// The pixel at the given grid coordinates, or None outside the
    /// grid.
    pub fn pixel(&self, x: usize, y: usize) -> Option<&Pixel> {
        if !self.contains(x, y) {
            return None;
        }
        Some(&self.data[y * self.width + x])
    }

    /// Maps a world-space point to its cell: None if the point lies
    /// outside `rect`, otherwise the linear world-to-grid scaling
    /// with truncation.  Points that scale past the grid edge come
    /// back None as well; callers simply drop those.
    pub fn resolve_pixel(&self, rect: &Rect, point: &Point) -> Option<&Pixel> {
        if !rect.contains(point) {
            return None;
        }
        let x = (((point.x - rect.x) / rect.width) * self.width as f64) as usize;
        let y = (((point.y - rect.y) / rect.height) * self.height as f64) as usize;
        self.pixel(x, y)
    }
}

//! Tone mapping.  Raw hit counts span several orders of magnitude,
//! so the canvas goes through a two-pass log-density normalization
//! followed by gamma correction before it is fit to look at.

use itertools::iproduct;

use canvas::FractalImage;

/// Floor for the normalization maximum.  A canvas that collected no
/// hits at all still divides by this instead of by zero.
const MIN_MAX_NORMAL: f64 = 0.000_000_01;

/// A post-processing pass over a populated canvas.  Runs strictly
/// after sampling has finished; nothing mutates the canvas once a
/// processor has started.
pub trait ImageProcessor {
    /// Transforms the canvas in place.
    fn process(&self, image: &FractalImage);
}

/// Log-scaled gamma correction.  Pass one stores `log10(hit_count)`
/// in each hit pixel's scratch slot and finds the canvas-wide
/// maximum; pass two normalizes every scratch value by that maximum
/// and scales the color channels by `normal^(1/gamma)`.
#[derive(Debug)]
pub struct LogGammaCorrection {
    gamma: f64,
}

impl LogGammaCorrection {
    /// A tone mapper with the given gamma, which must be positive.
    pub fn new(gamma: f64) -> Result<LogGammaCorrection, String> {
        if gamma <= 0.0 {
            return Err("Gamma must be greater than 0.".to_string());
        }
        Ok(LogGammaCorrection { gamma })
    }

    fn max_normal(&self, image: &FractalImage) -> f64 {
        let mut max = MIN_MAX_NORMAL;
        for (y, x) in iproduct!(0..image.height, 0..image.width) {
            if let Some(pixel) = image.pixel(x, y) {
                if pixel.hit_count() > 0 {
                    let normal = f64::from(pixel.hit_count()).log10();
                    pixel.set_normal(normal);
                    if normal > max {
                        max = normal;
                    }
                }
            }
        }
        max
    }
}

impl ImageProcessor for LogGammaCorrection {
    fn process(&self, image: &FractalImage) {
        let max = self.max_normal(image);
        for (y, x) in iproduct!(0..image.height, 0..image.width) {
            if let Some(pixel) = image.pixel(x, y) {
                let normal = pixel.normal() / max;
                pixel.set_normal(normal);
                pixel.scale_channels(normal.powf(1.0 / self.gamma));
            }
        }
    }
}

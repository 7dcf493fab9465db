//! The affine-transform model.  Every map carries six scalar
//! coefficients plus the color it deposits on the canvas.  Random
//! generation rejects coefficient sets whose linear part is not a
//! contraction, since those would let the random walk run away
//! instead of settling onto an attractor.

use rand::Rng;

use canvas::Color;
use world::Point;

/// The six coefficients of one affine map plus its plotting color.
#[derive(Copy, Clone, Debug)]
pub struct AffineCoefficient {
    /// Linear coefficient taking x into x'.
    pub a: f64,
    /// Linear coefficient taking y into x'.
    pub b: f64,
    /// Translation term of x'.
    pub c: f64,
    /// Linear coefficient taking x into y'.
    pub d: f64,
    /// Linear coefficient taking y into y'.
    pub e: f64,
    /// Translation term of y'.
    pub f: f64,
    /// The color this map contributes to every cell it hits.
    pub color: Color,
}

impl AffineCoefficient {
    /// Draws a random coefficient set.  The translation terms `c` and
    /// `f` come straight from `[-1, 1]`; the four linear terms are
    /// redrawn until they satisfy [`is_contractive`], with no cap on
    /// the number of attempts.  The accepted region is a large enough
    /// slice of the sample space that capping the loop would only
    /// distort the output distribution.
    ///
    /// [`is_contractive`]: #method.is_contractive
    pub fn generate_random<R: Rng>(rng: &mut R) -> AffineCoefficient {
        let c = rng.gen_range(-1.0, 1.0);
        let f = rng.gen_range(-1.0, 1.0);
        loop {
            let a = rng.gen_range(-1.0, 1.0);
            let b = rng.gen_range(-1.0, 1.0);
            let d = rng.gen_range(-1.0, 1.0);
            let e = rng.gen_range(-1.0, 1.0);
            if AffineCoefficient::is_contractive(a, b, d, e) {
                let color = Color::rgb(rng.gen(), rng.gen(), rng.gen());
                return AffineCoefficient {
                    a,
                    b,
                    c,
                    d,
                    e,
                    f,
                    color,
                };
            }
        }
    }

    /// Whether the linear part keeps the walk bounded:
    /// `a² + d² < 1`, `b² + e² < 1`, and
    /// `a² + b² + d² + e² < 1 + (a·e − b·d)²`.
    pub fn is_contractive(a: f64, b: f64, d: f64, e: f64) -> bool {
        a * a + d * d < 1.0
            && b * b + e * e < 1.0
            && a * a + b * b + d * d + e * e < 1.0 + (a * e - b * d) * (a * e - b * d)
    }
}

/// An affine map over world points.
#[derive(Copy, Clone, Debug)]
pub struct AffineTransformation {
    /// The coefficient set backing this map.
    pub coef: AffineCoefficient,
}

impl AffineTransformation {
    /// Wraps a coefficient set.
    pub fn new(coef: AffineCoefficient) -> AffineTransformation {
        AffineTransformation { coef }
    }

    /// `x' = a·x + b·y + c`, `y' = d·x + e·y + f`.
    pub fn apply(&self, point: &Point) -> Point {
        Point::new(
            self.coef.a * point.x + self.coef.b * point.y + self.coef.c,
            self.coef.d * point.x + self.coef.e * point.y + self.coef.f,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::thread_rng;

    fn fixture() -> AffineTransformation {
        AffineTransformation::new(AffineCoefficient {
            a: 0.1,
            b: 0.2,
            c: 0.3,
            d: 0.4,
            e: 0.5,
            f: 0.6,
            color: Color::rgb(1, 1, 1),
        })
    }

    fn assert_close(actual: &Point, expected: &Point) {
        assert!(
            (actual.x - expected.x).abs() < 1e-9 && (actual.y - expected.y).abs() < 1e-9,
            "{:?} != {:?}",
            actual,
            expected
        );
    }

    #[test]
    fn apply_at_the_origin_yields_the_translation() {
        assert_close(&fixture().apply(&Point::new(0.0, 0.0)), &Point::new(0.3, 0.6));
    }

    #[test]
    fn apply_at_the_unit_diagonal() {
        assert_close(&fixture().apply(&Point::new(1.0, 1.0)), &Point::new(0.6, 1.5));
    }

    #[test]
    fn generated_coefficients_satisfy_the_contraction_invariant() {
        let mut rng = thread_rng();
        for _ in 0..100 {
            let coef = AffineCoefficient::generate_random(&mut rng);
            assert!(AffineCoefficient::is_contractive(
                coef.a, coef.b, coef.d, coef.e
            ));
            assert!(-1.0 <= coef.c && coef.c < 1.0);
            assert!(-1.0 <= coef.f && coef.f < 1.0);
        }
    }

    #[test]
    fn contraction_check_rejects_expanding_maps() {
        assert!(!AffineCoefficient::is_contractive(1.0, 0.0, 0.0, 1.0));
        assert!(!AffineCoefficient::is_contractive(0.9, 0.9, 0.9, 0.9));
        assert!(AffineCoefficient::is_contractive(0.5, 0.0, 0.0, 0.5));
    }
}

//! The catalog of nonlinear variations.  Each chaos-game iteration
//! runs the current point through a random affine map and then
//! through one of these; the variation is what bends the straight
//! affine geometry into the characteristic flame curvature.
//!
//! Several formulas divide by a coordinate or by the radius, so a
//! point sitting exactly on an axis (or at the origin) is a live edge
//! case.  The policy here is plain IEEE arithmetic: the division
//! saturates to an infinity, or to NaN for 0/0, and the non-finite
//! point later fails the world rect's containment check and is
//! dropped.  A degenerate iteration costs one discarded plot, never
//! the sample or the render.

use std::f64::consts::PI;
use std::str::FromStr;

use world::Point;

/// The closed set of nonlinear point transformations.  Stateless pure
/// functions, freely shared across workers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Variation {
    /// The identity: hands the point back unchanged.
    Linear,
    /// `x' = θ/π·sin(πr)`, `y' = θ/π·cos(πr)` with `θ = atan(y/x)`.
    Disk,
    /// `x' = e^(x−1)·cos(πy)`, `y' = e^(x−1)·sin(πy)`.
    Exponential,
    /// `x' = r·sin(θr)`, `y' = −r·cos(θr)` with `θ = atan(x/y)`.
    Heart,
    /// `x' = sin(θ)/r`, `y' = r·cos(θ)` with `θ = atan(x/y)`.
    Hyperbolic,
    /// `x' = atan2(x,y)/π`, `y' = r − 1`.
    Polar,
    /// `x' = x/(x²+y²)`, `y' = y/(x²+y²)`.
    Spherical,
}

impl Variation {
    /// Every variation, in catalog order.
    pub const ALL: [Variation; 7] = [
        Variation::Linear,
        Variation::Disk,
        Variation::Exponential,
        Variation::Heart,
        Variation::Hyperbolic,
        Variation::Polar,
        Variation::Spherical,
    ];

    /// Applies the variation, producing a new point.
    pub fn apply(&self, point: &Point) -> Point {
        match *self {
            Variation::Linear => *point,
            Variation::Disk => {
                let r = (point.x * point.x + point.y * point.y).sqrt();
                let theta = (point.y / point.x).atan();
                Point::new(theta / PI * (PI * r).sin(), theta / PI * (PI * r).cos())
            }
            Variation::Exponential => {
                let scale = (point.x - 1.0).exp();
                Point::new(scale * (PI * point.y).cos(), scale * (PI * point.y).sin())
            }
            Variation::Heart => {
                let theta = (point.x / point.y).atan();
                let r = (point.x * point.x + point.y * point.y).sqrt();
                Point::new(r * (theta * r).sin(), -r * (theta * r).cos())
            }
            Variation::Hyperbolic => {
                let theta = (point.x / point.y).atan();
                let r = (point.x * point.x + point.y * point.y).sqrt();
                Point::new(theta.sin() / r, r * theta.cos())
            }
            Variation::Polar => Point::new(
                point.x.atan2(point.y) / PI,
                (point.x * point.x + point.y * point.y).sqrt() - 1.0,
            ),
            Variation::Spherical => {
                let r = point.x * point.x + point.y * point.y;
                Point::new(point.x / r, point.y / r)
            }
        }
    }
}

impl FromStr for Variation {
    type Err = String;

    fn from_str(s: &str) -> Result<Variation, String> {
        match s {
            "linear" => Ok(Variation::Linear),
            "disk" => Ok(Variation::Disk),
            "exponential" => Ok(Variation::Exponential),
            "heart" => Ok(Variation::Heart),
            "hyperbolic" => Ok(Variation::Hyperbolic),
            "polar" => Ok(Variation::Polar),
            "spherical" => Ok(Variation::Spherical),
            _ => Err(format!("Unknown variation: {}", s)),
        }
    }
}

//! Planar vector math over landmark positions. Depth (`z`) is ignored.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(&'static str),
}

/// Angle at `vertex` between the rays to `p1` and `p3`, in degrees [0, 180].
/// Rays are normalised first so large coordinates cannot overflow the products.
pub fn angle_between(p1: Point, vertex: Point, p3: Point) -> Result<f64, GeometryError> {
    let (ux, uy) = unit_ray(vertex, p1)?;
    let (wx, wy) = unit_ray(vertex, p3)?;

    let dot = ux * wx + uy * wy;
    let cross = ux * wy - uy * wx;
    let degrees = cross.abs().atan2(dot).to_degrees();
    if !degrees.is_finite() {
        return Err(GeometryError::DegenerateGeometry("non-finite angle"));
    }
    Ok(degrees.clamp(0.0, 180.0))
}

fn unit_ray(from: Point, to: Point) -> Result<(f64, f64), GeometryError> {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let length = dx.hypot(dy);
    // Also rejects NaN lengths.
    if !(length > 0.0) {
        return Err(GeometryError::DegenerateGeometry("zero-length ray"));
    }
    if !length.is_finite() {
        return Err(GeometryError::DegenerateGeometry("unbounded ray"));
    }
    Ok((dx / length, dy / length))
}

pub fn distance(p1: Point, p2: Point) -> f64 {
    (p2.x - p1.x).hypot(p2.y - p1.y)
}

pub fn midpoint(p1: Point, p2: Point) -> Point {
    Point::new((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0)
}

/// `numerator / denominator`, refusing zero-length reference segments.
pub fn ratio(numerator: f64, denominator: f64) -> Result<f64, GeometryError> {
    if denominator == 0.0 || !denominator.is_finite() || !numerator.is_finite() {
        return Err(GeometryError::DegenerateGeometry("zero-length reference segment"));
    }
    Ok(numerator / denominator)
}

/// Same as [`ratio`] scaled to percent.
pub fn percent_of(numerator: f64, denominator: f64) -> Result<f64, GeometryError> {
    ratio(numerator, denominator).map(|value| value * 100.0)
}

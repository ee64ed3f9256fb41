use nalgebra as na;
use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_vector(self) -> na::Vector2<f64> {
        na::Vector2::new(self.x, self.y)
    }

    pub fn from_vector(v: na::Vector2<f64>) -> Self {
        Self { x: v.x, y: v.y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.to_vector() - self.to_vector()).norm()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn centered(center: Point, width: f64, height: f64) -> Self {
        Self {
            x: center.x - width / 2.0,
            y: center.y - height / 2.0,
            width,
            height,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.x + self.width && p.y >= self.y && p.y <= self.y + self.height
    }
}

/// Axis-aligned extent of a point set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Extent {
    pub fn from_points(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut it = points.into_iter();
        let p0 = it.next()?;
        let mut e = Self {
            min_x: p0.x,
            min_y: p0.y,
            max_x: p0.x,
            max_y: p0.y,
        };
        for p in it {
            e.min_x = e.min_x.min(p.x);
            e.min_y = e.min_y.min(p.y);
            e.max_x = e.max_x.max(p.x);
            e.max_y = e.max_y.max(p.y);
        }
        Some(e)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }
}

/// One of the eight 45° directions: index `k` is the angle `k * 45°` measured from +x with the
/// `atan2(dy, dx)` convention of the layout coordinates.
///
/// Serializes as its angle in degrees (0, 45, ..., 315).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub struct Octant(u8);

impl Octant {
    pub const fn new(index: u8) -> Self {
        Self(index % 8)
    }

    pub fn from_angle(radians: f64) -> Self {
        let step = (radians / FRAC_PI_4).round() as i64;
        Self(step.rem_euclid(8) as u8)
    }

    /// `None` for a zero (or non-finite) vector.
    pub fn from_vector(v: na::Vector2<f64>) -> Option<Self> {
        if !(v.x.is_finite() && v.y.is_finite()) || v.norm() < 1e-9 {
            return None;
        }
        Some(Self::from_angle(v.y.atan2(v.x)))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn degrees(self) -> u16 {
        u16::from(self.0) * 45
    }

    pub fn radians(self) -> f64 {
        f64::from(self.0) * FRAC_PI_4
    }

    pub fn unit(self) -> na::Vector2<f64> {
        let a = self.radians();
        na::Vector2::new(a.cos(), a.sin())
    }
}

impl From<Octant> for u16 {
    fn from(value: Octant) -> Self {
        value.degrees()
    }
}

impl TryFrom<u16> for Octant {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if value % 45 == 0 && value < 360 {
            Ok(Self((value / 45) as u8))
        } else {
            Err(format!("not a multiple of 45 below 360: {value}"))
        }
    }
}

/// Rounds an angle to the nearest multiple of 45°.
pub fn quantize_angle(radians: f64) -> f64 {
    (radians / FRAC_PI_4).round() * FRAC_PI_4
}

pub fn snap_to_grid(v: f64, grid: f64) -> f64 {
    if !(grid.is_finite() && grid > 0.0) {
        return v;
    }
    (v / grid).round() * grid
}

/// A square snapping grid with lines through `origin`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    pub size: f64,
    pub origin: Point,
}

impl Grid {
    pub const fn new(size: f64) -> Self {
        Self {
            size,
            origin: Point::new(0.0, 0.0),
        }
    }

    /// `false` for a zero, negative or non-finite size; such a grid leaves points where they are.
    pub fn is_usable(&self) -> bool {
        self.size.is_finite() && self.size > 0.0
    }

    /// Index of the grid point nearest to `p`.
    pub fn cell(&self, p: Point) -> (i64, i64) {
        (
            ((p.x - self.origin.x) / self.size).round() as i64,
            ((p.y - self.origin.y) / self.size).round() as i64,
        )
    }

    pub fn point(&self, cell: (i64, i64)) -> Point {
        Point::new(
            self.origin.x + cell.0 as f64 * self.size,
            self.origin.y + cell.1 as f64 * self.size,
        )
    }

    pub fn snap(&self, p: Point) -> Point {
        if !self.is_usable() {
            return p;
        }
        self.point(self.cell(p))
    }
}

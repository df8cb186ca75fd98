//! Splitting geometries with a cutting line.
//!
//! Polygons are split by building a [`SplitGraph`](crate::graph::SplitGraph)
//! and tracing its faces; lines are noded against the cutting line. Multi
//! geometries split each member and keep the unsplit ones as they are.

mod assemble;
mod line;
mod polygon;
mod trace;

use geo::{Geometry, LineString, MultiLineString, MultiPolygon, Polygon};
use tracing::debug;

use crate::error::{OperationError, Result};
use crate::kernel;
use crate::math::TOLERANCE;

pub use line::split_line;
pub use polygon::split_polygon;

/// Tunables for [`Split`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitOptions {
    /// Distance under which two coordinates are the same point.
    pub tolerance: f64,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            tolerance: TOLERANCE,
        }
    }
}

impl SplitOptions {
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if the tolerance is negative
    /// or not finite.
    pub fn validate(&self) -> Result<()> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(OperationError::InvalidInput(format!(
                "tolerance must be finite and non-negative, got {}",
                self.tolerance
            ))
            .into());
        }
        Ok(())
    }
}

/// The geometry kinds a cutting line can split.
#[derive(Debug, Clone, PartialEq)]
pub enum SplitTarget {
    LineString(LineString),
    MultiLineString(MultiLineString),
    Polygon(Polygon),
    MultiPolygon(MultiPolygon),
}

impl SplitTarget {
    fn is_empty(&self) -> bool {
        match self {
            Self::LineString(line) => line.0.is_empty(),
            Self::MultiLineString(lines) => lines.0.iter().all(|l| l.0.is_empty()),
            Self::Polygon(polygon) => polygon.exterior().0.is_empty(),
            Self::MultiPolygon(polygons) => polygons.0.iter().all(|p| p.exterior().0.is_empty()),
        }
    }
}

impl TryFrom<Geometry> for SplitTarget {
    type Error = OperationError;

    fn try_from(geometry: Geometry) -> std::result::Result<Self, Self::Error> {
        match geometry {
            Geometry::LineString(line) => Ok(Self::LineString(line)),
            Geometry::MultiLineString(lines) => Ok(Self::MultiLineString(lines)),
            Geometry::Polygon(polygon) => Ok(Self::Polygon(polygon)),
            Geometry::MultiPolygon(polygons) => Ok(Self::MultiPolygon(polygons)),
            Geometry::Point(_) => Err(OperationError::UnsupportedGeometry("Point")),
            Geometry::Line(_) => Err(OperationError::UnsupportedGeometry("Line")),
            Geometry::MultiPoint(_) => Err(OperationError::UnsupportedGeometry("MultiPoint")),
            Geometry::GeometryCollection(_) => {
                Err(OperationError::UnsupportedGeometry("GeometryCollection"))
            }
            Geometry::Rect(_) => Err(OperationError::UnsupportedGeometry("Rect")),
            Geometry::Triangle(_) => Err(OperationError::UnsupportedGeometry("Triangle")),
        }
    }
}

/// Splits a geometry with a cutting line.
///
/// Supports line strings, polygons and their multi variants. A polygon is
/// cut into the faces the line separates; a closed line lying inside a
/// polygon drills a hole and also yields the hole as its own piece.
///
/// # Examples
///
/// ```
/// use geo::{Geometry, LineString, Polygon};
/// use polysplit::Split;
///
/// let square = Polygon::new(
///     LineString::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)]),
///     vec![],
/// );
/// let line = LineString::from(vec![(2.0, -1.0), (2.0, 5.0)]);
/// let result = Split::new(Geometry::Polygon(square), line).execute().unwrap();
/// assert!(matches!(result, Some(Geometry::MultiPolygon(ref mp)) if mp.0.len() == 2));
/// ```
pub struct Split {
    geometry: Geometry,
    cutting_line: LineString,
    options: SplitOptions,
}

impl Split {
    /// Creates a new `Split` operation with default options.
    #[must_use]
    pub fn new(geometry: Geometry, cutting_line: LineString) -> Self {
        Self {
            geometry,
            cutting_line,
            options: SplitOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: SplitOptions) -> Self {
        self.options = options;
        self
    }

    /// Executes the split.
    ///
    /// Returns `Ok(None)` if the cutting line leaves the geometry unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the geometry kind is unsupported, the geometry is
    /// empty, the cutting line has fewer than two distinct points, or ring
    /// tracing hits a topology violation.
    pub fn execute(&self) -> Result<Option<Geometry>> {
        self.options.validate()?;
        let tolerance = self.options.tolerance;

        let target = SplitTarget::try_from(self.geometry.clone())?;
        if target.is_empty() {
            return Err(OperationError::InvalidInput("geometry is empty".into()).into());
        }
        if kernel::dedup_coords(&self.cutting_line.0, tolerance).len() < 2 {
            return Err(OperationError::InvalidInput(
                "cutting line needs at least two distinct points".into(),
            )
            .into());
        }

        let result = dispatch(&target, &self.cutting_line, tolerance)?;
        debug!(split = result.is_some(), "split finished");
        Ok(result)
    }
}

/// Splits `geometry` with `cutting_line` using default options.
///
/// # Errors
///
/// See [`Split::execute`].
pub fn split(geometry: &Geometry, cutting_line: &LineString) -> Result<Option<Geometry>> {
    Split::new(geometry.clone(), cutting_line.clone()).execute()
}

fn dispatch(
    target: &SplitTarget,
    cutting_line: &LineString,
    tolerance: f64,
) -> Result<Option<Geometry>> {
    match target {
        SplitTarget::LineString(line) => {
            Ok(split_line(line, cutting_line, tolerance).map(Geometry::MultiLineString))
        }
        SplitTarget::MultiLineString(lines) => {
            Ok(split_lines(lines, cutting_line, tolerance).map(Geometry::MultiLineString))
        }
        SplitTarget::Polygon(polygon) => {
            Ok(split_polygon(polygon, cutting_line, tolerance)?.map(aggregate))
        }
        SplitTarget::MultiPolygon(polygons) => {
            Ok(split_polygons(polygons, cutting_line, tolerance)?.map(Geometry::MultiPolygon))
        }
    }
}

fn split_lines(
    lines: &MultiLineString,
    cutting_line: &LineString,
    tolerance: f64,
) -> Option<MultiLineString> {
    let mut any_split = false;
    let mut out = Vec::new();
    for line in &lines.0 {
        match split_line(line, cutting_line, tolerance) {
            Some(parts) => {
                any_split = true;
                out.extend(parts.0);
            }
            None => out.push(line.clone()),
        }
    }
    debug!(members = lines.0.len(), any_split, "split multi line string");
    any_split.then(|| MultiLineString::new(out))
}

fn split_polygons(
    polygons: &MultiPolygon,
    cutting_line: &LineString,
    tolerance: f64,
) -> Result<Option<MultiPolygon>> {
    let mut any_split = false;
    let mut out = Vec::new();
    for polygon in &polygons.0 {
        match split_polygon(polygon, cutting_line, tolerance)? {
            Some(parts) => {
                any_split = true;
                out.extend(parts);
            }
            None => out.push(polygon.clone()),
        }
    }
    debug!(members = polygons.0.len(), any_split, "split multi polygon");
    Ok(any_split.then(|| MultiPolygon::new(out)))
}

fn aggregate(mut polygons: Vec<Polygon>) -> Geometry {
    if polygons.len() == 1 {
        if let Some(polygon) = polygons.pop() {
            return Geometry::Polygon(polygon);
        }
    }
    Geometry::MultiPolygon(MultiPolygon::new(polygons))
}

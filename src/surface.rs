//! The drawing surface boundary.
//!
//! Everything the controller draws goes through [`Context2d`], a small
//! immediate-mode 2D API in the shape of an HTML canvas context. A
//! [`Surface`] is the element the context belongs to: it carries the
//! width/height dimension attributes and hands out the context.
//!
//! The crate ships a software implementation in [`raster`](crate::raster);
//! anything else that can fill rectangles and stroke lines can implement
//! these traits and host the effect.

use crate::color::Color;

/// A 2D immediate-mode drawing context.
pub trait Context2d {
    /// Color used by [`fill_rect`](Self::fill_rect).
    fn set_fill_style(&mut self, color: Color);

    /// Color used by [`stroke`](Self::stroke).
    fn set_stroke_style(&mut self, color: Color);

    /// Stroke width in pixels.
    fn set_line_width(&mut self, width: f32);

    /// Composite the fill style over a rectangle.
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Reset a rectangle to transparent.
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Discard the current path and start a new one.
    fn begin_path(&mut self);

    /// Start a new subpath at the given point.
    fn move_to(&mut self, x: f32, y: f32);

    /// Extend the current subpath with a straight line.
    fn line_to(&mut self, x: f32, y: f32);

    /// Draw the current path with the stroke style and line width.
    fn stroke(&mut self);

    /// Close the current subpath back to its starting point.
    fn close_path(&mut self);
}

/// One of the two pixel-dimension attributes of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Width,
    Height,
}

impl Dimension {
    /// Both dimensions, width first.
    pub const ALL: [Dimension; 2] = [Dimension::Width, Dimension::Height];

    /// Attribute name as written in markup.
    pub fn attribute(&self) -> &'static str {
        match self {
            Dimension::Width => "width",
            Dimension::Height => "height",
        }
    }
}

/// An element that may host a 2D drawing context.
pub trait Surface {
    /// Context handle returned by [`context_2d`](Self::context_2d).
    type Context: Context2d;

    /// Whether this element is a canvas at all.
    fn is_drawable(&self) -> bool;

    /// Acquire the 2D context. `None` when the element cannot provide one.
    fn context_2d(&mut self) -> Option<Self::Context>;

    /// Current value of a dimension attribute, `None` when unset.
    fn dimension(&self, dimension: Dimension) -> Option<u32>;

    /// Write a dimension attribute. Resizes the backing store.
    fn set_dimension(&mut self, dimension: Dimension, value: u32);
}

/// Resolves string selectors to surfaces.
pub trait SurfaceLookup {
    type Surface: Surface;

    /// First element matching `selector`, if any.
    fn query(&self, selector: &str) -> Option<Self::Surface>;
}

/// Make both dimension attributes equal `size`.
///
/// Writes nothing when both already match. Returns whether anything was written.
pub fn sync_dimensions<S: Surface + ?Sized>(surface: &mut S, size: u32) -> bool {
    let in_sync = Dimension::ALL
        .iter()
        .all(|&dimension| surface.dimension(dimension) == Some(size));

    if in_sync {
        return false;
    }

    for dimension in Dimension::ALL {
        log::trace!("Setting surface {} to {}", dimension.attribute(), size);
        surface.set_dimension(dimension, size);
    }
    true
}

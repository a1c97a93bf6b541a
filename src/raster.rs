//! Software canvas.
//!
//! [`PixelCanvas`] is an RGBA pixel buffer that behaves like an HTML canvas
//! element: it has optional `width`/`height` attributes (300x150 when
//! unset), writing an attribute reallocates and clears the buffer, and it
//! hands out a [`PixelContext`] implementing [`Context2d`].
//!
//! Canvas and context are cheap handles onto the same shared state, the
//! way a DOM element and its context are. Everything here is
//! single-threaded (`Rc`/`RefCell`).
//!
//! [`Document`] is a flat element registry that resolves `#id`, `.class` and
//! tag selectors, so controllers can be built from a selector string.

use crate::color::Color;
use crate::surface::{Context2d, Dimension, Surface, SurfaceLookup};
use glam::Vec2;
use std::cell::{Ref, RefCell};
use std::rc::Rc;

/// Width of a canvas with no `width` attribute.
pub const DEFAULT_WIDTH: u32 = 300;
/// Height of a canvas with no `height` attribute.
pub const DEFAULT_HEIGHT: u32 = 150;
/// Largest edge length a canvas can back with pixels. Larger canvases
/// cannot provide a drawing context.
pub const MAX_CANVAS_DIMENSION: u32 = 8192;

/// A straight-alpha RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    data: Vec<[u8; 4]>,
}

impl Pixmap {
    /// A fully transparent pixmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![[0; 4]; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at `(x, y)`, `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[(y * self.width + x) as usize])
    }

    /// Row-major RGBA bytes.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }

    /// Whether every pixel is fully transparent.
    pub fn is_clear(&self) -> bool {
        self.data.iter().all(|px| px[3] == 0)
    }

    /// Number of pixels that are not fully transparent.
    pub fn painted_pixels(&self) -> usize {
        self.data.iter().filter(|px| px[3] != 0).count()
    }

    /// Pixel-aligned span of `[start, start + len)` clipped to `0..limit`.
    fn span(start: f32, len: f32, limit: u32) -> (u32, u32) {
        let (a, b) = if len < 0.0 { (start + len, start) } else { (start, start + len) };
        let lo = a.round().clamp(0.0, limit as f32) as u32;
        let hi = b.round().clamp(0.0, limit as f32) as u32;
        (lo, hi)
    }

    /// Composite `color` over the rectangle.
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        if color.a <= 0.0 {
            return;
        }
        let (x0, x1) = Self::span(x, width, self.width);
        let (y0, y1) = Self::span(y, height, self.height);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, color, 1.0);
            }
        }
    }

    /// Reset the rectangle to transparent black.
    pub fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let (x0, x1) = Self::span(x, width, self.width);
        let (y0, y1) = Self::span(y, height, self.height);
        for py in y0..y1 {
            let row = (py * self.width) as usize;
            self.data[row + x0 as usize..row + x1 as usize].fill([0; 4]);
        }
    }

    /// Stroke a straight segment with butt caps and one pixel of antialiasing.
    pub fn stroke_segment(&mut self, from: Vec2, to: Vec2, line_width: f32, color: Color) {
        let delta = to - from;
        let length = delta.length();
        if length <= f32::EPSILON || line_width <= 0.0 || color.a <= 0.0 {
            return;
        }
        if self.width == 0 || self.height == 0 {
            return;
        }

        let along = delta / length;
        let across = along.perp();
        let half_width = line_width / 2.0;

        let pad = half_width + 1.0;
        let min = from.min(to) - Vec2::splat(pad);
        let max = from.max(to) + Vec2::splat(pad);
        let x0 = min.x.floor().max(0.0) as u32;
        let y0 = min.y.floor().max(0.0) as u32;
        let x1 = (max.x.ceil().max(0.0) as u32).min(self.width);
        let y1 = (max.y.ceil().max(0.0) as u32).min(self.height);

        for py in y0..y1 {
            for px in x0..x1 {
                let center = Vec2::new(px as f32 + 0.5, py as f32 + 0.5);
                let rel = center - from;
                let t = rel.dot(along);
                let s = rel.dot(across).abs();

                let across_cover = (half_width - s + 0.5).clamp(0.0, 1.0);
                let along_cover = (t.min(length - t) + 0.5).clamp(0.0, 1.0);
                let coverage = across_cover * along_cover;
                if coverage > 0.0 {
                    self.blend(px, py, color, coverage);
                }
            }
        }
    }

    /// Source-over compositing of `color` at `coverage` onto one pixel.
    fn blend(&mut self, x: u32, y: u32, color: Color, coverage: f32) {
        let index = (y * self.width + x) as usize;
        let dst = self.data[index];

        let src_a = (color.a * coverage).clamp(0.0, 1.0);
        let dst_a = dst[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            self.data[index] = [0; 4];
            return;
        }

        let channel = |src: u8, dst: u8| -> u8 {
            let value = (src as f32 * src_a + dst as f32 * dst_a * (1.0 - src_a)) / out_a;
            value.round().clamp(0.0, 255.0) as u8
        };

        self.data[index] = [
            channel(color.r, dst[0]),
            channel(color.g, dst[1]),
            channel(color.b, dst[2]),
            (out_a * 255.0).round() as u8,
        ];
    }
}

#[derive(Debug, Clone, Default)]
struct Subpath {
    points: Vec<Vec2>,
    closed: bool,
}

/// Context state shared by every handle onto one canvas.
#[derive(Debug, Clone)]
struct DrawState {
    fill_style: Color,
    stroke_style: Color,
    line_width: f32,
    path: Vec<Subpath>,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            fill_style: Color::BLACK,
            stroke_style: Color::BLACK,
            line_width: 1.0,
            path: Vec::new(),
        }
    }
}

#[derive(Debug)]
struct CanvasState {
    width_attr: Option<u32>,
    height_attr: Option<u32>,
    pixmap: Pixmap,
    draw: DrawState,
    oversized: bool,
}

impl CanvasState {
    fn new(width_attr: Option<u32>, height_attr: Option<u32>) -> Self {
        let mut state = Self {
            width_attr,
            height_attr,
            pixmap: Pixmap::new(0, 0),
            draw: DrawState::default(),
            oversized: false,
        };
        state.reallocate();
        state
    }

    /// Rebuild the backing store after a dimension change. Like a DOM
    /// canvas, this clears the pixels and resets the context state.
    fn reallocate(&mut self) {
        let width = self.width_attr.unwrap_or(DEFAULT_WIDTH);
        let height = self.height_attr.unwrap_or(DEFAULT_HEIGHT);

        self.oversized = width > MAX_CANVAS_DIMENSION || height > MAX_CANVAS_DIMENSION;
        self.pixmap = if self.oversized {
            Pixmap::new(0, 0)
        } else {
            Pixmap::new(width, height)
        };
        self.draw = DrawState::default();
    }
}

/// A software canvas element.
///
/// Cloning produces another handle onto the same canvas.
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    state: Rc<RefCell<CanvasState>>,
}

impl PixelCanvas {
    /// A canvas with no dimension attributes (300x150 pixels).
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(CanvasState::new(None, None))),
        }
    }

    /// A canvas with both dimension attributes set.
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            state: Rc::new(RefCell::new(CanvasState::new(Some(width), Some(height)))),
        }
    }

    /// Backing store width in pixels.
    pub fn width(&self) -> u32 {
        self.state.borrow().pixmap.width()
    }

    /// Backing store height in pixels.
    pub fn height(&self) -> u32 {
        self.state.borrow().pixmap.height()
    }

    /// Borrow the pixels. Do not hold across calls that draw.
    pub fn pixmap(&self) -> Ref<'_, Pixmap> {
        Ref::map(self.state.borrow(), |state| &state.pixmap)
    }

    /// Copy of the current pixels.
    pub fn snapshot(&self) -> Pixmap {
        self.state.borrow().pixmap.clone()
    }

    /// Whether two handles refer to the same canvas.
    pub fn same_canvas(&self, other: &PixelCanvas) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl Default for PixelCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for PixelCanvas {
    type Context = PixelContext;

    fn is_drawable(&self) -> bool {
        true
    }

    fn context_2d(&mut self) -> Option<PixelContext> {
        if self.state.borrow().oversized {
            return None;
        }
        Some(PixelContext {
            state: Rc::clone(&self.state),
        })
    }

    fn dimension(&self, dimension: Dimension) -> Option<u32> {
        let state = self.state.borrow();
        match dimension {
            Dimension::Width => state.width_attr,
            Dimension::Height => state.height_attr,
        }
    }

    fn set_dimension(&mut self, dimension: Dimension, value: u32) {
        let mut state = self.state.borrow_mut();
        match dimension {
            Dimension::Width => state.width_attr = Some(value),
            Dimension::Height => state.height_attr = Some(value),
        }
        state.reallocate();
    }
}

/// 2D context of a [`PixelCanvas`].
#[derive(Debug, Clone)]
pub struct PixelContext {
    state: Rc<RefCell<CanvasState>>,
}

impl PixelContext {
    /// The canvas this context draws into.
    pub fn canvas(&self) -> PixelCanvas {
        PixelCanvas {
            state: Rc::clone(&self.state),
        }
    }
}

impl Context2d for PixelContext {
    fn set_fill_style(&mut self, color: Color) {
        self.state.borrow_mut().draw.fill_style = color;
    }

    fn set_stroke_style(&mut self, color: Color) {
        self.state.borrow_mut().draw.stroke_style = color;
    }

    fn set_line_width(&mut self, width: f32) {
        // Non-positive and non-finite widths are ignored, as on the web.
        if width.is_finite() && width > 0.0 {
            self.state.borrow_mut().draw.line_width = width;
        }
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let mut state = self.state.borrow_mut();
        let color = state.draw.fill_style;
        state.pixmap.fill_rect(x, y, width, height, color);
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.state.borrow_mut().pixmap.clear_rect(x, y, width, height);
    }

    fn begin_path(&mut self) {
        self.state.borrow_mut().draw.path.clear();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.state.borrow_mut().draw.path.push(Subpath {
            points: vec![Vec2::new(x, y)],
            closed: false,
        });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let point = Vec2::new(x, y);
        let mut state = self.state.borrow_mut();
        match state.draw.path.last_mut() {
            Some(subpath) if !subpath.closed => subpath.points.push(point),
            // No open subpath: behaves like move_to
            _ => state.draw.path.push(Subpath {
                points: vec![point],
                closed: false,
            }),
        }
    }

    fn stroke(&mut self) {
        let mut state = self.state.borrow_mut();
        let CanvasState { pixmap, draw, .. } = &mut *state;

        for subpath in &draw.path {
            for pair in subpath.points.windows(2) {
                pixmap.stroke_segment(pair[0], pair[1], draw.line_width, draw.stroke_style);
            }
            if subpath.closed && subpath.points.len() > 2 {
                if let (Some(&last), Some(&first)) = (subpath.points.last(), subpath.points.first()) {
                    pixmap.stroke_segment(last, first, draw.line_width, draw.stroke_style);
                }
            }
        }
    }

    fn close_path(&mut self) {
        let mut state = self.state.borrow_mut();
        let start = match state.draw.path.last_mut() {
            Some(subpath) if !subpath.closed => {
                subpath.closed = true;
                subpath.points[0]
            }
            _ => return,
        };
        // The next subpath starts where the closed one began
        state.draw.path.push(Subpath {
            points: vec![start],
            closed: false,
        });
    }
}

/// An element in a [`Document`]. Only `canvas` elements are drawable.
#[derive(Debug, Clone)]
pub struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    canvas: Option<PixelCanvas>,
}

impl Node {
    /// A `<canvas>` element backed by `canvas`.
    pub fn canvas(canvas: PixelCanvas) -> Self {
        Self {
            tag: "canvas".to_string(),
            id: None,
            classes: Vec::new(),
            canvas: Some(canvas),
        }
    }

    /// A non-drawable element such as a `div`.
    pub fn element(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            classes: Vec::new(),
            canvas: None,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The backing canvas, for canvas elements.
    pub fn as_canvas(&self) -> Option<&PixelCanvas> {
        self.canvas.as_ref()
    }

    fn matches(&self, selector: &str) -> bool {
        let selector = selector.trim();
        if let Some(id) = selector.strip_prefix('#') {
            self.id.as_deref() == Some(id)
        } else if let Some(class) = selector.strip_prefix('.') {
            self.classes.iter().any(|c| c == class)
        } else {
            !selector.is_empty() && self.tag.eq_ignore_ascii_case(selector)
        }
    }
}

impl Surface for Node {
    type Context = PixelContext;

    fn is_drawable(&self) -> bool {
        self.canvas.is_some()
    }

    fn context_2d(&mut self) -> Option<PixelContext> {
        self.canvas.as_mut().and_then(|canvas| canvas.context_2d())
    }

    fn dimension(&self, dimension: Dimension) -> Option<u32> {
        self.canvas.as_ref().and_then(|canvas| canvas.dimension(dimension))
    }

    fn set_dimension(&mut self, dimension: Dimension, value: u32) {
        if let Some(canvas) = self.canvas.as_mut() {
            canvas.set_dimension(dimension, value);
        }
    }
}

/// A flat list of elements queried in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element.
    pub fn insert(&mut self, node: Node) -> &mut Self {
        self.nodes.push(node);
        self
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, node: Node) -> Self {
        self.nodes.push(node);
        self
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl SurfaceLookup for Document {
    type Surface = Node;

    fn query(&self, selector: &str) -> Option<Node> {
        self.nodes.iter().find(|node| node.matches(selector)).cloned()
    }
}

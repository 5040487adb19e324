//! Drawable output of a layout pass.
//!
//! Positions are world coordinates. A viewport maps them to the screen.

use rgb::RGB8;

use crate::gene::GeneId;

// arrow outline constants, in local units before scaling
pub const SHAFT_HEIGHT: f64 = 10.0;
pub const HEAD_LENGTH: f64 = 25.0;
pub const HEAD_APEX_Y: f64 = 5.0;
pub const HEAD_TOP_Y: f64 = -10.0;
pub const HEAD_BOTTOM_Y: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Index of a primitive within one layout result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrimitiveId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub from: Point,
    pub to: Point,
    pub stroke: RGB8,
    pub width: f64,
    pub selectable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub text: String,
    // top-left corner
    pub at: Point,
    pub size: f64,
    pub stroke: RGB8,
}

/// Notched-rectangle-plus-head outline of a gene arrow, pointing right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowShape {
    length: f64,
}

impl ArrowShape {
    pub fn new(length: f64) -> Self {
        ArrowShape { length }
    }

    /// Shaft length, excluding the head.
    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn shaft(&self) -> [Point; 4] {
        let l = self.length;
        [
            Point::new(0.0, 0.0),
            Point::new(l, 0.0),
            Point::new(l, SHAFT_HEIGHT),
            Point::new(0.0, SHAFT_HEIGHT),
        ]
    }

    pub fn head(&self) -> [Point; 4] {
        let l = self.length;
        [
            Point::new(l, 0.0),
            Point::new(l, HEAD_BOTTOM_Y),
            Point::new(l + HEAD_LENGTH, HEAD_APEX_Y),
            Point::new(l, HEAD_TOP_Y),
        ]
    }

    /// Local bounding box as (min, max).
    pub fn bounds(&self) -> (Point, Point) {
        (
            Point::new(0.0, HEAD_TOP_Y),
            Point::new(self.length + HEAD_LENGTH, HEAD_BOTTOM_Y),
        )
    }

    pub fn center(&self) -> Point {
        let (min, max) = self.bounds();
        Point::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    // source gene; the gene itself stays in the dataset
    pub gene: GeneId,
    // 0-based index of the track in the dataset
    pub track: usize,
    pub shape: ArrowShape,
    // world position of the bounding box's top-left corner
    pub left: f64,
    pub top: f64,
    pub scale: f64,
    // degrees, about the shape's own center
    pub rotation: u16,
    pub fill: RGB8,
}

impl Arrow {
    pub fn rotate(&mut self, degrees: u16) {
        self.rotation = (self.rotation + degrees % 360) % 360;
    }

    fn rotate_local(&self, p: Point) -> Point {
        let c = self.shape.center();
        match self.rotation {
            0 => p,
            180 => Point::new(2.0 * c.x - p.x, 2.0 * c.y - p.y),
            deg => {
                let (sin, cos) = f64::from(deg).to_radians().sin_cos();
                let (dx, dy) = (p.x - c.x, p.y - c.y);
                Point::new(c.x + dx * cos - dy * sin, c.y + dx * sin + dy * cos)
            }
        }
    }

    fn to_world(&self, p: Point) -> Point {
        let (min, _) = self.shape.bounds();
        let r = self.rotate_local(p);
        Point::new(
            self.left + self.scale * (r.x - min.x),
            self.top + self.scale * (r.y - min.y),
        )
    }

    /// Shaft and head polygons in world coordinates.
    pub fn outline(&self) -> [[Point; 4]; 2] {
        let shaft = self.shape.shaft();
        let head = self.shape.head();
        [
            [
                self.to_world(shaft[0]),
                self.to_world(shaft[1]),
                self.to_world(shaft[2]),
                self.to_world(shaft[3]),
            ],
            [
                self.to_world(head[0]),
                self.to_world(head[1]),
                self.to_world(head[2]),
                self.to_world(head[3]),
            ],
        ]
    }

    /// World bounding box as (min, max). Only exact for 0 and 180 degrees.
    pub fn bounds(&self) -> (Point, Point) {
        let (min, max) = self.shape.bounds();
        (
            Point::new(self.left, self.top),
            Point::new(
                self.left + self.scale * (max.x - min.x),
                self.top + self.scale * (max.y - min.y),
            ),
        )
    }

    pub fn contains(&self, p: Point) -> bool {
        let (min, max) = self.bounds();
        p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line(Line),
    Arrow(Arrow),
    Text(Text),
}

impl Primitive {
    pub fn as_arrow(&self) -> Option<&Arrow> {
        match self {
            Primitive::Arrow(a) => Some(a),
            _ => None,
        }
    }
}

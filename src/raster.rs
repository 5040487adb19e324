//! Rasterizes a layout into an RGBA image and encodes it as PNG.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use line_drawing::XiaolinWu;
use log::debug;
use rgb::{RGB8, RGBA8};

use crate::color::{BLACK, HIGHLIGHT, WHITE};
use crate::error::GenoviewError;
use crate::layout::Layout;
use crate::primitive::{Arrow, Line, Point, Primitive, PrimitiveId};
use crate::view::{Selection, Viewport};

fn opaque(c: RGB8) -> RGBA8 {
    RGBA8::new(c.r, c.g, c.b, 255)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<RGBA8>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Canvas {
            width,
            height,
            pixels: vec![opaque(WHITE); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<RGBA8> {
        if x < self.width && y < self.height {
            Some(self.pixels[x + y * self.width])
        } else {
            None
        }
    }

    // alpha-blend `color` over the pixel at (x, y)
    fn blend(&mut self, x: i64, y: i64, color: RGB8, alpha: f64) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let px = &mut self.pixels[x as usize + y as usize * self.width];
        let a = alpha.max(0.0).min(1.0);
        let mix = |under: u8, over: u8| (under as f64 * (1.0 - a) + over as f64 * a).round() as u8;
        px.r = mix(px.r, color.r);
        px.g = mix(px.g, color.g);
        px.b = mix(px.b, color.b);
        px.a = 255;
    }

    fn stroke(&mut self, from: Point, to: Point, color: RGB8, width: f64) {
        let passes = width.round().max(1.0) as i64;
        let horizontal = (to.x - from.x).abs() >= (to.y - from.y).abs();
        for i in 0..passes {
            let shift = (i - passes / 2) as f64;
            let (dx, dy) = if horizontal { (0.0, shift) } else { (shift, 0.0) };
            let line =
                XiaolinWu::<f64, i64>::new((from.x + dx, from.y + dy), (to.x + dx, to.y + dy));
            for ((x, y), val) in line {
                self.blend(x, y, color, val);
            }
        }
    }

    // even-odd scanline fill, sampled at pixel centers
    fn fill_polygon(&mut self, poly: &[Point], color: RGB8) {
        let min_y = poly.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = poly.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        let y0 = min_y.floor().max(0.0) as i64;
        let y1 = max_y.ceil().min(self.height as f64) as i64;
        let mut crossings = Vec::new();
        for y in y0..y1 {
            let sy = y as f64 + 0.5;
            crossings.clear();
            for (i, a) in poly.iter().enumerate() {
                let b = poly[(i + 1) % poly.len()];
                if (a.y <= sy && b.y > sy) || (b.y <= sy && a.y > sy) {
                    crossings.push(a.x + (sy - a.y) / (b.y - a.y) * (b.x - a.x));
                }
            }
            crossings.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            for span in crossings.chunks(2) {
                if let [left, right] = span {
                    let x0 = (left - 0.5).ceil() as i64;
                    let x1 = (right - 0.5).floor() as i64;
                    for x in x0..=x1 {
                        self.blend(x, y, color, 1.0);
                    }
                }
            }
        }
    }

    fn draw_line(&mut self, line: &Line, viewport: &Viewport) {
        let from = viewport.to_screen(line.from);
        let to = viewport.to_screen(line.to);
        self.stroke(from, to, line.stroke, line.width * viewport.zoom);
    }

    fn draw_arrow(&mut self, arrow: &Arrow, fill: RGB8, viewport: &Viewport) {
        for part in arrow.outline().iter() {
            let screen: Vec<Point> = part.iter().map(|&p| viewport.to_screen(p)).collect();
            self.fill_polygon(&screen, fill);
            for (i, &a) in screen.iter().enumerate() {
                self.stroke(a, screen[(i + 1) % screen.len()], BLACK, 1.0);
            }
        }
    }

    /// Draws every primitive through `viewport`. Selected arrows use the
    /// highlight fill. Text is not rasterized.
    pub fn draw(&mut self, layout: &Layout, viewport: &Viewport, selection: &Selection) {
        let mut skipped = 0;
        for (i, primitive) in layout.primitives().iter().enumerate() {
            match primitive {
                Primitive::Line(line) => self.draw_line(line, viewport),
                Primitive::Arrow(arrow) => {
                    let fill = if selection.contains(PrimitiveId(i)) {
                        HIGHLIGHT
                    } else {
                        arrow.fill
                    };
                    self.draw_arrow(arrow, fill, viewport);
                }
                Primitive::Text(_) => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!("skipped {} text primitives", skipped);
        }
    }

    pub fn to_png(&self) -> Result<Vec<u8>, GenoviewError> {
        Ok(lodepng::encode32(&self.pixels, self.width, self.height)?)
    }

    pub fn write_png(&self, path: impl AsRef<Path>) -> Result<(), GenoviewError> {
        lodepng::encode32_file(path, &self.pixels, self.width, self.height)?;
        Ok(())
    }

    /// A standalone HTML page with the PNG inlined as a data URI.
    pub fn to_html(&self, title: &str) -> Result<String, GenoviewError> {
        let png = STANDARD.encode(self.to_png()?);
        let title = escape_html(title);
        Ok(format!(
            "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n\
             <body>\n<img alt=\"{}\" src=\"data:image/png;base64,{}\">\n</body>\n</html>\n",
            title, title, png
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::GRAY;
    use crate::primitive::ArrowShape;

    fn arrow() -> Arrow {
        Arrow {
            gene: 1,
            track: 0,
            shape: ArrowShape::new(40.0),
            left: 10.0,
            top: 10.0,
            scale: 1.0,
            rotation: 0,
            fill: GRAY,
        }
    }

    #[test]
    fn fills_arrow_body() {
        let mut canvas = Canvas::new(100, 60);
        canvas.draw_arrow(&arrow(), GRAY, &Viewport::default());
        // shaft spans y 20..30 on screen, head apex at x 75
        assert_eq!(canvas.pixel(30, 25), Some(opaque(GRAY)));
        assert_eq!(canvas.pixel(5, 25), Some(opaque(WHITE)));
        assert_eq!(canvas.pixel(90, 25), Some(opaque(WHITE)));
    }

    #[test]
    fn horizontal_line_is_dark() {
        let mut canvas = Canvas::new(50, 20);
        let line = Line {
            from: Point::new(5.0, 10.0),
            to: Point::new(45.0, 10.0),
            stroke: BLACK,
            width: 1.0,
            selectable: false,
        };
        canvas.draw_line(&line, &Viewport::default());
        assert!((9..=11).any(|y| canvas.pixel(20, y).map_or(false, |p| p.r < 255)));
        assert_eq!(canvas.pixel(20, 2), Some(opaque(WHITE)));
    }

    #[test]
    fn encodes_png_and_html() {
        let canvas = Canvas::new(8, 4);
        let png = canvas.to_png().unwrap();
        assert_eq!(&png[1..4], b"PNG");
        let html = canvas.to_html("genomes").unwrap();
        assert!(html.contains("data:image/png;base64,iVBORw0KGgo"));
        assert!(html.contains("<title>genomes</title>"));
    }

    #[test]
    fn html_title_is_escaped() {
        let html = Canvas::new(2, 2).to_html("a<b>&\"c\"").unwrap();
        assert!(html.contains("<title>a&lt;b&gt;&amp;&quot;c&quot;</title>"));
        assert!(html.contains("alt=\"a&lt;b&gt;&amp;&quot;c&quot;\""));
        assert!(!html.contains("<b>"));
    }
}

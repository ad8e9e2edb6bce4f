//! SVG canvas backend.
//!
//! Implements [`Canvas`] by appending SVG markup, baking the current
//! transform into every coordinate as it is written. Raster images are
//! embedded as base64 PNG data URIs.
//!
//! # Tags
//!
//! In unique-tag mode every drawn element gets an `id`. Stroke calls
//! append `@stroke` to the logical tag, and repeated uses of the same
//! resulting tag are suffixed `@<index>` with the occurrence index, so
//! downstream interactive tooling can address each draw call by a
//! stable, unambiguous id.

use std::collections::HashMap;
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Write;
use std::path::Path as FsPath;

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::canvas::{Canvas, CanvasState, LineCap, LineJoin, Path, PathCmd, Stroke, TextAnchor, TextSpan, Transform};
use crate::color::Rgba;
use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::geometry::Rect;
use crate::output::PngEncoder;

/// Canvas that renders to an SVG document.
#[derive(Debug, Clone)]
pub struct SvgCanvas {
    width: f64,
    height: f64,
    background: Option<Rgba>,
    unique_tags: bool,
    tag_counts: HashMap<String, usize>,
    state: CanvasState,
    stack: Vec<(CanvasState, Option<String>)>,
    defs: String,
    body: String,
    clip_count: usize,
    clip_id: Option<String>,
}

fn hex_rgb(c: Rgba) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl SvgCanvas {
    /// Create an SVG canvas of the given extent with a white background.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            background: Some(Rgba::WHITE),
            unique_tags: false,
            tag_counts: HashMap::new(),
            state: CanvasState::default(),
            stack: Vec::new(),
            defs: String::new(),
            body: String::new(),
            clip_count: 0,
            clip_id: None,
        }
    }

    /// Set the background color (`None` for transparent).
    #[must_use]
    pub fn background(mut self, color: Option<Rgba>) -> Self {
        self.background = color;
        self
    }

    /// Emit a unique `id` attribute for every tagged draw call.
    #[must_use]
    pub fn unique_tags(mut self) -> Self {
        self.unique_tags = true;
        self
    }

    /// The tag an element will be written under, applying the
    /// unique-tag suffix convention.
    fn resolve_tag(&mut self, tag: Option<&str>, stroke: bool) -> Option<String> {
        let tag = tag?;
        let tag = if stroke {
            format!("{tag}@stroke")
        } else {
            tag.to_string()
        };
        if !self.unique_tags {
            return Some(tag);
        }
        let n = self.tag_counts.entry(tag.clone()).or_insert(0);
        let id = if *n == 0 {
            tag.clone()
        } else {
            format!("{tag}@{n}")
        };
        *n += 1;
        Some(id)
    }

    fn id_attr(&mut self, tag: Option<&str>, stroke: bool) -> String {
        match self.resolve_tag(tag, stroke) {
            Some(id) => format!(" id=\"{}\"", escape_text(&id)),
            None => String::new(),
        }
    }

    fn clip_attr(&self) -> String {
        match &self.clip_id {
            Some(id) => format!(" clip-path=\"url(#{id})\""),
            None => String::new(),
        }
    }

    /// SVG path data with the current transform baked in.
    fn path_data(&self, path: &Path) -> String {
        let t = &self.state.transform;
        let mut d = String::new();
        for cmd in path.commands() {
            match cmd {
                PathCmd::MoveTo(p) => {
                    let p = t.apply(*p);
                    let _ = write!(d, "M{:.2} {:.2} ", p.x, p.y);
                }
                PathCmd::LineTo(p) => {
                    let p = t.apply(*p);
                    let _ = write!(d, "L{:.2} {:.2} ", p.x, p.y);
                }
                PathCmd::CubicTo(c1, c2, end) => {
                    let (c1, c2, end) = (t.apply(*c1), t.apply(*c2), t.apply(*end));
                    let _ = write!(
                        d,
                        "C{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} ",
                        c1.x, c1.y, c2.x, c2.y, end.x, end.y
                    );
                }
                PathCmd::Close => d.push_str("Z "),
            }
        }
        d.trim_end().to_string()
    }

    fn opacity_attr(name: &str, color: Rgba) -> String {
        if color.a == 255 {
            String::new()
        } else {
            format!(" {name}=\"{:.3}\"", f64::from(color.a) / 255.0)
        }
    }

    /// Render the accumulated document.
    #[must_use]
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{:.0}\" height=\"{:.0}\" \
             viewBox=\"0 0 {:.0} {:.0}\">\n",
            self.width, self.height, self.width, self.height
        );
        if !self.defs.is_empty() {
            let _ = write!(out, "<defs>\n{}</defs>\n", self.defs);
        }
        if let Some(bg) = self.background {
            let _ = write!(
                out,
                "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n",
                hex_rgb(bg)
            );
        }
        out.push_str(&self.body);
        out.push_str("</svg>\n");
        out
    }

    /// Write the document to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file creation or writing fails.
    pub fn write_to_file<P: AsRef<FsPath>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.to_svg().as_bytes())?;
        Ok(())
    }
}

impl Canvas for SvgCanvas {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn fill_path(&mut self, path: &Path, fill: Rgba, tag: Option<&str>) {
        if path.is_empty() || path.has_nan() {
            return;
        }
        let id = self.id_attr(tag, false);
        let clip = self.clip_attr();
        let d = self.path_data(path);
        let _ = write!(
            self.body,
            "<path{id}{clip} d=\"{d}\" fill=\"{}\"{} fill-rule=\"evenodd\"/>\n",
            hex_rgb(fill),
            Self::opacity_attr("fill-opacity", fill),
        );
    }

    fn stroke_path(&mut self, path: &Path, stroke: &Stroke, tag: Option<&str>) {
        if path.is_empty() || path.has_nan() {
            return;
        }
        let id = self.id_attr(tag, true);
        let clip = self.clip_attr();
        let d = self.path_data(path);
        let cap = match stroke.cap {
            LineCap::Butt => "butt",
            LineCap::Round => "round",
            LineCap::Square => "square",
        };
        let join = match stroke.join {
            LineJoin::Miter => "miter",
            LineJoin::Round => "round",
            LineJoin::Bevel => "bevel",
        };
        let dash = match &stroke.dash {
            Some(pattern) => {
                let joined: Vec<String> = pattern.iter().map(|v| format!("{v:.1}")).collect();
                format!(" stroke-dasharray=\"{}\"", joined.join(" "))
            }
            None => String::new(),
        };
        let _ = write!(
            self.body,
            "<path{id}{clip} d=\"{d}\" fill=\"none\" stroke=\"{}\"{} stroke-width=\"{:.2}\" \
             stroke-linecap=\"{cap}\" stroke-linejoin=\"{join}\"{dash}/>\n",
            hex_rgb(stroke.color),
            Self::opacity_attr("stroke-opacity", stroke.color),
            stroke.width,
        );
    }

    fn fill_text(&mut self, span: &TextSpan, tag: Option<&str>) {
        if span.position.is_nan() {
            return;
        }
        let id = self.id_attr(tag, false);
        let clip = self.clip_attr();
        let p = self.state.transform.apply(span.position);
        let anchor = match span.anchor {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        };
        let rotation = if span.angle == 0.0 {
            String::new()
        } else {
            format!(
                " transform=\"rotate({:.2} {:.2} {:.2})\"",
                span.angle.to_degrees(),
                p.x,
                p.y
            )
        };
        let _ = write!(
            self.body,
            "<text{id}{clip} x=\"{:.2}\" y=\"{:.2}\" font-size=\"{:.1}\" \
             font-family=\"sans-serif\" text-anchor=\"{anchor}\" fill=\"{}\"{}{rotation}>{}</text>\n",
            p.x,
            p.y,
            span.size,
            hex_rgb(span.color),
            Self::opacity_attr("fill-opacity", span.color),
            escape_text(&span.text),
        );
    }

    fn draw_image(&mut self, rect: Rect, image: &Framebuffer, tag: Option<&str>) {
        let Ok(png_bytes) = PngEncoder::to_bytes(image) else {
            return;
        };
        let id = self.id_attr(tag, false);
        let clip = self.clip_attr();
        let origin = self.state.transform.apply(crate::geometry::Point::new(rect.x, rect.y));
        let data = STANDARD.encode(&png_bytes);
        let _ = write!(
            self.body,
            "<image{id}{clip} x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" \
             preserveAspectRatio=\"none\" href=\"data:image/png;base64,{data}\"/>\n",
            origin.x, origin.y, rect.width, rect.height,
        );
    }

    fn save(&mut self) {
        self.stack.push((self.state.clone(), self.clip_id.clone()));
    }

    fn restore(&mut self) {
        if let Some((state, clip_id)) = self.stack.pop() {
            self.state = state;
            self.clip_id = clip_id;
        } else {
            self.state = CanvasState::default();
            self.clip_id = None;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.state.transform = self.state.transform.then(&Transform::translate(dx, dy));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.state.transform = self.state.transform.then(&Transform::scale(sx, sy));
    }

    fn rotate(&mut self, angle: f64) {
        self.state.transform = self.state.transform.then(&Transform::rotate(angle));
    }

    fn clip_rect(&mut self, rect: Rect) {
        let corner = self.state.transform.apply(crate::geometry::Point::new(rect.x, rect.y));
        let id = format!("clip{}", self.clip_count);
        self.clip_count += 1;
        let _ = write!(
            self.defs,
            "<clipPath id=\"{id}\"><rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" \
             height=\"{:.2}\"/></clipPath>\n",
            corner.x, corner.y, rect.width, rect.height,
        );
        self.state.clip = Some(rect);
        self.clip_id = Some(id);
    }
}

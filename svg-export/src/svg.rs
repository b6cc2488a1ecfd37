// This code is a thin Rust wrapper to handle SVG tags
// and render them to SVG markup.

use std::fmt::Write;

// ----------------------------------------------------------------------------
//
//
// Rust representation and rendering of SVG tags.
//
//
// ----------------------------------------------------------------------------

/// Attributes or style declarations of a tag, rendered in key order.
pub type Params = std::collections::BTreeMap<String, String>;

pub trait RenderTag: std::fmt::Debug {
    fn render(&self, buf: &mut String);
}

impl<T> RenderTag for Tag<T>
where
    T: Identifier + std::fmt::Debug,
{
    fn render(&self, buf: &mut String) {
        write!(buf, "<{}", self.kind.identifier()).expect(FAILED_STRING_WRITE);
        for (k, v) in self.parameters.iter() {
            write!(buf, " {k}=\"{}\"", escape(v)).expect(FAILED_STRING_WRITE);
        }
        if !self.style.is_empty() {
            write!(buf, " style=\"").expect(FAILED_STRING_WRITE);
            for (k, v) in self.style.iter() {
                write!(buf, "{k}:{};", escape(v)).expect(FAILED_STRING_WRITE);
            }
            // Remove the surplus semicolon.
            buf.pop();
            write!(buf, "\"").expect(FAILED_STRING_WRITE);
        }
        if self.children.is_empty() {
            write!(buf, "/>").expect(FAILED_STRING_WRITE);
            return;
        }
        write!(buf, ">").expect(FAILED_STRING_WRITE);
        for c in self.children.iter() {
            c.render(buf);
        }
        write!(buf, "</{}>", self.kind.identifier()).expect(FAILED_STRING_WRITE);
    }
}

/// Character data inside a tag.
#[derive(Debug)]
pub struct Content(pub String);

impl RenderTag for Content {
    fn render(&self, buf: &mut String) {
        buf.push_str(&escape(&self.0));
    }
}

pub fn render(svg_tag: &Tag<SVG>) -> String {
    let mut raw_svg = String::new();
    svg_tag.render(&mut raw_svg);
    raw_svg
}

#[derive(Debug)]
pub struct Tag<T>
where
    T: std::fmt::Debug,
{
    parameters: Params,
    style: Params,
    children: Vec<Box<dyn RenderTag>>,
    kind: T,
}

impl<T> Tag<T>
where
    T: std::fmt::Debug,
{
    fn with_parameters(kind: T, parameters: &[(&str, String)], style: Option<Params>) -> Self {
        Self {
            parameters: parameters
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            style: style.unwrap_or_default(),
            children: Vec::new(),
            kind,
        }
    }

    pub fn add_child(&mut self, child: impl RenderTag + 'static) {
        self.children.push(Box::new(child));
    }

    pub fn add_children(&mut self, children: Vec<Box<dyn RenderTag>>) {
        self.children.extend(children);
    }

    pub fn set_parameter(&mut self, key: &str, value: &str) {
        self.parameters.insert(key.to_string(), value.to_string());
    }
}

// ----------------------------------------------------------------------------
//
//
// Creation of `new` tags.
//
//
// ----------------------------------------------------------------------------

impl Tag<SVG> {
    pub fn new(width: f64, height: f64, style: Option<Params>) -> Self {
        Self::with_parameters(
            SVG {},
            &[
                ("width", format!("{width}")),
                ("height", format!("{height}")),
                ("viewBox", format!("0 0 {width} {height}")),
                ("xmlns", "http://www.w3.org/2000/svg".to_string()),
            ],
            style,
        )
    }
}

impl Tag<Group> {
    pub fn new(transform: Option<String>, style: Option<Params>) -> Self {
        let parameters: Vec<_> = transform.map(|t| ("transform", t)).into_iter().collect();
        Self::with_parameters(Group {}, &parameters, style)
    }
}

impl Tag<Circle> {
    pub fn new(cx: f64, cy: f64, r: f64, style: Option<Params>) -> Self {
        Self::with_parameters(
            Circle {},
            &[
                ("cx", format!("{cx}")),
                ("cy", format!("{cy}")),
                ("r", format!("{r}")),
            ],
            style,
        )
    }
}

impl Tag<Rect> {
    pub fn new(x: f64, y: f64, width: f64, height: f64, style: Option<Params>) -> Self {
        Self::with_parameters(
            Rect {},
            &[
                ("x", format!("{x}")),
                ("y", format!("{y}")),
                ("width", format!("{width}")),
                ("height", format!("{height}")),
            ],
            style,
        )
    }
}

impl Tag<Text> {
    pub fn new(x: f64, y: f64, angle: f64, text: &str, style: Option<Params>) -> Self {
        let transform = if angle == 0.0 {
            format!("translate({x},{y})")
        } else {
            format!("translate({x},{y}) rotate({angle})")
        };
        let mut res = Self::with_parameters(Text {}, &[("transform", transform)], style);
        res.add_child(Content(text.to_string()));
        res
    }
}

impl Tag<Line> {
    pub fn new(x1: f64, x2: f64, y1: f64, y2: f64, style: Option<Params>) -> Self {
        Self::with_parameters(
            Line {},
            &[
                ("x1", format!("{x1}")),
                ("x2", format!("{x2}")),
                ("y1", format!("{y1}")),
                ("y2", format!("{y2}")),
            ],
            style,
        )
    }
}

// ----------------------------------------------------------------------------
//
//
// SVG tag kinds and their str representation (`identifier`)
//
//
// ----------------------------------------------------------------------------

#[derive(Debug)]
pub struct SVG {}
#[derive(Debug)]
pub struct Group {}
#[derive(Debug)]
pub struct Circle {}
#[derive(Debug)]
pub struct Rect {}
#[derive(Debug)]
pub struct Text {}
#[derive(Debug)]
pub struct Line {}

pub trait Identifier {
    fn identifier(&self) -> &'static str;
}

impl Identifier for SVG {
    fn identifier(&self) -> &'static str {
        "svg"
    }
}

impl Identifier for Group {
    fn identifier(&self) -> &'static str {
        "g"
    }
}

impl Identifier for Circle {
    fn identifier(&self) -> &'static str {
        "circle"
    }
}

impl Identifier for Rect {
    fn identifier(&self) -> &'static str {
        "rect"
    }
}

impl Identifier for Text {
    fn identifier(&self) -> &'static str {
        "text"
    }
}

impl Identifier for Line {
    fn identifier(&self) -> &'static str {
        "line"
    }
}

const FAILED_STRING_WRITE: &str = "Failed to write into string.";

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for chr in raw.chars() {
        match chr {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(items: &[(&str, &str)]) -> Option<Params> {
        Some(
            items
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_render_nested_tags() {
        let mut svg = Tag::<SVG>::new(400.0, 300.0, None);
        let rect = Tag::<Rect>::new(0.0, 0.0, 400.0, 300.0, opts(&[("fill", "red")]));
        let mut group = Tag::<Group>::new(Some("translate(10,20)".into()), None);
        group.add_child(Tag::<Text>::new(200.0, 150.0, 0.0, "This is a Test.", None));
        svg.add_child(rect);
        svg.add_child(group);

        assert_eq!(
            render(&svg),
            "<svg height=\"300\" viewBox=\"0 0 400 300\" width=\"400\" \
             xmlns=\"http://www.w3.org/2000/svg\">\
             <rect height=\"300\" width=\"400\" x=\"0\" y=\"0\" style=\"fill:red\"/>\
             <g transform=\"translate(10,20)\">\
             <text transform=\"translate(200,150)\">This is a Test.</text></g></svg>"
        );
    }

    #[test]
    fn test_text_is_escaped_and_rotated() {
        let text = Tag::<Text>::new(0.0, 0.0, -90.0, "GDP <$> & \"EPC\"", None);
        let mut buf = String::new();
        text.render(&mut buf);
        assert_eq!(
            buf,
            "<text transform=\"translate(0,0) rotate(-90)\">\
             GDP &lt;$&gt; &amp; &quot;EPC&quot;</text>"
        );
    }

    #[test]
    fn test_style_declarations_are_joined() {
        let mut circle = Tag::<Circle>::new(
            1.0,
            2.0,
            3.5,
            opts(&[("fill", "#1f77b4"), ("stroke", "none")]),
        );
        circle.set_parameter("class", "dot");
        let mut buf = String::new();
        circle.render(&mut buf);
        assert_eq!(
            buf,
            "<circle class=\"dot\" cx=\"1\" cy=\"2\" r=\"3.5\" style=\"fill:#1f77b4;stroke:none\"/>"
        );
    }
}

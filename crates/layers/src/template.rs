//! Remote tile URL templates.
//!
//! A template is a URL with any of `{WIDTH}`, `{HEIGHT}`, `{XMIN}`, `{XMAX}`,
//! `{YMIN}` and `{YMAX}` embedded, e.g.
//! `https://tiles.example/wms?BBOX={XMIN},{YMIN},{XMAX},{YMAX}&WIDTH={WIDTH}&HEIGHT={HEIGHT}`.
//! Other brace pairs are kept verbatim.

use std::fmt;

use crate::variants::TileRequest;

/// A substitutable field of a tile URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Width,
    Height,
    XMin,
    XMax,
    YMin,
    YMax,
}

impl Placeholder {
    const ALL: [Placeholder; 6] = [
        Placeholder::Width,
        Placeholder::Height,
        Placeholder::XMin,
        Placeholder::XMax,
        Placeholder::YMin,
        Placeholder::YMax,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Placeholder::Width => "WIDTH",
            Placeholder::Height => "HEIGHT",
            Placeholder::XMin => "XMIN",
            Placeholder::XMax => "XMAX",
            Placeholder::YMin => "YMIN",
            Placeholder::YMax => "YMAX",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.token() == token)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Field(Placeholder),
}

/// A parsed URL template.
#[derive(Debug, Clone, PartialEq)]
pub struct UrlTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl UrlTemplate {
    pub fn parse(template: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            literal.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let field = after
                .find('}')
                .and_then(|close| Placeholder::from_token(&after[..close]).map(|p| (p, close)));
            match field {
                Some((placeholder, close)) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Field(placeholder));
                    rest = &after[close + 1..];
                }
                None => {
                    literal.push('{');
                    rest = after;
                }
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self {
            source: template.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Placeholders in order of appearance.
    pub fn placeholders(&self) -> impl Iterator<Item = Placeholder> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Field(p) => Some(*p),
            Segment::Literal(_) => None,
        })
    }

    /// Substitute the request's size and extent.
    pub fn render(&self, request: &TileRequest) -> String {
        let mut url = String::with_capacity(self.source.len() + 32);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => url.push_str(text),
                Segment::Field(Placeholder::Width) => url.push_str(&request.width.to_string()),
                Segment::Field(Placeholder::Height) => url.push_str(&request.height.to_string()),
                Segment::Field(Placeholder::XMin) => url.push_str(&format_coordinate(request.bbox.min_x)),
                Segment::Field(Placeholder::XMax) => url.push_str(&format_coordinate(request.bbox.max_x)),
                Segment::Field(Placeholder::YMin) => url.push_str(&format_coordinate(request.bbox.min_y)),
                Segment::Field(Placeholder::YMax) => url.push_str(&format_coordinate(request.bbox.max_y)),
            }
        }
        url
    }
}

impl fmt::Display for UrlTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Shortest round-trip decimal form, always with a fractional part for
/// whole numbers (`-5.0`, `12.5`, `0.1`).
fn format_coordinate(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::BoundingBox;

    fn request() -> TileRequest {
        TileRequest {
            width: 4,
            height: 2,
            bbox: BoundingBox::new(-5.0, -2.5, 15.0, 0.1),
        }
    }

    #[test]
    fn test_render_all_fields() {
        let template = UrlTemplate::parse(
            "http://h/wms?BBOX={XMIN},{YMIN},{XMAX},{YMAX}&WIDTH={WIDTH}&HEIGHT={HEIGHT}",
        );
        assert_eq!(template.placeholders().count(), 6);
        assert_eq!(
            template.render(&request()),
            "http://h/wms?BBOX=-5.0,-2.5,15.0,0.1&WIDTH=4&HEIGHT=2"
        );
    }

    #[test]
    fn test_unknown_braces_kept() {
        let template = UrlTemplate::parse("http://h/{z}/{{WIDTH}}/{HEIGHT");
        assert_eq!(
            template.placeholders().collect::<Vec<_>>(),
            vec![Placeholder::Width]
        );
        assert_eq!(template.render(&request()), "http://h/{z}/{4}/{HEIGHT");
    }

    #[test]
    fn test_no_placeholders() {
        let template = UrlTemplate::parse("http://h/static.png");
        assert_eq!(template.render(&request()), "http://h/static.png");
        assert_eq!(template.to_string(), "http://h/static.png");
    }

    #[test]
    fn test_format_coordinate() {
        assert_eq!(format_coordinate(3.0), "3.0");
        assert_eq!(format_coordinate(-0.25), "-0.25");
        assert_eq!(format_coordinate(1.0 / 3.0), "0.3333333333333333");
    }
}

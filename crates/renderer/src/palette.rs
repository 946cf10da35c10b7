//! Named colour palettes.
//!
//! A palette maps a normalized value in [0, 1] to an RGBA colour by linear
//! interpolation between colour stops. Values below 0 or above 1 take the
//! end colours; NaN maps to fully transparent.
//!
//! Names follow the usual scientific colour map identifiers (`coolwarm`,
//! `viridis`, ...). Appending `_r` to any name reverses the palette.

type Stop = (f64, [u8; 3]);

const COOLWARM: &[Stop] = &[
    (0.0, [59, 76, 192]),
    (0.25, [141, 176, 254]),
    (0.5, [221, 221, 221]),
    (0.75, [244, 154, 123]),
    (1.0, [180, 4, 38]),
];

const VIRIDIS: &[Stop] = &[
    (0.0, [68, 1, 84]),
    (0.25, [59, 82, 139]),
    (0.5, [33, 145, 140]),
    (0.75, [94, 201, 98]),
    (1.0, [253, 231, 37]),
];

const PLASMA: &[Stop] = &[
    (0.0, [13, 8, 135]),
    (0.25, [126, 3, 168]),
    (0.5, [204, 71, 120]),
    (0.75, [248, 149, 64]),
    (1.0, [240, 249, 33]),
];

const INFERNO: &[Stop] = &[
    (0.0, [0, 0, 4]),
    (0.25, [87, 16, 110]),
    (0.5, [188, 55, 84]),
    (0.75, [249, 142, 9]),
    (1.0, [252, 255, 164]),
];

const MAGMA: &[Stop] = &[
    (0.0, [0, 0, 4]),
    (0.25, [81, 18, 124]),
    (0.5, [183, 55, 121]),
    (0.75, [252, 137, 97]),
    (1.0, [252, 253, 191]),
];

const CIVIDIS: &[Stop] = &[
    (0.0, [0, 34, 78]),
    (0.25, [65, 77, 107]),
    (0.5, [124, 123, 120]),
    (0.75, [188, 175, 111]),
    (1.0, [255, 234, 70]),
];

const GRAY: &[Stop] = &[(0.0, [0, 0, 0]), (1.0, [255, 255, 255])];

const GREYS: &[Stop] = &[(0.0, [255, 255, 255]), (1.0, [0, 0, 0])];

const BLUES: &[Stop] = &[
    (0.0, [247, 251, 255]),
    (0.5, [107, 174, 214]),
    (1.0, [8, 48, 107]),
];

const REDS: &[Stop] = &[
    (0.0, [255, 245, 240]),
    (0.5, [251, 106, 74]),
    (1.0, [103, 0, 13]),
];

const GREENS: &[Stop] = &[
    (0.0, [247, 252, 245]),
    (0.5, [116, 196, 118]),
    (1.0, [0, 68, 27]),
];

const RDBU: &[Stop] = &[
    (0.0, [103, 0, 31]),
    (0.2, [214, 96, 77]),
    (0.5, [247, 247, 247]),
    (0.8, [67, 147, 195]),
    (1.0, [5, 48, 97]),
];

const BWR: &[Stop] = &[
    (0.0, [0, 0, 255]),
    (0.5, [255, 255, 255]),
    (1.0, [255, 0, 0]),
];

const SEISMIC: &[Stop] = &[
    (0.0, [0, 0, 77]),
    (0.25, [0, 0, 255]),
    (0.5, [255, 255, 255]),
    (0.75, [255, 0, 0]),
    (1.0, [128, 0, 0]),
];

const JET: &[Stop] = &[
    (0.0, [0, 0, 128]),
    (0.11, [0, 0, 255]),
    (0.125, [0, 0, 255]),
    (0.34, [0, 255, 255]),
    (0.35, [0, 255, 255]),
    (0.65, [255, 255, 0]),
    (0.66, [255, 255, 0]),
    (0.89, [255, 0, 0]),
    (1.0, [128, 0, 0]),
];

const REGISTRY: &[(&str, &[Stop])] = &[
    ("coolwarm", COOLWARM),
    ("viridis", VIRIDIS),
    ("plasma", PLASMA),
    ("inferno", INFERNO),
    ("magma", MAGMA),
    ("cividis", CIVIDIS),
    ("gray", GRAY),
    ("Greys", GREYS),
    ("Blues", BLUES),
    ("Reds", REDS),
    ("Greens", GREENS),
    ("RdBu", RDBU),
    ("bwr", BWR),
    ("seismic", SEISMIC),
    ("jet", JET),
];

/// Name used when a layer definition does not pick a palette.
pub const DEFAULT_PALETTE: &str = "coolwarm";

/// A resolved colour palette.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    name: &'static str,
    stops: &'static [Stop],
    reversed: bool,
}

impl Palette {
    /// Look up a palette by name. Names are case sensitive.
    pub fn by_name(name: &str) -> Option<Self> {
        let (base, reversed) = match name.strip_suffix("_r") {
            Some(base) => (base, true),
            None => (name, false),
        };
        REGISTRY
            .iter()
            .find(|(n, _)| *n == base)
            .map(|(n, stops)| Self {
                name: n,
                stops,
                reversed,
            })
    }

    /// Base name of the palette.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Map a normalized value to RGBA.
    pub fn map(&self, value: f64) -> [u8; 4] {
        if value.is_nan() {
            return [0, 0, 0, 0];
        }
        let t = value.clamp(0.0, 1.0);
        let t = if self.reversed { 1.0 - t } else { t };

        let upper = self
            .stops
            .iter()
            .position(|(pos, _)| *pos >= t)
            .unwrap_or(self.stops.len() - 1);
        if upper == 0 {
            let [r, g, b] = self.stops[0].1;
            return [r, g, b, 255];
        }

        let (p0, c0) = self.stops[upper - 1];
        let (p1, c1) = self.stops[upper];
        let f = if p1 > p0 { (t - p0) / (p1 - p0) } else { 1.0 };
        let [r, g, b] = lerp(c0, c1, f);
        [r, g, b, 255]
    }
}

fn lerp(c0: [u8; 3], c1: [u8; 3], f: f64) -> [u8; 3] {
    let channel = |a: u8, b: u8| (a as f64 * (1.0 - f) + b as f64 * f) as u8;
    [
        channel(c0[0], c1[0]),
        channel(c0[1], c1[1]),
        channel(c0[2], c1[2]),
    ]
}

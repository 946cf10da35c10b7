//! Named colour lookup for flat-colour overlays.

const NAMED_COLOURS: &[(&str, [u8; 3])] = &[
    ("violet", [238, 130, 238]),
    ("magenta", [255, 0, 255]),
    ("purple", [128, 0, 128]),
    ("indigo", [75, 0, 130]),
    ("pink", [255, 192, 203]),
    ("crimson", [220, 20, 60]),
    ("darkred", [139, 0, 0]),
    ("red", [255, 0, 0]),
    ("darkorange", [255, 140, 0]),
    ("orange", [255, 165, 0]),
    ("yellow", [255, 255, 0]),
    ("lightyellow", [255, 255, 224]),
    ("gold", [255, 215, 0]),
    ("brown", [165, 42, 42]),
    ("lightgreen", [144, 238, 144]),
    ("green", [0, 128, 0]),
    ("darkgreen", [0, 100, 0]),
    ("cyan", [0, 255, 255]),
    ("lightblue", [173, 216, 230]),
    ("blue", [0, 0, 255]),
    ("darkblue", [0, 0, 139]),
    ("white", [255, 255, 255]),
    ("lightgray", [211, 211, 211]),
    ("darkgray", [169, 169, 169]),
    ("gray", [128, 128, 128]),
    ("black", [0, 0, 0]),
];

/// Resolve a colour name or `#rrggbb` hex string to RGB.
pub fn lookup_colour(colour: &str) -> Option<[u8; 3]> {
    if let Some((_, rgb)) = NAMED_COLOURS.iter().find(|(name, _)| *name == colour) {
        return Some(*rgb);
    }
    hex_to_rgb(colour)
}

/// Parse a `#rrggbb` hex colour.
pub fn hex_to_rgb(hex: &str) -> Option<[u8; 3]> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some([r, g, b])
}

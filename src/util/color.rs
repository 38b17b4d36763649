//! Colour helpers. Colours are linear RGB triples in `[0, 1]`.

/// Linear RGB colour.
pub type Rgb = [f32; 3];

/// Black, i.e. no emission.
pub const BLACK: Rgb = [0.0, 0.0, 0.0];

/// Unpack a `0xRRGGBB` value into an RGB triple.
#[must_use]
pub fn from_hex(hex: u32) -> Rgb {
    let channel = |shift: u32| ((hex >> shift) & 0xff) as f32 / 255.0;
    [channel(16), channel(8), channel(0)]
}

/// Pack an RGB triple back into `0xRRGGBB`, clamping each channel.
#[must_use]
pub fn to_hex(rgb: Rgb) -> u32 {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
    (channel(rgb[0]) << 16) | (channel(rgb[1]) << 8) | channel(rgb[2])
}

/// Multiply every channel by `factor`.
#[must_use]
pub fn scale(rgb: Rgb, factor: f32) -> Rgb {
    [rgb[0] * factor, rgb[1] * factor, rgb[2] * factor]
}

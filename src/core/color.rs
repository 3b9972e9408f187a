#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8, // Red component (0 - 255)
    pub g: u8, // Green component (0 - 255)
    pub b: u8, // Blue component (0 - 255)
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from float channels in the 0-255 range.
    /// Each channel is clamped to [0, 255] and truncated.
    pub fn from_f32_clamped(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: clamp_channel(r),
            g: clamp_channel(g),
            b: clamp_channel(b),
        }
    }

    const fn hex_char_to_u8(c: u8) -> u8 {
        match c {
            b'0'..=b'9' => c - b'0',
            b'a'..=b'f' => c - b'a' + 10,
            b'A'..=b'F' => c - b'A' + 10,
            _ => 0,
        }
    }

    const fn hex_pair_to_u8(high: u8, low: u8) -> u8 {
        (Self::hex_char_to_u8(high) << 4) | Self::hex_char_to_u8(low)
    }

    /// Compile-time hex constructor for the palette below. Expects "RRGGBB" or "#RRGGBB".
    const fn hex(hex: &str) -> Self {
        let bytes = hex.as_bytes();
        let offset = if bytes[0] == b'#' { 1 } else { 0 };

        Self {
            r: Self::hex_pair_to_u8(bytes[offset], bytes[offset + 1]),
            g: Self::hex_pair_to_u8(bytes[offset + 2], bytes[offset + 3]),
            b: Self::hex_pair_to_u8(bytes[offset + 4], bytes[offset + 5]),
        }
    }

    pub fn to_crossterm_color(&self) -> crossterm::style::Color {
        crossterm::style::Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }

    /// minifb wants 0x00RRGGBB
    pub const fn to_u32(&self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub const fn from_u32(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xFF) as u8,
            g: ((packed >> 8) & 0xFF) as u8,
            b: (packed & 0xFF) as u8,
        }
    }

    /// Per-channel linear blend, rounded. `t = 0` is exactly `self`, `t = 1` exactly `end`.
    pub fn lerp(&self, end: &Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color {
            r: mix(self.r, end.r),
            g: mix(self.g, end.g),
            b: mix(self.b, end.b),
        }
    }

    /// Like `lerp`, but every channel moves at least one step towards `target`
    /// (unless `t` is 0), so repeated fading always lands on `target`.
    pub fn fade_towards(&self, target: &Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let step = |a: u8, b: u8| {
            let delta = (b as f32 - a as f32) * t;
            let delta = if delta > 0.0 { delta.ceil() } else { delta.floor() };
            (a as f32 + delta).clamp(0.0, 255.0) as u8
        };
        Color {
            r: step(self.r, target.r),
            g: step(self.g, target.g),
            b: step(self.b, target.b),
        }
    }

    /// Adds to each channel, saturating at 255.
    pub const fn saturating_add(&self, r: u8, g: u8, b: u8) -> Color {
        Color {
            r: self.r.saturating_add(r),
            g: self.g.saturating_add(g),
            b: self.b.saturating_add(b),
        }
    }
}

fn clamp_channel(v: f32) -> u8 {
    // NaN falls through to 0
    if v >= 255.0 {
        255
    } else if v > 0.0 {
        v as u8
    } else {
        0
    }
}

// Predefined colors
impl Color {
    pub const BLACK: Color = Color::hex("000000");
    pub const WHITE: Color = Color::hex("FFFFFF");
    /// Deep navy the screen is cleared to.
    pub const NIGHT: Color = Color::hex("000008");
    /// Base body tone, bottom of the height blend.
    pub const TOASTER_CYAN: Color = Color::hex("00C8FF");
    /// Highlight tone, top of the height blend.
    pub const TOASTER_MAGENTA: Color = Color::hex("FF64FF");
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

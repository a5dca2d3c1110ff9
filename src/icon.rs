//! Fixed icon templates for the two particle kinds

use crossterm::style::Color;

/// How one particle kind is drawn: glyph variants plus its palette
pub struct Icon {
    pub class: &'static str,
    pub glyphs: &'static [char], // Picked by rotation
    pub large_glyph: char,
    pub fill: (u8, u8, u8),
    pub accent: (u8, u8, u8),
}

/// Particles at least this many px wide use the large glyph
pub const LARGE_SIZE: u32 = 26;

pub const HEART: Icon = Icon {
    class: "heart",
    glyphs: &['♥', '♥', '❥', '♥'],
    large_glyph: '❤',
    fill: (0xe8, 0x4f, 0x9a),
    accent: (0xe8, 0x4f, 0x9a),
};

pub const FLOWER: Icon = Icon {
    class: "flower",
    glyphs: &['✿', '❀', '✾', '❁'],
    large_glyph: '❀',
    fill: (0xf0, 0x8f, 0xb3),
    accent: (0xf6, 0xa5, 0xc7),
};

impl Icon {
    pub fn glyph(&self, size: u32, rotation: f64) -> char {
        if size >= LARGE_SIZE {
            return self.large_glyph;
        }
        let slot = (rotation.rem_euclid(360.0) / 90.0) as usize;
        self.glyphs[slot.min(self.glyphs.len() - 1)]
    }

    /// Color at the given opacity, blended toward a black background
    pub fn color(&self, rotation: f64, opacity: f64) -> Color {
        // Alternate petal shades the way the flower's petals alternate
        let base = if (rotation.rem_euclid(360.0) as u32 / 45) % 2 == 0 {
            self.fill
        } else {
            self.accent
        };
        fade(base, opacity)
    }
}

pub fn fade((r, g, b): (u8, u8, u8), opacity: f64) -> Color {
    let k = opacity.clamp(0.0, 1.0);
    let scale = |c: u8| (c as f64 * k).round() as u8;
    Color::Rgb { r: scale(r), g: scale(g), b: scale(b) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_follows_rotation() {
        assert_eq!(FLOWER.glyph(20, 10.0), '✿');
        assert_eq!(FLOWER.glyph(20, 100.0), '❀');
        assert_eq!(FLOWER.glyph(20, 359.9), '❁');
        assert_eq!(FLOWER.glyph(20, -10.0), '❁');
    }

    #[test]
    fn large_particles_use_large_glyph() {
        assert_eq!(HEART.glyph(LARGE_SIZE, 0.0), '❤');
        assert_eq!(HEART.glyph(14, 0.0), '♥');
    }

    #[test]
    fn fade_scales_channels() {
        assert_eq!(fade((200, 100, 50), 0.5), Color::Rgb { r: 100, g: 50, b: 25 });
        assert_eq!(fade((200, 100, 50), 0.0), Color::Rgb { r: 0, g: 0, b: 0 });
        assert_eq!(fade((200, 100, 50), 3.0), Color::Rgb { r: 200, g: 100, b: 50 });
    }

    #[test]
    fn classes_match_styling_contract() {
        assert_eq!(HEART.class, "heart");
        assert_eq!(FLOWER.class, "flower");
    }
}

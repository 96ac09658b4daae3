use crate::error::PaletteError;
use serde::Serialize;

/// A named ink color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorSwatch {
    pub name: &'static str,
    pub hex: &'static str,
}

impl ColorSwatch {
    pub const fn new(name: &'static str, hex: &'static str) -> Self {
        Self { name, hex }
    }

    /// Straight RGBA bytes of the swatch, `None` if `hex` is not `#rrggbb`.
    pub fn rgba(&self) -> Option<[u8; 4]> {
        parse_hex(self.hex)
    }
}

fn parse_hex(hex: &str) -> Option<[u8; 4]> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?, 255])
}

pub const STANDARD_SWATCHES: [ColorSwatch; 6] = [
    ColorSwatch::new("Red", "#ef4444"),
    ColorSwatch::new("Blue", "#3b82f6"),
    ColorSwatch::new("Green", "#22c55e"),
    ColorSwatch::new("Yellow", "#eab308"),
    ColorSwatch::new("Purple", "#a855f7"),
    ColorSwatch::new("Orange", "#f97316"),
];

/// Validated, read-only color table.
///
/// Holds at least two swatches with unique names and parsable hex values, so
/// rejection sampling for incongruent trials always terminates.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    swatches: Vec<ColorSwatch>,
}

impl Palette {
    pub fn new(swatches: Vec<ColorSwatch>) -> Result<Self, PaletteError> {
        if swatches.len() < 2 {
            return Err(PaletteError::TooFewColors(swatches.len()));
        }
        for (i, swatch) in swatches.iter().enumerate() {
            if swatches[..i].iter().any(|s| s.name == swatch.name) {
                return Err(PaletteError::DuplicateName(swatch.name.to_string()));
            }
            if swatch.rgba().is_none() {
                return Err(PaletteError::InvalidHex {
                    name: swatch.name.to_string(),
                    hex: swatch.hex.to_string(),
                });
            }
        }
        Ok(Self { swatches })
    }

    /// The six-color table every session uses, checked like any other.
    pub fn standard() -> Result<Self, PaletteError> {
        Self::new(STANDARD_SWATCHES.to_vec())
    }

    pub fn len(&self) -> usize {
        self.swatches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.swatches.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ColorSwatch> {
        self.swatches.get(index)
    }

    pub fn swatches(&self) -> &[ColorSwatch] {
        &self.swatches
    }

    pub fn by_name(&self, name: &str) -> Option<&ColorSwatch> {
        self.swatches.iter().find(|s| s.name == name)
    }
}

/// One color-word stimulus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Trial {
    /// Text shown on screen.
    pub displayed_word: &'static str,
    /// Hex value of the ink the word is drawn in.
    pub ink_color: &'static str,
    /// Name of the ink color; the participant must pick this.
    pub correct_answer: &'static str,
}

impl Trial {
    pub fn from_swatches(word: &ColorSwatch, ink: &ColorSwatch) -> Self {
        Self {
            displayed_word: word.name,
            ink_color: ink.hex,
            correct_answer: ink.name,
        }
    }

    pub fn is_congruent(&self) -> bool {
        self.displayed_word == self.correct_answer
    }

    pub fn ink_rgba(&self) -> [u8; 4] {
        parse_hex(self.ink_color).unwrap_or([255, 255, 255, 255])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_palette_is_valid() {
        let palette = Palette::new(STANDARD_SWATCHES.to_vec()).unwrap();
        assert_eq!(palette, Palette::standard().unwrap());
        assert_eq!(palette.len(), 6);
    }

    #[test]
    fn single_color_palette_is_rejected() {
        let err = Palette::new(vec![ColorSwatch::new("Red", "#ef4444")]).unwrap_err();
        assert_eq!(err, PaletteError::TooFewColors(1));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = Palette::new(vec![
            ColorSwatch::new("Red", "#ef4444"),
            ColorSwatch::new("Red", "#ff0000"),
        ])
        .unwrap_err();
        assert_eq!(err, PaletteError::DuplicateName("Red".into()));
    }

    #[test]
    fn bad_hex_is_rejected() {
        let err = Palette::new(vec![
            ColorSwatch::new("Red", "#ef4444"),
            ColorSwatch::new("Blue", "3b82f6"),
        ])
        .unwrap_err();
        assert!(matches!(err, PaletteError::InvalidHex { .. }));
    }

    #[test]
    fn hex_parses_to_rgba() {
        assert_eq!(STANDARD_SWATCHES[0].rgba(), Some([0xef, 0x44, 0x44, 255]));
        assert_eq!(ColorSwatch::new("X", "#12345").rgba(), None);
        assert_eq!(ColorSwatch::new("X", "#gg0000").rgba(), None);
    }

    #[test]
    fn trial_from_swatches() {
        let red = STANDARD_SWATCHES[0];
        let blue = STANDARD_SWATCHES[1];
        let trial = Trial::from_swatches(&red, &blue);
        assert_eq!(trial.displayed_word, "Red");
        assert_eq!(trial.correct_answer, "Blue");
        assert_eq!(trial.ink_color, "#3b82f6");
        assert!(!trial.is_congruent());
        assert_eq!(trial.ink_rgba(), [0x3b, 0x82, 0xf6, 255]);
    }
}

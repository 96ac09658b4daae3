use rand::Rng;
use stroop_core::{Condition, Palette, Trial};

/// Draws one color-word trial for `condition`.
///
/// The ink color is uniform over the palette. Congruent trials name their own
/// ink; incongruent trials re-draw the word until it names a different color.
/// `Palette` guarantees at least two colors, so the loop terminates.
pub fn generate_trial<R: Rng>(palette: &Palette, condition: Condition, rng: &mut R) -> Trial {
    let swatches = palette.swatches();
    let ink = rng.random_range(0..swatches.len());
    let word = match condition {
        Condition::Congruent => ink,
        Condition::Incongruent => loop {
            let candidate = rng.random_range(0..swatches.len());
            if candidate != ink {
                break candidate;
            }
        },
    };
    Trial::from_swatches(&swatches[word], &swatches[ink])
}

/// Owns the palette and the injected random source
pub struct StimulusGenerator<R: Rng> {
    palette: Palette,
    rng: R,
}

impl<R: Rng> StimulusGenerator<R> {
    pub fn new(palette: Palette, rng: R) -> Self {
        Self { palette, rng }
    }

    pub fn generate(&mut self, condition: Condition) -> Trial {
        generate_trial(&self.palette, condition, &mut self.rng)
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}

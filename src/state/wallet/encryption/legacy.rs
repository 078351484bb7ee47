//! Cipher recipes used by first generation (v1) wallet payloads
//!
//! A v1 payload is a bare base64 string without an envelope, so nothing in it
//! says how it was encrypted. Old clients used several mode / padding /
//! iteration combinations; the only way to read such a payload is to try each
//! of them in turn.

use tracing::debug;

use super::cipher::AesOptions;
use super::cipher::BlockMode;
use super::cipher::Padding;

/// One historical encryption configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CipherRecipe {
    pub options: AesOptions,
    pub pbkdf2_iterations: u32,
}

impl CipherRecipe {
    pub const fn new(block_mode: BlockMode, padding: Padding, pbkdf2_iterations: u32) -> Self {
        Self {
            options: AesOptions::new(block_mode, padding),
            pbkdf2_iterations,
        }
    }
}

impl std::fmt::Display for CipherRecipe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {} iteration(s)", self.options, self.pbkdf2_iterations)
    }
}

/// v1 recipes, most common first. The order is part of the format: do not
/// reorder.
pub const LEGACY_V1_RECIPES: [CipherRecipe; 4] = [
    CipherRecipe::new(BlockMode::Cbc, Padding::Iso10126, 10),
    CipherRecipe::new(BlockMode::Ofb, Padding::NoPadding, 1),
    CipherRecipe::new(BlockMode::Ofb, Padding::Iso78164, 1),
    CipherRecipe::new(BlockMode::Cbc, Padding::Iso10126, 1),
];

/// Run `attempt` for each recipe in order and return the index and output of
/// the first one that succeeds.
///
/// Failed attempts are expected and only logged.
pub fn first_successful<T, E, F>(recipes: &[CipherRecipe], mut attempt: F) -> Option<(usize, T)>
where
    E: std::fmt::Display,
    F: FnMut(&CipherRecipe) -> Result<T, E>,
{
    recipes
        .iter()
        .enumerate()
        .find_map(|(index, recipe)| match attempt(recipe) {
            Ok(output) => Some((index, output)),
            Err(e) => {
                debug!("v1 recipe {} ({}) failed: {}", index, recipe, e);
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipe_order() {
        assert_eq!(
            [
                (BlockMode::Cbc, Padding::Iso10126, 10),
                (BlockMode::Ofb, Padding::NoPadding, 1),
                (BlockMode::Ofb, Padding::Iso78164, 1),
                (BlockMode::Cbc, Padding::Iso10126, 1),
            ],
            LEGACY_V1_RECIPES.map(|r| (r.options.block_mode, r.options.padding, r.pbkdf2_iterations))
        );
    }

    #[test]
    fn test_first_successful_stops_at_first_success() {
        let mut attempted = vec![];
        let result = first_successful(&LEGACY_V1_RECIPES, |recipe| {
            attempted.push(*recipe);
            match attempted.len() {
                3 => Ok("third"),
                _ => Err("nope"),
            }
        });

        assert_eq!(Some((2, "third")), result);
        assert_eq!(&LEGACY_V1_RECIPES[..3], attempted.as_slice());
    }

    #[test]
    fn test_first_successful_exhausted() {
        let mut calls = 0;
        let result: Option<(usize, ())> = first_successful(&LEGACY_V1_RECIPES, |_| {
            calls += 1;
            Err("nope")
        });

        assert_eq!(None, result);
        assert_eq!(LEGACY_V1_RECIPES.len(), calls);
    }
}

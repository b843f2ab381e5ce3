use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::pools::{ContentPools, Pool};

/// Uniform, memoryless picks from a pool.
///
/// Repeats are allowed, including drawing the value that is currently shown.
#[derive(Debug)]
pub struct PromptSelector {
    rng: StdRng,
}

impl PromptSelector {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    pub fn draw<'a>(&mut self, pool: &'a Pool) -> &'a str {
        let entries = pool.entries();
        let idx = self.rng.gen_range(0..entries.len());
        &entries[idx]
    }
}

impl Default for PromptSelector {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Prompts currently shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptState {
    pub word: String,
    pub reading_theme: String,
    pub expression_theme: String,
}

impl PromptState {
    pub fn draw(pools: &ContentPools, selector: &mut PromptSelector) -> Self {
        Self {
            word: selector.draw(&pools.words).to_string(),
            reading_theme: selector.draw(&pools.reading_themes).to_string(),
            expression_theme: selector.draw(&pools.expression_themes).to_string(),
        }
    }

    pub fn change_word(&mut self, pools: &ContentPools, selector: &mut PromptSelector) {
        self.word = selector.draw(&pools.words).to_string();
    }

    pub fn change_expression_theme(&mut self, pools: &ContentPools, selector: &mut PromptSelector) {
        self.expression_theme = selector.draw(&pools.expression_themes).to_string();
    }
}

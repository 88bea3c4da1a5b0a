//! Built-in word catalogue for private word rounds.

use rand::Rng;

#[derive(Debug, Clone, Copy)]
pub struct Category {
    pub name: &'static str,
    pub words: &'static [&'static str],
}

pub const CATALOGUE: &[Category] = &[
    Category {
        name: "Animals",
        words: &["tiger", "horse", "zebra", "camel", "otter", "panda", "eagle", "whale"],
    },
    Category {
        name: "Fruits",
        words: &["apple", "lemon", "mango", "peach", "grape", "melon", "cherry", "banana"],
    },
    Category {
        name: "Countries",
        words: &["spain", "italy", "japan", "chile", "egypt", "france", "poland", "canada"],
    },
    Category {
        name: "Nature",
        words: &["river", "ocean", "cloud", "storm", "stone", "forest", "desert", "island"],
    },
    Category {
        name: "Home",
        words: &["table", "chair", "spoon", "plate", "couch", "mirror", "window", "pillow"],
    },
];

/// Picks a category uniformly, then a word from it.
pub fn pick<R: Rng + ?Sized>(rng: &mut R) -> (&'static str, &'static str) {
    let category = &CATALOGUE[rng.random_range(0..CATALOGUE.len())];
    let word = category.words[rng.random_range(0..category.words.len())];
    (category.name, word)
}

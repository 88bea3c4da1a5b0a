//! Word-guessing game: per-letter feedback and the private round.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::GameError;
use crate::game::{Round, Settlement};

/// Feedback for one letter of a guess.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mark {
    /// Right letter, right position
    Exact,
    /// Letter occurs elsewhere in the secret
    Present,
    Absent,
}

impl Mark {
    pub fn glyph(self) -> &'static str {
        match self {
            Mark::Exact => "🟩",
            Mark::Present => "🟧",
            Mark::Absent => "🟥",
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "marks", rename_all = "snake_case")]
pub enum Verdict {
    Solved,
    Marks(Vec<Mark>),
}

/// Normalises raw player input into a guess.
pub fn normalize(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Scores `guess` against `secret` letter by letter.
///
/// Exact matches are taken out of the pool of secret letters first, so a
/// repeated letter in the guess is only credited as often as it still occurs
/// in the secret.
///
/// # Errors
///
/// [`GameError::WrongLength`] when the lengths differ (in characters).
///
/// # Examples
///
/// ```
/// use ginga_engine::word::{score_guess, Mark::*};
///
/// // 'p' sits in the same place in both words; the guess's second 'a' finds
/// // no 'a' left once the first one matched exactly
/// let marks = score_guess("alpha", "apple").unwrap();
/// assert_eq!(marks, vec![Exact, Present, Exact, Absent, Absent]);
/// ```
pub fn score_guess(guess: &str, secret: &str) -> Result<Vec<Mark>, GameError> {
    let guess: Vec<char> = guess.chars().collect();
    let secret: Vec<char> = secret.chars().collect();
    if guess.len() != secret.len() {
        return Err(GameError::WrongLength {
            expected: secret.len(),
            actual: guess.len(),
        });
    }

    let mut remaining: HashMap<char, usize> = HashMap::new();
    for &ch in &secret {
        *remaining.entry(ch).or_insert(0) += 1;
    }

    let mut marks = vec![Mark::Absent; secret.len()];
    for (i, (&g, &s)) in guess.iter().zip(secret.iter()).enumerate() {
        if g == s {
            marks[i] = Mark::Exact;
            if let Some(n) = remaining.get_mut(&g) {
                *n -= 1;
            }
        }
    }

    for (i, &g) in guess.iter().enumerate() {
        if marks[i] == Mark::Exact {
            continue;
        }
        match remaining.get_mut(&g) {
            Some(n) if *n > 0 => {
                *n -= 1;
                marks[i] = Mark::Present;
            }
            _ => marks[i] = Mark::Absent,
        }
    }

    Ok(marks)
}

/// Judges raw input: lowercases it, rejects a wrong length, short-circuits an
/// exact match to [`Verdict::Solved`], otherwise returns the marks.
pub fn judge(input: &str, secret: &str) -> Result<Verdict, GameError> {
    let guess = normalize(input);
    let expected = secret.chars().count();
    let actual = guess.chars().count();
    if actual != expected {
        return Err(GameError::WrongLength { expected, actual });
    }
    if guess == secret {
        return Ok(Verdict::Solved);
    }
    score_guess(&guess, secret).map(Verdict::Marks)
}

pub fn render_marks(marks: &[Mark]) -> String {
    marks
        .iter()
        .map(|m| m.glyph())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A private round: one secret, unlimited guesses, a reward on success.
#[derive(Debug, Clone)]
pub struct WordRound {
    category: String,
    secret: String,
    reward: u64,
    attempts: u32,
    solved: bool,
}

impl WordRound {
    pub fn new(
        category: impl Into<String>,
        secret: impl Into<String>,
        reward: u64,
    ) -> Result<Self, GameError> {
        let secret = validate_secret(&secret.into())?;
        Ok(Self {
            category: category.into(),
            secret,
            reward,
            attempts: 0,
            solved: false,
        })
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn len(&self) -> usize {
        self.secret.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.secret.is_empty()
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn reward(&self) -> u64 {
        self.reward
    }
}

impl Round for WordRound {
    type Action = String;
    type Step = Verdict;

    /// Wrong-length guesses are rejected and do not count as attempts.
    fn apply(&mut self, guess: String) -> Result<Verdict, GameError> {
        if self.solved {
            return Err(GameError::RoundResolved);
        }
        let verdict = judge(&guess, &self.secret)?;
        self.attempts += 1;
        if verdict == Verdict::Solved {
            self.solved = true;
        }
        Ok(verdict)
    }

    fn is_resolved(&self) -> bool {
        self.solved
    }

    fn settlement(&self) -> Option<Settlement> {
        self.solved.then(|| Settlement::new(0, self.reward))
    }
}

/// Lowercases a secret and checks it is a single non-empty word.
pub fn validate_secret(raw: &str) -> Result<String, GameError> {
    let word = normalize(raw);
    if word.is_empty() || word.chars().any(char::is_whitespace) {
        return Err(GameError::InvalidWord(raw.to_string()));
    }
    Ok(word)
}

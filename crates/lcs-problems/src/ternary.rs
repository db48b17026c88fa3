//! Ternary conditions over binary inputs.
//!
//! Each condition element is `0`, `1` or the wildcard `#`, which matches either bit.

use std::fmt;

use lcs_core::Representation;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trit {
    #[serde(rename = "0")]
    Zero,
    #[serde(rename = "1")]
    One,
    #[serde(rename = "#")]
    Hash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid ternary character `{character}`; expected `0`, `1` or `#`")]
pub struct ParseTritError {
    character: char,
}

impl Trit {
    #[must_use]
    pub fn from_bit(bit: bool) -> Self {
        if bit { Self::One } else { Self::Zero }
    }

    #[must_use]
    pub fn matches(self, bit: bool) -> bool {
        match self {
            Self::Zero => !bit,
            Self::One => bit,
            Self::Hash => true,
        }
    }

    /// Parses a condition written as a string of `0`, `1` and `#`.
    ///
    /// ```
    /// # use lcs_problems::ternary::Trit;
    /// let condition = Trit::parse("1#0")?;
    /// assert_eq!(condition, [Trit::One, Trit::Hash, Trit::Zero]);
    /// assert!(Trit::parse("1x0").is_err());
    /// # Ok::<(), lcs_problems::ternary::ParseTritError>(())
    /// ```
    pub fn parse(s: &str) -> Result<Vec<Self>, ParseTritError> {
        s.chars().map(Self::try_from).collect()
    }
}

impl TryFrom<char> for Trit {
    type Error = ParseTritError;

    fn try_from(character: char) -> Result<Self, Self::Error> {
        match character {
            '0' => Ok(Self::Zero),
            '1' => Ok(Self::One),
            '#' => Ok(Self::Hash),
            _ => Err(ParseTritError { character }),
        }
    }
}

impl fmt::Display for Trit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Self::Zero => '0',
            Self::One => '1',
            Self::Hash => '#',
        };
        write!(f, "{c}")
    }
}

/// Renders a condition the way [`Trit::parse`] reads it.
#[must_use]
pub fn format_condition(condition: &[Trit]) -> String {
    condition.iter().map(ToString::to_string).collect()
}

/// The ternary representation.
///
/// Covering writes `#` at each position with probability `p_hash` and the situation's
/// bit otherwise. Mutation keeps offspring inside the niche of the situation that
/// triggered discovery: a mutated `#` becomes the situation's bit and a mutated bit
/// becomes `#`, so a mutated condition still matches that situation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ternary {
    p_hash: f64,
}

impl Ternary {
    /// # Panics
    ///
    /// Panics if `p_hash` is not within `[0, 1]`.
    #[must_use]
    pub fn new(p_hash: f64) -> Self {
        assert!((0.0..=1.0).contains(&p_hash), "p_hash must be within [0, 1]");
        Self { p_hash }
    }

    #[must_use]
    pub fn p_hash(&self) -> f64 {
        self.p_hash
    }
}

impl Representation for Ternary {
    type Situation = Vec<bool>;
    type Element = Trit;

    fn does_match(&self, condition: &[Trit], situation: &Vec<bool>) -> bool {
        condition.len() == situation.len()
            && condition
                .iter()
                .zip(situation)
                .all(|(trit, &bit)| trit.matches(bit))
    }

    fn gen_covering_condition<R>(&self, situation: &Vec<bool>, rng: &mut R) -> Vec<Trit>
    where
        R: Rng + ?Sized,
    {
        situation
            .iter()
            .map(|&bit| {
                if rng.random_bool(self.p_hash) {
                    Trit::Hash
                } else {
                    Trit::from_bit(bit)
                }
            })
            .collect()
    }

    fn mutate_condition<R>(
        &self,
        condition: &mut [Trit],
        situation: &Vec<bool>,
        mu: f64,
        rng: &mut R,
    ) where
        R: Rng + ?Sized,
    {
        for (trit, &bit) in condition.iter_mut().zip(situation) {
            if rng.random_bool(mu) {
                *trit = match *trit {
                    Trit::Hash => Trit::from_bit(bit),
                    Trit::Zero | Trit::One => Trit::Hash,
                };
            }
        }
    }

    fn is_wildcard(&self, element: &Trit, _index: usize) -> bool {
        *element == Trit::Hash
    }
}

use std::fmt;

use itertools::Itertools;
use serde::Deserialize;
use serde::Serialize;
use zeroize::Zeroizing;

use crate::error::ValidationError;

/// Accepted mnemonic lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WordCount {
    Twelve,
    Eighteen,
    TwentyFour,
}

impl WordCount {
    pub fn count(self) -> usize {
        match self {
            Self::Twelve => 12,
            Self::Eighteen => 18,
            Self::TwentyFour => 24,
        }
    }
}

impl TryFrom<usize> for WordCount {
    type Error = ValidationError;

    fn try_from(count: usize) -> Result<Self, Self::Error> {
        match count {
            12 => Ok(Self::Twelve),
            18 => Ok(Self::Eighteen),
            24 => Ok(Self::TwentyFour),
            n => Err(ValidationError::WordCount(n)),
        }
    }
}

impl TryFrom<u8> for WordCount {
    type Error = ValidationError;

    fn try_from(count: u8) -> Result<Self, Self::Error> {
        Self::try_from(usize::from(count))
    }
}

impl From<WordCount> for u8 {
    fn from(count: WordCount) -> Self {
        match count {
            WordCount::Twelve => 12,
            WordCount::Eighteen => 18,
            WordCount::TwentyFour => 24,
        }
    }
}

impl fmt::Display for WordCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.count())
    }
}

/// A mnemonic whose words are joined by single spaces.
///
/// Only the number of words is checked; words are not looked up in any
/// wordlist.
#[derive(Clone, PartialEq, Eq)]
pub struct SeedPhrase {
    words: Zeroizing<String>,
    word_count: WordCount,
}

impl SeedPhrase {
    /// Normalize whitespace and check the word count.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let word_count = WordCount::try_from(input.split_whitespace().count())?;
        let words = Zeroizing::new(input.split_whitespace().join(" "));

        Ok(Self { words, word_count })
    }

    pub fn word_count(&self) -> WordCount {
        self.word_count
    }

    pub fn as_str(&self) -> &str {
        &self.words
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.words.as_bytes()
    }

    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.split(' ')
    }
}

impl fmt::Debug for SeedPhrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SeedPhrase(<{} words redacted>)", self.word_count)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prop_assert_eq;
    use test_strategy::proptest;

    use super::*;

    fn phrase_of(n: usize) -> String {
        (0..n).map(|i| format!("word{i}")).join(" ")
    }

    #[test]
    fn invalid_word_counts_are_reported() {
        for n in [0, 1, 11, 13, 17, 19, 23, 25] {
            assert_eq!(
                Err(ValidationError::WordCount(n)),
                SeedPhrase::parse(&phrase_of(n)).map(|p| p.word_count())
            );
        }
    }

    #[test]
    fn valid_word_counts_are_accepted() {
        for n in [12, 18, 24] {
            let phrase = SeedPhrase::parse(&phrase_of(n)).unwrap();
            assert_eq!(n, phrase.word_count().count());
            assert_eq!(n, phrase.words().count());
        }
    }

    #[test]
    fn whitespace_is_normalized() {
        let messy = format!("  {}\t\n", phrase_of(12).replace(' ', "   "));

        assert_eq!(phrase_of(12), SeedPhrase::parse(&messy).unwrap().as_str());
    }

    #[test]
    fn debug_hides_words() {
        let phrase = SeedPhrase::parse(&phrase_of(12)).unwrap();
        let debug = format!("{phrase:?}");

        assert!(!debug.contains("word0"));
        assert!(debug.contains("12"));
    }

    #[test]
    fn word_count_serializes_as_number() {
        assert_eq!("18", serde_json::to_string(&WordCount::Eighteen).unwrap());
        assert_eq!(
            WordCount::TwentyFour,
            serde_json::from_str::<WordCount>("24").unwrap()
        );
        assert!(serde_json::from_str::<WordCount>("13").is_err());
    }

    #[proptest(cases = 64)]
    fn parse_accepts_exactly_three_lengths(#[strategy(0usize..40)] n: usize) {
        let expected = matches!(n, 12 | 18 | 24);
        prop_assert_eq!(expected, SeedPhrase::parse(&phrase_of(n)).is_ok());
    }
}

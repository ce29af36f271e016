// Caller-supplied seed data for melodic note selection.
//
// Seeds arrive as integers, floats, characters or one hex colour string and
// are normalized to plain integers: floats truncate toward zero, letters
// map a..z to 0..25 (case-insensitive) and digits to 26..35, hex strings
// split into one value per hex digit. Each integer then indexes the source
// scale; values outside the scale are folded back in with a Euclidean
// remainder.

use crate::error::{MusicError, Result};
use serde::{Deserialize, Serialize};

/// Index of the first digit in the character alphabet.
const DIGIT_BASE: i64 = 26;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SeedData {
    Ints(Vec<i64>),
    Floats(Vec<f64>),
    Chars(Vec<char>),
    /// A colour such as "#FF8800" or "ff8800".
    Hex(String),
}

impl SeedData {
    /// Characters of a free-text string, e.g. a name.
    pub fn from_text(text: &str) -> Self {
        SeedData::Chars(text.chars().collect())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SeedData::Ints(_) => "ints",
            SeedData::Floats(_) => "floats",
            SeedData::Chars(_) => "chars",
            SeedData::Hex(_) => "hex",
        }
    }

    /// Convert to integers. Fails if nothing usable remains.
    pub fn normalize(&self) -> Result<Vec<i64>> {
        let values = match self {
            SeedData::Ints(values) => values.clone(),
            SeedData::Floats(values) => values
                .iter()
                .map(|&f| {
                    if f.is_finite() {
                        Ok(f.trunc() as i64)
                    } else {
                        Err(MusicError::InputShape(format!("non-finite seed value {f}")))
                    }
                })
                .collect::<Result<Vec<_>>>()?,
            SeedData::Chars(chars) => chars.iter().filter_map(|&c| char_index(c)).collect(),
            SeedData::Hex(text) => hex_digits(text)?,
        };
        if values.is_empty() {
            return Err(MusicError::EmptySeed);
        }
        Ok(values)
    }
}

/// Alphabet position of a character; `None` for anything not alphanumeric.
pub fn char_index(c: char) -> Option<i64> {
    let c = c.to_ascii_lowercase();
    match c {
        'a'..='z' => Some(c as i64 - 'a' as i64),
        '0'..='9' => Some(DIGIT_BASE + (c as i64 - '0' as i64)),
        _ => None,
    }
}

fn hex_digits(text: &str) -> Result<Vec<i64>> {
    let digits = text.trim().trim_start_matches('#');
    if digits.is_empty() {
        return Err(MusicError::MalformedHex(text.to_string()));
    }
    digits
        .chars()
        .map(|c| {
            c.to_digit(16)
                .map(i64::from)
                .ok_or_else(|| MusicError::MalformedHex(text.to_string()))
        })
        .collect()
}

/// Fold every index into `0..len`.
///
/// A value past the last index has `len - 1` taken off until it fits, so
/// on a ten-note scale 10 lands on 1 and 18 on 9. Negative values have
/// `len - 1` added until they reach zero or above. A one-note scale maps
/// everything to 0.
pub fn clamp_indices(values: &[i64], len: usize) -> Result<Vec<usize>> {
    if len == 0 {
        return Err(MusicError::InputShape("cannot index an empty scale".into()));
    }
    let last = len as i64 - 1;
    Ok(values.iter().map(|&v| fold_index(v, last) as usize).collect())
}

fn fold_index(v: i64, last: i64) -> i64 {
    if last == 0 {
        0
    } else if v > last {
        (v - 1) % last + 1
    } else if v < 0 {
        v.rem_euclid(last)
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ints_pass_through() {
        assert_eq!(SeedData::Ints(vec![0, 3, 1]).normalize().unwrap(), vec![0, 3, 1]);
    }

    #[test]
    fn floats_truncate() {
        let seed = SeedData::Floats(vec![1.9, -2.7, 0.0]);
        assert_eq!(seed.normalize().unwrap(), vec![1, -2, 0]);
        assert!(SeedData::Floats(vec![f64::NAN]).normalize().is_err());
    }

    #[test]
    fn chars_use_the_alphabet_table() {
        let seed = SeedData::from_text("Ab z-9");
        assert_eq!(seed.normalize().unwrap(), vec![0, 1, 25, 35]);
        assert!(matches!(
            SeedData::from_text("!? ").normalize(),
            Err(MusicError::EmptySeed)
        ));
    }

    #[test]
    fn hex_splits_by_digit() {
        let seed = SeedData::Hex("#FF8800".into());
        assert_eq!(seed.normalize().unwrap(), vec![15, 15, 8, 8, 0, 0]);
        assert_eq!(SeedData::Hex("a1".into()).normalize().unwrap(), vec![10, 1]);
    }

    #[test]
    fn malformed_hex() {
        assert!(matches!(
            SeedData::Hex("#GG0000".into()).normalize(),
            Err(MusicError::MalformedHex(_))
        ));
        assert!(matches!(
            SeedData::Hex("#".into()).normalize(),
            Err(MusicError::MalformedHex(_))
        ));
    }

    #[test]
    fn empty_seed() {
        assert!(matches!(SeedData::Ints(vec![]).normalize(), Err(MusicError::EmptySeed)));
    }

    #[test]
    fn clamping_folds_out_of_range_values() {
        assert_eq!(clamp_indices(&[0, 3, 1], 4).unwrap(), vec![0, 3, 1]);
        // step is len - 1 = 3: 4 -> 1, 9 -> 6 -> 3, -1 -> 2
        assert_eq!(clamp_indices(&[4, 9, -1], 4).unwrap(), vec![1, 3, 2]);
        assert_eq!(clamp_indices(&[10, 12, 18, 9], 10).unwrap(), vec![1, 3, 9, 9]);
        assert_eq!(clamp_indices(&[0, 5, -3], 1).unwrap(), vec![0, 0, 0]);
        assert!(clamp_indices(&[1], 0).is_err());
    }
}

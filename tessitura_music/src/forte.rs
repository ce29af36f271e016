// Forte prime-form catalog, cardinalities 5 through 9.
//
// One entry per set class under transposition and inversion, named by
// Forte number ("6-Z29") and stored in Forte's own prime form (which
// differs from the Rahn form for 5-20, 6-Z29, 6-31, 7-Z18, 7-20 and 8-26).
// Used as an atonal root source by `scale::pick_root_from` and to label
// freshly derived scales with their set class.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ForteSet {
    pub number: &'static str,
    pub pcs: &'static [u8],
}

impl ForteSet {
    const fn new(number: &'static str, pcs: &'static [u8]) -> Self {
        ForteSet { number, pcs }
    }

    pub fn cardinality(&self) -> usize {
        self.pcs.len()
    }
}

/// Smallest and largest set sizes in the catalog.
pub const MIN_CARDINALITY: usize = 5;
pub const MAX_CARDINALITY: usize = 9;

static CATALOG: [ForteSet; 167] = [
    ForteSet::new("5-1", &[0, 1, 2, 3, 4]),
    ForteSet::new("5-2", &[0, 1, 2, 3, 5]),
    ForteSet::new("5-3", &[0, 1, 2, 4, 5]),
    ForteSet::new("5-4", &[0, 1, 2, 3, 6]),
    ForteSet::new("5-5", &[0, 1, 2, 3, 7]),
    ForteSet::new("5-6", &[0, 1, 2, 5, 6]),
    ForteSet::new("5-7", &[0, 1, 2, 6, 7]),
    ForteSet::new("5-8", &[0, 2, 3, 4, 6]),
    ForteSet::new("5-9", &[0, 1, 2, 4, 6]),
    ForteSet::new("5-10", &[0, 1, 3, 4, 6]),
    ForteSet::new("5-11", &[0, 2, 3, 4, 7]),
    ForteSet::new("5-Z12", &[0, 1, 3, 5, 6]),
    ForteSet::new("5-13", &[0, 1, 2, 4, 8]),
    ForteSet::new("5-14", &[0, 1, 2, 5, 7]),
    ForteSet::new("5-15", &[0, 1, 2, 6, 8]),
    ForteSet::new("5-16", &[0, 1, 3, 4, 7]),
    ForteSet::new("5-Z17", &[0, 1, 3, 4, 8]),
    ForteSet::new("5-Z18", &[0, 1, 4, 5, 7]),
    ForteSet::new("5-19", &[0, 1, 3, 6, 7]),
    ForteSet::new("5-20", &[0, 1, 3, 7, 8]),
    ForteSet::new("5-21", &[0, 1, 4, 5, 8]),
    ForteSet::new("5-22", &[0, 1, 4, 7, 8]),
    ForteSet::new("5-23", &[0, 2, 3, 5, 7]),
    ForteSet::new("5-24", &[0, 1, 3, 5, 7]),
    ForteSet::new("5-25", &[0, 2, 3, 5, 8]),
    ForteSet::new("5-26", &[0, 2, 4, 5, 8]),
    ForteSet::new("5-27", &[0, 1, 3, 5, 8]),
    ForteSet::new("5-28", &[0, 2, 3, 6, 8]),
    ForteSet::new("5-29", &[0, 1, 3, 6, 8]),
    ForteSet::new("5-30", &[0, 1, 4, 6, 8]),
    ForteSet::new("5-31", &[0, 1, 3, 6, 9]),
    ForteSet::new("5-32", &[0, 1, 4, 6, 9]),
    ForteSet::new("5-33", &[0, 2, 4, 6, 8]),
    ForteSet::new("5-34", &[0, 2, 4, 6, 9]),
    ForteSet::new("5-35", &[0, 2, 4, 7, 9]),
    ForteSet::new("5-Z36", &[0, 1, 2, 4, 7]),
    ForteSet::new("5-Z37", &[0, 3, 4, 5, 8]),
    ForteSet::new("5-Z38", &[0, 1, 2, 5, 8]),
    ForteSet::new("6-1", &[0, 1, 2, 3, 4, 5]),
    ForteSet::new("6-2", &[0, 1, 2, 3, 4, 6]),
    ForteSet::new("6-Z3", &[0, 1, 2, 3, 5, 6]),
    ForteSet::new("6-Z4", &[0, 1, 2, 4, 5, 6]),
    ForteSet::new("6-5", &[0, 1, 2, 3, 6, 7]),
    ForteSet::new("6-Z6", &[0, 1, 2, 5, 6, 7]),
    ForteSet::new("6-7", &[0, 1, 2, 6, 7, 8]),
    ForteSet::new("6-8", &[0, 2, 3, 4, 5, 7]),
    ForteSet::new("6-9", &[0, 1, 2, 3, 5, 7]),
    ForteSet::new("6-Z10", &[0, 1, 3, 4, 5, 7]),
    ForteSet::new("6-Z11", &[0, 1, 2, 4, 5, 7]),
    ForteSet::new("6-Z12", &[0, 1, 2, 4, 6, 7]),
    ForteSet::new("6-Z13", &[0, 1, 3, 4, 6, 7]),
    ForteSet::new("6-14", &[0, 1, 3, 4, 5, 8]),
    ForteSet::new("6-15", &[0, 1, 2, 4, 5, 8]),
    ForteSet::new("6-16", &[0, 1, 4, 5, 6, 8]),
    ForteSet::new("6-Z17", &[0, 1, 2, 4, 7, 8]),
    ForteSet::new("6-18", &[0, 1, 2, 5, 7, 8]),
    ForteSet::new("6-Z19", &[0, 1, 3, 4, 7, 8]),
    ForteSet::new("6-20", &[0, 1, 4, 5, 8, 9]),
    ForteSet::new("6-21", &[0, 2, 3, 4, 6, 8]),
    ForteSet::new("6-22", &[0, 1, 2, 4, 6, 8]),
    ForteSet::new("6-Z23", &[0, 2, 3, 5, 6, 8]),
    ForteSet::new("6-Z24", &[0, 1, 3, 4, 6, 8]),
    ForteSet::new("6-Z25", &[0, 1, 3, 5, 6, 8]),
    ForteSet::new("6-Z26", &[0, 1, 3, 5, 7, 8]),
    ForteSet::new("6-27", &[0, 1, 3, 4, 6, 9]),
    ForteSet::new("6-Z28", &[0, 1, 3, 5, 6, 9]),
    ForteSet::new("6-Z29", &[0, 1, 3, 6, 8, 9]),
    ForteSet::new("6-30", &[0, 1, 3, 6, 7, 9]),
    ForteSet::new("6-31", &[0, 1, 3, 5, 8, 9]),
    ForteSet::new("6-32", &[0, 2, 4, 5, 7, 9]),
    ForteSet::new("6-33", &[0, 2, 3, 5, 7, 9]),
    ForteSet::new("6-34", &[0, 1, 3, 5, 7, 9]),
    ForteSet::new("6-35", &[0, 2, 4, 6, 8, 10]),
    ForteSet::new("6-Z36", &[0, 1, 2, 3, 4, 7]),
    ForteSet::new("6-Z37", &[0, 1, 2, 3, 4, 8]),
    ForteSet::new("6-Z38", &[0, 1, 2, 3, 7, 8]),
    ForteSet::new("6-Z39", &[0, 2, 3, 4, 5, 8]),
    ForteSet::new("6-Z40", &[0, 1, 2, 3, 5, 8]),
    ForteSet::new("6-Z41", &[0, 1, 2, 3, 6, 8]),
    ForteSet::new("6-Z42", &[0, 1, 2, 3, 6, 9]),
    ForteSet::new("6-Z43", &[0, 1, 2, 5, 6, 8]),
    ForteSet::new("6-Z44", &[0, 1, 2, 5, 6, 9]),
    ForteSet::new("6-Z45", &[0, 2, 3, 4, 6, 9]),
    ForteSet::new("6-Z46", &[0, 1, 2, 4, 6, 9]),
    ForteSet::new("6-Z47", &[0, 1, 2, 4, 7, 9]),
    ForteSet::new("6-Z48", &[0, 1, 2, 5, 7, 9]),
    ForteSet::new("6-Z49", &[0, 1, 3, 4, 7, 9]),
    ForteSet::new("6-Z50", &[0, 1, 4, 6, 7, 9]),
    ForteSet::new("7-1", &[0, 1, 2, 3, 4, 5, 6]),
    ForteSet::new("7-2", &[0, 1, 2, 3, 4, 5, 7]),
    ForteSet::new("7-3", &[0, 1, 2, 3, 4, 5, 8]),
    ForteSet::new("7-4", &[0, 1, 2, 3, 4, 6, 7]),
    ForteSet::new("7-5", &[0, 1, 2, 3, 5, 6, 7]),
    ForteSet::new("7-6", &[0, 1, 2, 3, 4, 7, 8]),
    ForteSet::new("7-7", &[0, 1, 2, 3, 6, 7, 8]),
    ForteSet::new("7-8", &[0, 2, 3, 4, 5, 6, 8]),
    ForteSet::new("7-9", &[0, 1, 2, 3, 4, 6, 8]),
    ForteSet::new("7-10", &[0, 1, 2, 3, 4, 6, 9]),
    ForteSet::new("7-11", &[0, 1, 3, 4, 5, 6, 8]),
    ForteSet::new("7-Z12", &[0, 1, 2, 3, 4, 7, 9]),
    ForteSet::new("7-13", &[0, 1, 2, 4, 5, 6, 8]),
    ForteSet::new("7-14", &[0, 1, 2, 3, 5, 7, 8]),
    ForteSet::new("7-15", &[0, 1, 2, 4, 6, 7, 8]),
    ForteSet::new("7-16", &[0, 1, 2, 3, 5, 6, 9]),
    ForteSet::new("7-Z17", &[0, 1, 2, 4, 5, 6, 9]),
    ForteSet::new("7-Z18", &[0, 1, 4, 5, 6, 7, 9]),
    ForteSet::new("7-19", &[0, 1, 2, 3, 6, 7, 9]),
    ForteSet::new("7-20", &[0, 1, 2, 5, 6, 7, 9]),
    ForteSet::new("7-21", &[0, 1, 2, 4, 5, 8, 9]),
    ForteSet::new("7-22", &[0, 1, 2, 5, 6, 8, 9]),
    ForteSet::new("7-23", &[0, 2, 3, 4, 5, 7, 9]),
    ForteSet::new("7-24", &[0, 1, 2, 3, 5, 7, 9]),
    ForteSet::new("7-25", &[0, 2, 3, 4, 6, 7, 9]),
    ForteSet::new("7-26", &[0, 1, 3, 4, 5, 7, 9]),
    ForteSet::new("7-27", &[0, 1, 2, 4, 5, 7, 9]),
    ForteSet::new("7-28", &[0, 1, 3, 5, 6, 7, 9]),
    ForteSet::new("7-29", &[0, 1, 2, 4, 6, 7, 9]),
    ForteSet::new("7-30", &[0, 1, 2, 4, 6, 8, 9]),
    ForteSet::new("7-31", &[0, 1, 3, 4, 6, 7, 9]),
    ForteSet::new("7-32", &[0, 1, 3, 4, 6, 8, 9]),
    ForteSet::new("7-33", &[0, 1, 2, 4, 6, 8, 10]),
    ForteSet::new("7-34", &[0, 1, 3, 4, 6, 8, 10]),
    ForteSet::new("7-35", &[0, 1, 3, 5, 6, 8, 10]),
    ForteSet::new("7-Z36", &[0, 1, 2, 3, 5, 6, 8]),
    ForteSet::new("7-Z37", &[0, 1, 3, 4, 5, 7, 8]),
    ForteSet::new("7-Z38", &[0, 1, 2, 4, 5, 7, 8]),
    ForteSet::new("8-1", &[0, 1, 2, 3, 4, 5, 6, 7]),
    ForteSet::new("8-2", &[0, 1, 2, 3, 4, 5, 6, 8]),
    ForteSet::new("8-3", &[0, 1, 2, 3, 4, 5, 6, 9]),
    ForteSet::new("8-4", &[0, 1, 2, 3, 4, 5, 7, 8]),
    ForteSet::new("8-5", &[0, 1, 2, 3, 4, 6, 7, 8]),
    ForteSet::new("8-6", &[0, 1, 2, 3, 5, 6, 7, 8]),
    ForteSet::new("8-7", &[0, 1, 2, 3, 4, 5, 8, 9]),
    ForteSet::new("8-8", &[0, 1, 2, 3, 4, 7, 8, 9]),
    ForteSet::new("8-9", &[0, 1, 2, 3, 6, 7, 8, 9]),
    ForteSet::new("8-10", &[0, 2, 3, 4, 5, 6, 7, 9]),
    ForteSet::new("8-11", &[0, 1, 2, 3, 4, 5, 7, 9]),
    ForteSet::new("8-12", &[0, 1, 3, 4, 5, 6, 7, 9]),
    ForteSet::new("8-13", &[0, 1, 2, 3, 4, 6, 7, 9]),
    ForteSet::new("8-14", &[0, 1, 2, 4, 5, 6, 7, 9]),
    ForteSet::new("8-Z15", &[0, 1, 2, 3, 4, 6, 8, 9]),
    ForteSet::new("8-16", &[0, 1, 2, 3, 5, 7, 8, 9]),
    ForteSet::new("8-17", &[0, 1, 3, 4, 5, 6, 8, 9]),
    ForteSet::new("8-18", &[0, 1, 2, 3, 5, 6, 8, 9]),
    ForteSet::new("8-19", &[0, 1, 2, 4, 5, 6, 8, 9]),
    ForteSet::new("8-20", &[0, 1, 2, 4, 5, 7, 8, 9]),
    ForteSet::new("8-21", &[0, 1, 2, 3, 4, 6, 8, 10]),
    ForteSet::new("8-22", &[0, 1, 2, 3, 5, 6, 8, 10]),
    ForteSet::new("8-23", &[0, 1, 2, 3, 5, 7, 8, 10]),
    ForteSet::new("8-24", &[0, 1, 2, 4, 5, 6, 8, 10]),
    ForteSet::new("8-25", &[0, 1, 2, 4, 6, 7, 8, 10]),
    ForteSet::new("8-26", &[0, 1, 2, 4, 5, 7, 9, 10]),
    ForteSet::new("8-27", &[0, 1, 2, 4, 5, 7, 8, 10]),
    ForteSet::new("8-28", &[0, 1, 3, 4, 6, 7, 9, 10]),
    ForteSet::new("8-Z29", &[0, 1, 2, 3, 5, 6, 7, 9]),
    ForteSet::new("9-1", &[0, 1, 2, 3, 4, 5, 6, 7, 8]),
    ForteSet::new("9-2", &[0, 1, 2, 3, 4, 5, 6, 7, 9]),
    ForteSet::new("9-3", &[0, 1, 2, 3, 4, 5, 6, 8, 9]),
    ForteSet::new("9-4", &[0, 1, 2, 3, 4, 5, 7, 8, 9]),
    ForteSet::new("9-5", &[0, 1, 2, 3, 4, 6, 7, 8, 9]),
    ForteSet::new("9-6", &[0, 1, 2, 3, 4, 5, 6, 8, 10]),
    ForteSet::new("9-7", &[0, 1, 2, 3, 4, 5, 7, 8, 10]),
    ForteSet::new("9-8", &[0, 1, 2, 3, 4, 6, 7, 8, 10]),
    ForteSet::new("9-9", &[0, 1, 2, 3, 5, 6, 7, 8, 10]),
    ForteSet::new("9-10", &[0, 1, 2, 3, 4, 6, 7, 9, 10]),
    ForteSet::new("9-11", &[0, 1, 2, 3, 5, 6, 7, 9, 10]),
    ForteSet::new("9-12", &[0, 1, 2, 4, 5, 6, 8, 9, 10]),
];

pub fn catalog() -> &'static [ForteSet] {
    &CATALOG
}

/// Look up an entry by Forte number, e.g. "7-35".
pub fn by_number(number: &str) -> Option<&'static ForteSet> {
    CATALOG.iter().find(|set| set.number == number)
}

/// All entries with the given number of pitch classes.
pub fn of_cardinality(n: usize) -> impl Iterator<Item = &'static ForteSet> {
    CATALOG.iter().filter(move |set| set.cardinality() == n)
}

/// Find the set class of an arbitrary pitch-class collection.
///
/// Values are reduced mod 12 and de-duplicated first. Returns `None` when
/// the resulting cardinality is outside 5..=9.
pub fn identify(pcs: &[i32]) -> Option<&'static ForteSet> {
    let mut set: Vec<u8> = pcs.iter().map(|p| p.rem_euclid(12) as u8).collect();
    set.sort_unstable();
    set.dedup();
    if !(MIN_CARDINALITY..=MAX_CARDINALITY).contains(&set.len()) {
        return None;
    }

    for t in 0..12u8 {
        for inverted in [false, true] {
            let mut form: Vec<u8> = set
                .iter()
                .map(|&p| {
                    let base = if inverted { (12 - p) % 12 } else { p };
                    (base + t) % 12
                })
                .collect();
            form.sort_unstable();
            if let Some(found) = of_cardinality(set.len()).find(|entry| entry.pcs == form.as_slice()) {
                return Some(found);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_counts_per_cardinality() {
        let counts: Vec<usize> = (MIN_CARDINALITY..=MAX_CARDINALITY)
            .map(|n| of_cardinality(n).count())
            .collect();
        assert_eq!(counts, vec![38, 50, 38, 29, 12]);
    }

    #[test]
    fn entries_are_normalized() {
        for set in catalog() {
            assert_eq!(set.pcs[0], 0, "{}", set.number);
            assert!(set.pcs.windows(2).all(|w| w[0] < w[1]), "{}", set.number);
            assert!(set.pcs.iter().all(|&p| p < 12), "{}", set.number);
            let prefix: usize = set.number.split('-').next().unwrap().parse().unwrap();
            assert_eq!(prefix, set.cardinality(), "{}", set.number);
        }
    }

    #[test]
    fn every_entry_identifies_as_itself() {
        for set in catalog() {
            let pcs: Vec<i32> = set.pcs.iter().map(|&p| p as i32).collect();
            assert_eq!(identify(&pcs).map(|s| s.number), Some(set.number));
        }
    }

    #[test]
    fn identify_familiar_scales() {
        // C major, transposed and out of order.
        assert_eq!(identify(&[7, 9, 11, 0, 2, 4, 6]).unwrap().number, "7-35");
        // Major pentatonic.
        assert_eq!(identify(&[0, 2, 4, 7, 9]).unwrap().number, "5-35");
        // Whole-tone, with octave duplicates.
        assert_eq!(identify(&[0, 2, 4, 6, 8, 10, 12, 14]).unwrap().number, "6-35");
        // Harmonic minor (inversion of harmonic major).
        assert_eq!(identify(&[9, 11, 0, 2, 4, 5, 8]).unwrap().number, "7-32");
    }

    #[test]
    fn identify_rejects_small_sets() {
        assert!(identify(&[0, 4, 7]).is_none());
        assert!(identify(&[0, 12, 24, 4, 16]).is_none());
    }

    #[test]
    fn lookup_by_number() {
        assert_eq!(by_number("6-Z29").unwrap().pcs, &[0, 1, 3, 6, 8, 9]);
        assert!(by_number("4-1").is_none());
    }
}

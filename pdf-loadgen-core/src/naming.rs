//! Output file names.

use rand::Rng;
use std::ops::RangeInclusive;

/// Range of the numeric suffix appended to every file name.
pub const SUFFIX_RANGE: RangeInclusive<u32> = 10_000..=99_999;

/// Builds `"{prefix}-{nnnnn}.pdf"` with a random five digit suffix.
///
/// The prefix is used verbatim; a prefix that is not a valid path component
/// only fails once the file is created.
pub fn file_name<R: Rng + ?Sized>(rng: &mut R, prefix: &str) -> String {
    let suffix = rng.gen_range(SUFFIX_RANGE);
    format!("{prefix}-{suffix}.pdf")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use regex::Regex;

    #[test]
    fn test_format() {
        let name = file_name(&mut rand::thread_rng(), "TEST");
        let pattern = Regex::new(r"^TEST-\d{5}\.pdf$").unwrap();
        assert!(pattern.is_match(&name), "unexpected name {name}");
    }

    #[test]
    fn test_prefix_taken_verbatim() {
        let name = file_name(&mut StdRng::seed_from_u64(1), "a b/c");
        assert!(name.starts_with("a b/c-"));

        let name = file_name(&mut StdRng::seed_from_u64(1), "");
        assert!(name.starts_with('-'));
    }

    #[test]
    fn test_seeded_names_repeat() {
        let a = file_name(&mut StdRng::seed_from_u64(99), "X");
        let b = file_name(&mut StdRng::seed_from_u64(99), "X");
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_suffix_in_range(seed in any::<u64>(), prefix in "[A-Za-z0-9_]{0,12}") {
            let name = file_name(&mut StdRng::seed_from_u64(seed), &prefix);
            let suffix = name
                .strip_prefix(&format!("{prefix}-"))
                .and_then(|rest| rest.strip_suffix(".pdf"))
                .unwrap();
            prop_assert_eq!(suffix.len(), 5);
            let value: u32 = suffix.parse().unwrap();
            prop_assert!(SUFFIX_RANGE.contains(&value));
        }
    }
}

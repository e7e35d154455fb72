use rand::Rng;
use rand::seq::IndexedRandom;

/// Characters random stimulus text is built from. Repeated entries are kept
/// on purpose: they make those characters more likely to be drawn.
pub const CHAR_PALETTE: &str = concat!(
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "ùéèàç^ùèàçé«¼±£¢¤¬¦²³½¾°µ¯\u{ad}±√∞≤≥±≠",
);

/// Word lengths picked between separators
pub const WORD_LENGTHS: [usize; 5] = [1, 3, 5, 7, 9];

/// Builds `len` characters of word-like noise from [`CHAR_PALETTE`].
///
/// A pool of `len` random palette characters is cut into words of random
/// length, each followed by one space, until the result is at least `len`
/// long; the result is then truncated to exactly `len` characters.
pub fn random_text<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    let palette: Vec<char> = CHAR_PALETTE.chars().collect();
    let pool: Vec<char> = (0..len)
        .map(|_| *palette.choose(rng).unwrap_or(&' '))
        .collect();

    let mut out: Vec<char> = Vec::with_capacity(len + WORD_LENGTHS[WORD_LENGTHS.len() - 1] + 1);
    while out.len() < len {
        let word = *WORD_LENGTHS.choose(rng).unwrap_or(&1);
        let start = out.len().min(pool.len());
        let end = (start + word).min(pool.len());
        out.extend_from_slice(&pool[start..end]);
        out.push(' ');
    }
    out.truncate(len);
    out.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn exact_length_for_many_sizes() {
        let mut rng = StdRng::seed_from_u64(7);
        for len in 1..=400 {
            let text = random_text(&mut rng, len);
            assert_eq!(text.chars().count(), len, "len {len}");
        }
    }

    #[test]
    fn only_palette_chars_and_spaces() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let text = random_text(&mut rng, 160);
            assert!(text.chars().all(|c| c == ' ' || CHAR_PALETTE.contains(c)));
        }
    }

    #[test]
    fn words_are_separated_by_single_spaces() {
        let mut rng = StdRng::seed_from_u64(3);
        let text = random_text(&mut rng, 160);
        assert!(!text.contains("  "));
        assert!(!text.starts_with(' '));
        for word in text.split(' ').filter(|w| !w.is_empty()) {
            assert!(word.chars().count() <= 9);
        }
    }

    #[test]
    fn same_seed_same_text() {
        let a = random_text(&mut StdRng::seed_from_u64(42), 160);
        let b = random_text(&mut StdRng::seed_from_u64(42), 160);
        assert_eq!(a, b);
    }

    #[test]
    fn zero_length_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(random_text(&mut rng, 0).is_empty());
    }
}

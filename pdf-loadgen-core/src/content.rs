//! Random filler text.

use rand::distributions::{Distribution, Uniform};
use rand::Rng;

/// Characters the filler text is drawn from: ASCII letters, digits and space.
pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789 ";

/// Returns exactly `len` characters drawn independently and uniformly from
/// [`ALPHABET`].
///
/// ```rust
/// let text = pdf_loadgen::random_text(&mut rand::thread_rng(), 64);
/// assert_eq!(text.len(), 64);
/// ```
pub fn random_text<R: Rng + ?Sized>(rng: &mut R, len: usize) -> String {
    let index = Uniform::from(0..ALPHABET.len());
    let mut text = String::with_capacity(len);
    for _ in 0..len {
        text.push(char::from(ALPHABET[index.sample(rng)]));
    }
    text
}

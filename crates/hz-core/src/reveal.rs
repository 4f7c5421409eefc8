/// Shout banner, 88 characters once fully revealed.
pub const SHOUT: &str =
    "Coooooooooooooooooooooooooooooooooooooooooooooooooooooooooooooooooooooooooooooooooooool!";

/// Content shown when none is given.
pub const DEFAULT_CONTENT: &str = "ほずみ";

/// Each character of `content` on its own, in order.
///
/// Characters are Unicode scalar values: a multi-byte character is one step.
///
/// # Example
/// ```
/// use hz_core::reveal::letters;
/// assert_eq!(letters("ほずみ").collect::<Vec<_>>(), ["ほ", "ず", "み"]);
/// ```
pub fn letters(content: &str) -> impl Iterator<Item = &str> + '_ {
    content
        .char_indices()
        .map(move |(i, ch)| &content[i..i + ch.len_utf8()])
}

/// Every non-empty prefix of `content`, one character longer each time.
///
/// # Example
/// ```
/// use hz_core::reveal::prefixes;
/// assert_eq!(prefixes("abc").collect::<Vec<_>>(), ["a", "ab", "abc"]);
/// ```
pub fn prefixes(content: &str) -> impl Iterator<Item = &str> + '_ {
    content
        .char_indices()
        .map(move |(i, ch)| &content[..i + ch.len_utf8()])
}

/// Number of reveal steps for `content`.
#[inline]
#[must_use]
pub fn step_count(content: &str) -> usize {
    content.chars().count()
}

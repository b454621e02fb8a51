/// Characters per token assumed by the estimate
pub const CHARS_PER_TOKEN: usize = 4;

/// Rough token count: `ceil(chars / 4)`. Not a real tokenizer.
#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

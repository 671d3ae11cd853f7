use std::sync::OnceLock;

use regex::Regex;

use crate::types::Block;

const BLOCK_SEPARATOR: &str = "\n\n";
const SENTENCE_SEPARATOR: &str = ".\n\n";

/// Join block texts with a blank line between blocks.
pub fn flatten_blocks(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(Block::text)
        .collect::<Vec<_>>()
        .join(BLOCK_SEPARATOR)
}

/// Put every sentence on its own paragraph.
///
/// A sentence boundary is a period followed by whitespace and an uppercase
/// ASCII letter; whitespace before the period is dropped too. Each boundary is
/// rewritten to a period and a blank line, keeping the capital letter.
/// Running it again on its own output changes nothing.
pub fn normalize_sentences(text: &str) -> String {
    static RE_SENTENCE: OnceLock<Regex> = OnceLock::new();
    let re_sentence = RE_SENTENCE.get_or_init(|| Regex::new(r"\s*\.\s+[A-Z]").unwrap());

    let mut result = String::with_capacity(text.len());
    let mut start = 0;
    for m in re_sentence.find_iter(text) {
        result.push_str(&text[start..m.start()]);
        result.push_str(SENTENCE_SEPARATOR);
        // the capital is a single ASCII byte and belongs to the next sentence
        start = m.end() - 1;
    }
    result.push_str(&text[start..]);
    result
}

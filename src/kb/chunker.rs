//! Fixed-size overlapping character chunks.

/// Split `text` into chunks of at most `size` characters with `overlap`
/// characters shared between neighbours. Operates on character boundaries so
/// multi-byte text never splits mid-codepoint.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Vec<String> {
    if text.is_empty() || size == 0 {
        return Vec::new();
    }
    let overlap = overlap.min(size.saturating_sub(1));
    let chars: Vec<char> = text.chars().collect();
    let step = size - overlap;

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }
    chunks
}

//! Word-bounded text chunking for speech playback.

/// Split `text` into chunks of at most `max_len` characters at word
/// boundaries.
///
/// Words are separated by spaces and packed greedily: a word joins the
/// current chunk while `chunk + ' ' + word` still fits, otherwise the chunk
/// is closed and the word starts the next one. A single word longer than
/// `max_len` becomes its own oversized chunk. Lengths are counted in
/// characters. Runs of spaces collapse and whitespace-only words are
/// dropped, so no chunk is blank or starts with a space.
pub fn split_into_chunks(text: &str, max_len: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split(' ').filter(|w| !w.trim().is_empty()) {
        let word_len = word.chars().count();
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_len {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            chunks.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

use crate::core::config::IngestConfig;

/// Splits text into overlapping character windows, preferring to cut at a
/// sentence boundary near the end of each window.
#[derive(Debug, Clone)]
pub struct Chunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Chunker {
    pub fn new(config: &IngestConfig) -> Self {
        Self {
            chunk_size: config.chunk_size.max(1),
            chunk_overlap: config.chunk_overlap,
        }
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        if chars.is_empty() {
            return Vec::new();
        }

        let step = self.chunk_size.saturating_sub(self.chunk_overlap).max(1);
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            let window = &chars[start..end];

            let cut = if end < chars.len() {
                sentence_boundary(window).unwrap_or(window.len())
            } else {
                window.len()
            };

            let fragment: String = window[..cut].iter().collect();
            let trimmed = fragment.trim();
            if !trimmed.is_empty() {
                chunks.push(trimmed.to_string());
            }

            start += step;
        }

        chunks
    }
}

/// Last sentence end in the final 20% of the window, if any.
fn sentence_boundary(window: &[char]) -> Option<usize> {
    let floor = (window.len() * 4) / 5;
    for idx in (floor..window.len().saturating_sub(1)).rev() {
        if matches!(window[idx], '.' | '!' | '?') && window[idx + 1].is_whitespace() {
            return Some(idx + 1);
        }
    }
    None
}

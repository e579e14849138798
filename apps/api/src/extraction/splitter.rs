//! Recursive character splitter.
//!
//! Splits on the first separator that occurs in the text (paragraph break,
//! then line break, then space, then individual characters), recursing into
//! pieces that are still too long, and merges small pieces back into chunks of
//! at most `chunk_size` characters. Adjacent chunks share up to
//! `chunk_overlap` characters of trailing context. Lengths are in characters.

use std::collections::VecDeque;

use crate::config::ChunkingConfig;

pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl TextSplitter {
    pub fn new(config: ChunkingConfig) -> Self {
        Self {
            chunk_size: config.chunk_size.max(1),
            chunk_overlap: config.chunk_overlap.min(config.chunk_size.saturating_sub(1)),
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Splits `text` into trimmed, non-empty chunks in source order.
    pub fn split(&self, text: &str) -> Vec<String> {
        self.split_with(text, &self.separators)
    }

    fn split_with(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut separator = separators.last().map(String::as_str).unwrap_or("");
        let mut remaining: &[String] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = "";
                break;
            }
            if text.contains(candidate.as_str()) {
                separator = candidate.as_str();
                remaining = &separators[i + 1..];
                break;
            }
        }

        let pieces: Vec<&str> = if separator.is_empty() {
            text.char_indices()
                .map(|(i, c)| &text[i..i + c.len_utf8()])
                .collect()
        } else {
            text.split(separator).filter(|p| !p.is_empty()).collect()
        };

        let mut chunks = Vec::new();
        let mut short_pieces: Vec<&str> = Vec::new();
        for piece in pieces {
            if char_len(piece) < self.chunk_size {
                short_pieces.push(piece);
                continue;
            }
            if !short_pieces.is_empty() {
                chunks.extend(self.merge(&short_pieces, separator));
                short_pieces.clear();
            }
            if remaining.is_empty() {
                chunks.push(piece.trim().to_string());
            } else {
                chunks.extend(self.split_with(piece, remaining));
            }
        }
        if !short_pieces.is_empty() {
            chunks.extend(self.merge(&short_pieces, separator));
        }

        chunks.retain(|c| !c.is_empty());
        chunks
    }

    /// Greedily packs pieces into chunks, keeping a tail of at most
    /// `chunk_overlap` characters as the head of the next chunk.
    fn merge(&self, pieces: &[&str], separator: &str) -> Vec<String> {
        let sep_len = char_len(separator);
        let mut chunks = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = char_len(piece);

            if !window.is_empty() && total + len + sep_len > self.chunk_size {
                push_trimmed(&mut chunks, &window, separator);

                // Drop from the front until only the overlap remains and the
                // next piece fits.
                while let Some(&front) = window.front() {
                    let joined_sep = if window.is_empty() { 0 } else { sep_len };
                    let fits = total + len + joined_sep <= self.chunk_size;
                    if total <= self.chunk_overlap && fits {
                        break;
                    }
                    window.pop_front();
                    let freed_sep = if window.is_empty() { 0 } else { sep_len };
                    total -= char_len(front) + freed_sep;
                }
            }

            let joined_sep = if window.is_empty() { 0 } else { sep_len };
            window.push_back(piece);
            total += len + joined_sep;
        }

        push_trimmed(&mut chunks, &window, separator);
        chunks
    }
}

fn push_trimmed(chunks: &mut Vec<String>, window: &VecDeque<&str>, separator: &str) {
    let joined = window.iter().copied().collect::<Vec<_>>().join(separator);
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

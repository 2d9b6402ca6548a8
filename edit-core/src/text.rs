//! Styled document content.
//!
//! Characters live in a [`Rope`]; their styles live in a parallel list of
//! runs, each covering a stretch of consecutive characters with one
//! [`CharStyle`]. Positions and lengths count characters, not bytes.
//!
//! Out-of-range positions are clamped to the end of the text and counts are
//! clamped to the characters that exist, so every edit is total. Callers
//! that need to know what actually happened get the clamped values back.

use edit_types::{CharStyle, StyleType};
use ropey::Rope;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StyleRun {
    len: usize,
    style: CharStyle,
}

/// Text with per-character bold/italic/underline flags.
///
/// Runs are kept canonical (no empty runs, no two neighbours with the same
/// style), so two values compare equal exactly when they hold the same
/// characters with the same styles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledText {
    rope: Rope,
    runs: Vec<StyleRun>,
}

impl StyledText {
    /// Empty text.
    pub fn new() -> Self {
        Self::default()
    }

    /// Unstyled text with the given characters.
    pub fn from_plain(text: &str) -> Self {
        let mut styled = Self::new();
        styled.insert(0, text, CharStyle::PLAIN);
        styled
    }

    /// Number of characters.
    pub fn len(&self) -> usize {
        self.rope.len_chars()
    }

    /// Whether the text has no characters.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The characters without styling.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Style of the character at `index`, or `None` past the end.
    pub fn style_at(&self, index: usize) -> Option<CharStyle> {
        let mut start = 0;
        for run in &self.runs {
            if index < start + run.len {
                return Some(run.style);
            }
            start += run.len;
        }
        None
    }

    /// Maximal stretches of identically styled text, in order.
    pub fn spans(&self) -> Vec<(String, CharStyle)> {
        let mut start = 0;
        self.runs
            .iter()
            .map(|run| {
                let segment = self.rope.slice(start..start + run.len).to_string();
                start += run.len;
                (segment, run.style)
            })
            .collect()
    }

    /// Clamp a `(position, count)` range to the existing characters.
    pub fn clamp_range(&self, position: usize, num_chars: usize) -> (usize, usize) {
        let position = position.min(self.len());
        (position, num_chars.min(self.len() - position))
    }

    /// Insert `text` before the character at `position`. Returns the clamped position.
    pub fn insert(&mut self, position: usize, text: &str, style: CharStyle) -> usize {
        let position = position.min(self.len());
        let inserted = text.chars().count();
        if inserted == 0 {
            return position;
        }

        let at = self.split_at(position);
        self.runs.insert(
            at,
            StyleRun {
                len: inserted,
                style,
            },
        );
        self.rope.insert(position, text);
        self.coalesce();
        position
    }

    /// Remove up to `num_chars` characters from `position`. Returns the clamped range.
    pub fn delete(&mut self, position: usize, num_chars: usize) -> (usize, usize) {
        let (position, count) = self.clamp_range(position, num_chars);
        if count == 0 {
            return (position, 0);
        }

        let first = self.split_at(position);
        let last = self.split_at(position + count);
        self.runs.drain(first..last);
        self.rope.remove(position..position + count);
        self.coalesce();
        (position, count)
    }

    /// Set or clear one style flag over a range. Returns the clamped range.
    pub fn restyle(
        &mut self,
        position: usize,
        num_chars: usize,
        style_type: StyleType,
        enabled: bool,
    ) -> (usize, usize) {
        let (position, count) = self.clamp_range(position, num_chars);
        if count == 0 {
            return (position, 0);
        }

        let first = self.split_at(position);
        let last = self.split_at(position + count);
        for run in &mut self.runs[first..last] {
            run.style = run.style.with(style_type, enabled);
        }
        self.coalesce();
        (position, count)
    }

    /// Make `offset` a run boundary; returns the index of the run starting there.
    fn split_at(&mut self, offset: usize) -> usize {
        let mut start = 0;
        for i in 0..self.runs.len() {
            let run = self.runs[i];
            if offset == start {
                return i;
            }
            if offset < start + run.len {
                let head = offset - start;
                self.runs[i].len = head;
                self.runs.insert(
                    i + 1,
                    StyleRun {
                        len: run.len - head,
                        style: run.style,
                    },
                );
                return i + 1;
            }
            start += run.len;
        }
        self.runs.len()
    }

    fn coalesce(&mut self) {
        let mut merged: Vec<StyleRun> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.len == 0 {
                continue;
            }
            match merged.last_mut() {
                Some(prev) if prev.style == run.style => prev.len += run.len,
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }
}

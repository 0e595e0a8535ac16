//! Byte offset to (line, column) resolution, for diagnostics.
//!
//! Built once per source text as a table of newline offsets, so repeated
//! lookups (one per diagnostic, not one per character) are a binary search
//! instead of a rescan from the start of the file.

/// Precomputed newline index for a source string.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of each `\n` in the source, in order.
    newlines: Vec<u32>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let newlines = source
            .bytes()
            .enumerate()
            .filter(|&(_, b)| b == b'\n')
            .map(|(i, _)| i as u32)
            .collect();
        Self { newlines }
    }

    /// 0-indexed line and column for a byte offset.
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        match self.newlines.binary_search(&offset) {
            Ok(line) | Err(line) => {
                let line = line as u32;
                let line_start = if line == 0 {
                    0
                } else {
                    self.newlines[line as usize - 1] + 1
                };
                (line, offset - line_start)
            }
        }
    }
}

#[cfg(test)]
mod source_map_tests {
    use super::*;

    #[test]
    fn first_line_first_column() {
        let idx = LineIndex::new("abc\ndef");
        assert_eq!(idx.line_col(0), (0, 0));
    }

    #[test]
    fn after_newline_resets_column() {
        let idx = LineIndex::new("abc\ndef");
        assert_eq!(idx.line_col(4), (1, 0));
        assert_eq!(idx.line_col(6), (1, 2));
    }

    #[test]
    fn multiple_lines() {
        let idx = LineIndex::new("a\nbb\nccc\nd");
        assert_eq!(idx.line_col(0), (0, 0));
        assert_eq!(idx.line_col(2), (1, 0));
        assert_eq!(idx.line_col(5), (2, 0));
        assert_eq!(idx.line_col(9), (3, 0));
    }
}

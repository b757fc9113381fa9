//! Line/column lookup from byte offsets, for diagnostic rendering.

use ta_ir::Span;

/// Pre-computed line-start offsets, for O(log L) offset → (line, column)
/// lookup instead of rescanning the source for every diagnostic.
#[derive(Clone, Debug, Default)]
pub struct LineOffsetTable {
    /// Byte offset of each line start; `offsets[0] == 0`.
    offsets: Vec<u32>,
}

impl LineOffsetTable {
    #[must_use]
    pub fn build(source: &str) -> Self {
        let mut offsets = vec![0u32];
        for (i, byte) in source.as_bytes().iter().enumerate() {
            if *byte == b'\n' {
                offsets.push(u32::try_from(i + 1).expect("source file too large"));
            }
        }
        LineOffsetTable { offsets }
    }

    /// 1-based line number containing `offset`.
    #[must_use]
    pub fn line_from_offset(&self, offset: u32) -> u32 {
        let line_idx = match self.offsets.binary_search(&offset) {
            Ok(exact) => exact,
            Err(insert) => insert.saturating_sub(1),
        };
        u32::try_from(line_idx).expect("line index overflow") + 1
    }

    /// 1-based `(line, column)` for `offset`.
    #[must_use]
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line = self.line_from_offset(offset);
        let line_start = self.offsets[(line - 1) as usize];
        (line, offset - line_start + 1)
    }

    /// 1-based `(line, column)` of a span's start, the position used when
    /// sorting and rendering diagnostics.
    #[must_use]
    pub fn span_start(&self, span: Span) -> (u32, u32) {
        self.line_col(span.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locates_offsets_across_lines() {
        let source = "line1\nline2\nline3";
        let table = LineOffsetTable::build(source);
        assert_eq!(table.line_col(0), (1, 1));
        assert_eq!(table.line_col(6), (2, 1));
        assert_eq!(table.line_col(12), (3, 1));
        assert_eq!(table.line_col(15), (3, 4));
    }
}

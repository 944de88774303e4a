//! Code editor buffer
//!
//! Holds the game source text together with the cursor and the set of
//! folded asset literals. All mutation goes through the reducer in
//! `state.rs`; this module only knows how to apply an edit.

use regex::Regex;
use std::collections::BTreeSet;
use std::ops::Range;
use std::sync::OnceLock;

/// Title used when the source has no `@title:` header
pub const DRAFT_TITLE: &str = "DRAFT";

/// Tagged template literal holding an asset, e.g. ``bitmap`...` ``
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLiteral {
    pub tag: String,
    /// Whole match, tag included
    pub range: Range<usize>,
    /// Text between the backticks
    pub body: Range<usize>,
}

/// Cursor movement requested by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorMove {
    Left,
    Right,
    Up,
    Down,
    LineStart,
    LineEnd,
}

/// One line as shown in the code pane, with folds collapsed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayLine {
    pub start: usize,
    pub text: String,
    pub folded: Option<AssetLiteral>,
}

/// Display lines plus the cursor's (row, column), if visible
#[derive(Debug, Clone, Default)]
pub struct DisplayView {
    pub lines: Vec<DisplayLine>,
    pub cursor: Option<(usize, usize)>,
}

fn asset_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(map|bitmap|tune)`[\s\S]*?`").expect("asset literal pattern is valid")
    })
}

fn title_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"@title:\s+([^\n]+)").expect("title pattern is valid"))
}

/// Editor text buffer
#[derive(Debug, Clone, Default)]
pub struct EditorBuffer {
    text: String,
    cursor: usize,
    folds: BTreeSet<usize>,
}

impl EditorBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            cursor: 0,
            folds: BTreeSet::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace `range` with `insert`, leaving the cursor after the insertion.
    ///
    /// The range is clamped to the buffer and snapped to char boundaries.
    /// Fold positions are dropped since offsets no longer line up.
    pub fn replace(&mut self, range: Range<usize>, insert: &str) {
        let end = self.floor_boundary(range.end.min(self.text.len()));
        let start = self.floor_boundary(range.start.min(end));

        self.text.replace_range(start..end, insert);
        self.cursor = start + insert.len();
        self.folds.clear();
    }

    /// Fold the asset literal starting inside `from..to`.
    ///
    /// Returns false when no literal starts there. Folding an already
    /// folded literal is a no-op.
    pub fn fold_range(&mut self, from: usize, to: usize) -> bool {
        let hit = self
            .asset_literals()
            .into_iter()
            .find(|lit| lit.range.start >= from && lit.range.start < to.max(from + 1));

        match hit {
            Some(lit) => {
                self.folds.insert(lit.range.start);
                true
            }
            None => false,
        }
    }

    pub fn fold_count(&self) -> usize {
        self.folds.len()
    }

    /// All asset literals in source order
    pub fn asset_literals(&self) -> Vec<AssetLiteral> {
        scan_asset_literals(&self.text)
    }

    /// Literal covering a byte offset
    pub fn literal_at(&self, offset: usize) -> Option<AssetLiteral> {
        self.asset_literals()
            .into_iter()
            .find(|lit| lit.range.contains(&offset))
    }

    /// Title from the `@title:` header, or `DRAFT`
    pub fn title(&self) -> &str {
        title_of(&self.text)
    }

    pub fn move_cursor(&mut self, movement: CursorMove) {
        let line_start = self.text[..self.cursor].rfind('\n').map_or(0, |i| i + 1);
        let line_end = self.text[self.cursor..]
            .find('\n')
            .map_or(self.text.len(), |i| self.cursor + i);
        let column = self.text[line_start..self.cursor].chars().count();

        self.cursor = match movement {
            CursorMove::Left => self.text[..self.cursor]
                .char_indices()
                .next_back()
                .map_or(0, |(i, _)| i),
            CursorMove::Right => self.text[self.cursor..]
                .chars()
                .next()
                .map_or(self.cursor, |c| self.cursor + c.len_utf8()),
            CursorMove::LineStart => line_start,
            CursorMove::LineEnd => line_end,
            CursorMove::Up => {
                if line_start == 0 {
                    0
                } else {
                    let prev_start = self.text[..line_start - 1].rfind('\n').map_or(0, |i| i + 1);
                    self.offset_in_line(prev_start, column)
                }
            }
            CursorMove::Down => {
                if line_end >= self.text.len() {
                    self.text.len()
                } else {
                    self.offset_in_line(line_end + 1, column)
                }
            }
        };
    }

    /// Lines for the code pane, folded literals collapsed to one line
    pub fn display(&self) -> DisplayView {
        let mut folded = self
            .asset_literals()
            .into_iter()
            .filter(|lit| self.folds.contains(&lit.range.start))
            // A literal holding the cursor is shown unfolded
            .filter(|lit| !(lit.range.start < self.cursor && self.cursor < lit.range.end))
            .peekable();

        let mut view = DisplayView::default();
        let mut current = DisplayLine::default();
        let mut pos = 0;

        while pos < self.text.len() {
            if pos == self.cursor {
                view.cursor = Some((view.lines.len(), current.text.chars().count()));
            }

            if let Some(lit) = folded.next_if(|lit| lit.range.start == pos) {
                current.text.push_str(&lit.tag);
                current.text.push_str("`…`");
                pos = lit.range.end;
                current.folded = Some(lit);
                continue;
            }

            let Some(ch) = self.text[pos..].chars().next() else {
                break;
            };
            if ch == '\n' {
                let next = DisplayLine {
                    start: pos + 1,
                    ..Default::default()
                };
                view.lines.push(std::mem::replace(&mut current, next));
            } else {
                current.text.push(ch);
            }
            pos += ch.len_utf8();
        }

        if self.cursor >= self.text.len() {
            view.cursor = Some((view.lines.len(), current.text.chars().count()));
        }
        view.lines.push(current);
        view
    }

    fn offset_in_line(&self, line_start: usize, column: usize) -> usize {
        let line = &self.text[line_start..];
        let line = line.split('\n').next().unwrap_or("");
        line.char_indices()
            .nth(column)
            .map_or(line_start + line.len(), |(i, _)| line_start + i)
    }

    fn floor_boundary(&self, mut index: usize) -> usize {
        while index > 0 && !self.text.is_char_boundary(index) {
            index -= 1;
        }
        index
    }
}

/// Find every asset literal in `text`
pub fn scan_asset_literals(text: &str) -> Vec<AssetLiteral> {
    asset_pattern()
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let tag = caps.get(1)?;
            Some(AssetLiteral {
                tag: tag.as_str().to_string(),
                range: whole.start()..whole.end(),
                body: tag.end() + 1..whole.end() - 1,
            })
        })
        .collect()
}

/// Title declared in a game header, or `DRAFT`
pub fn title_of(text: &str) -> &str {
    title_pattern()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map_or(DRAFT_TITLE, |m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "const a = bitmap`\n..\n..`;\nconst m = map`\np.`;\n";

    #[test]
    fn test_scan_finds_each_literal() {
        let lits = scan_asset_literals(SAMPLE);
        assert_eq!(lits.len(), 2);
        assert_eq!(lits[0].tag, "bitmap");
        assert_eq!(lits[0].range.start, 10);
        assert_eq!(&SAMPLE[lits[0].body.clone()], "\n..\n..");
        assert_eq!(lits[1].tag, "map");
        assert_eq!(&SAMPLE[lits[1].body.clone()], "\np.");
    }

    #[test]
    fn test_scan_is_non_greedy() {
        let lits = scan_asset_literals("tune`a` + tune`b`");
        assert_eq!(lits.len(), 2);
        assert_eq!(lits[1].range, 10..17);
    }

    #[test]
    fn test_title() {
        assert_eq!(title_of("/*\n@title: maze\n*/"), "maze");
        assert_eq!(title_of("let x = 1;"), DRAFT_TITLE);
    }

    #[test]
    fn test_replace_clears_and_loads() {
        let mut buf = EditorBuffer::new("hello");
        let len = buf.len();
        buf.replace(0..len, "");
        assert!(buf.is_empty());
        buf.replace(0..0, "world");
        assert_eq!(buf.text(), "world");
        assert_eq!(buf.cursor(), 5);
    }

    #[test]
    fn test_replace_clamps_out_of_range() {
        let mut buf = EditorBuffer::new("é");
        buf.replace(1..40, "x");
        assert_eq!(buf.text(), "x");
    }

    #[test]
    fn test_fold_is_idempotent() {
        let mut buf = EditorBuffer::new(SAMPLE);
        assert!(buf.fold_range(10, 11));
        assert!(buf.fold_range(10, 11));
        assert_eq!(buf.fold_count(), 1);
        assert!(!buf.fold_range(0, 1));
    }

    #[test]
    fn test_display_collapses_folds() {
        let mut buf = EditorBuffer::new(SAMPLE);
        buf.fold_range(10, 11);
        let view = buf.display();
        assert_eq!(view.lines[0].text, "const a = bitmap`…`;");
        assert!(view.lines[0].folded.is_some());
        assert_eq!(view.lines[1].text, "const m = map`");
    }

    #[test]
    fn test_fold_holding_cursor_stays_open() {
        let mut buf = EditorBuffer::new(SAMPLE);
        buf.fold_range(10, 11);
        buf.move_cursor(CursorMove::Down);
        assert_eq!(buf.cursor(), 18);

        let view = buf.display();
        assert_eq!(view.lines[0].text, "const a = bitmap`");
        assert!(view.lines[0].folded.is_none());
        assert_eq!(view.cursor, Some((1, 0)));
        assert_eq!(buf.fold_count(), 1);
    }

    #[test]
    fn test_cursor_moves() {
        let mut buf = EditorBuffer::new("ab\ncd");
        buf.move_cursor(CursorMove::Right);
        buf.move_cursor(CursorMove::Down);
        assert_eq!(buf.cursor(), 4);
        buf.move_cursor(CursorMove::LineStart);
        assert_eq!(buf.cursor(), 3);
        buf.move_cursor(CursorMove::Up);
        assert_eq!(buf.cursor(), 0);
        buf.move_cursor(CursorMove::Left);
        assert_eq!(buf.cursor(), 0);
    }
}

use std::fmt;

/// `TextRange` byte range in source text
/// Invariant: `start <= end`
#[derive(Copy, Clone, PartialEq)]
pub struct TextRange {
    start: TextOffset,
    end: TextOffset,
}

/// `TextOffset` byte offset in source text
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TextOffset(u32);

/// `TextLocation`
/// `line` 1 based line number
/// `col`  1 based utf8 char number
#[derive(Copy, Clone, PartialEq)]
pub struct TextLocation {
    line: u32,
    col: u32,
}

impl TextRange {
    #[inline]
    pub const fn new(start: TextOffset, end: TextOffset) -> TextRange {
        assert!(start.0 <= end.0);
        TextRange { start, end }
    }
    #[inline]
    pub const fn zero() -> TextRange {
        TextRange { start: TextOffset(0), end: TextOffset(0) }
    }
    #[inline]
    pub const fn empty_at(offset: TextOffset) -> TextRange {
        TextRange { start: offset, end: offset }
    }
    #[inline]
    pub const fn start(self) -> TextOffset {
        self.start
    }
    #[inline]
    pub const fn end(self) -> TextOffset {
        self.end
    }
    #[inline]
    pub const fn len(self) -> u32 {
        self.end.0 - self.start.0
    }
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }
    #[inline]
    pub fn as_usize(self) -> std::ops::Range<usize> {
        self.start.into()..self.end.into()
    }
    #[inline]
    pub fn extend_by(&mut self, by: TextOffset) {
        self.end += by;
    }
    #[inline]
    const fn contains_exclusive(self, offset: TextOffset) -> bool {
        offset.0 >= self.start.0 && offset.0 < self.end.0
    }
    #[inline]
    const fn contains_inclusive(self, offset: TextOffset) -> bool {
        offset.0 >= self.start.0 && offset.0 <= self.end.0
    }
}

impl TextLocation {
    #[inline]
    const fn new(line: u32, col: u32) -> TextLocation {
        TextLocation { line, col }
    }
    #[inline]
    pub const fn line(&self) -> u32 {
        self.line
    }
    #[inline]
    pub const fn line_index(&self) -> usize {
        (self.line - 1) as usize
    }
    #[inline]
    pub const fn col(&self) -> u32 {
        self.col
    }
}

impl From<u32> for TextOffset {
    #[inline]
    fn from(value: u32) -> TextOffset {
        TextOffset(value)
    }
}

impl From<TextOffset> for u32 {
    #[inline]
    fn from(value: TextOffset) -> u32 {
        value.0
    }
}

impl From<TextOffset> for usize {
    #[inline]
    fn from(value: TextOffset) -> usize {
        value.0 as usize
    }
}

impl std::ops::Add for TextOffset {
    type Output = TextOffset;
    #[inline]
    fn add(self, rhs: TextOffset) -> TextOffset {
        (self.0 + rhs.0).into()
    }
}

impl std::ops::AddAssign for TextOffset {
    #[inline]
    fn add_assign(&mut self, rhs: TextOffset) {
        self.0 = self.0 + rhs.0;
    }
}

impl fmt::Debug for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start.0, self.end.0)
    }
}

impl fmt::Debug for TextOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for TextLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

/// Byte ranges of each source line, `\n` included.
/// The line count statistic is the length of this Vec.
pub fn find_line_ranges(text: &str) -> Vec<TextRange> {
    let mut ranges = Vec::new();
    let mut range = TextRange::zero();

    for c in text.chars() {
        let size: TextOffset = (c.len_utf8() as u32).into();
        range.extend_by(size);

        if c == '\n' {
            ranges.push(range);
            range = TextRange::empty_at(range.end());
        }
    }
    if !range.is_empty() {
        ranges.push(range);
    }

    ranges
}

/// Binary search over `line_ranges` for the 1-based line:col of `offset`.
/// An out of bounds offset maps to the end of the last line, never panics.
pub fn find_text_location(
    text: &str,
    offset: TextOffset,
    line_ranges: &[TextRange],
) -> TextLocation {
    let mut size = line_ranges.len();
    let mut left = 0_usize;
    let mut right = size;

    while left < right {
        let mid = left + size / 2;
        let range = line_ranges[mid];

        let contains = if mid + 1 == line_ranges.len() {
            range.contains_inclusive(offset)
        } else {
            range.contains_exclusive(offset)
        };

        if contains {
            let prefix_range = TextRange::new(range.start(), offset);
            let prefix = &text[prefix_range.as_usize()];
            return TextLocation::new(mid as u32 + 1, prefix.chars().count() as u32 + 1);
        } else if offset < range.start() {
            right = mid;
        } else {
            left = mid + 1;
        }

        size = right - left;
    }

    match line_ranges.last() {
        Some(last) => TextLocation::new(line_ranges.len() as u32, last.len() + 1),
        None => TextLocation::new(1, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_ranges_and_locations() {
        let text = "MODULE M;\nEND M.\n";
        let line_ranges = find_line_ranges(text);
        assert_eq!(line_ranges.len(), 2);
        assert_eq!(line_ranges[0], TextRange::new(0.into(), 10.into()));
        assert_eq!(line_ranges[1], TextRange::new(10.into(), 17.into()));

        let module_kw = find_text_location(text, 0.into(), &line_ranges);
        assert_eq!(module_kw, TextLocation::new(1, 1));
        let end_kw = find_text_location(text, 10.into(), &line_ranges);
        assert_eq!(end_kw, TextLocation::new(2, 1));
        let dot = find_text_location(text, 15.into(), &line_ranges);
        assert_eq!(dot, TextLocation::new(2, 6));
    }

    #[test]
    fn missing_final_newline() {
        let text = "END M.";
        let line_ranges = find_line_ranges(text);
        assert_eq!(line_ranges.len(), 1);
        assert_eq!(line_ranges[0], TextRange::new(0.into(), 6.into()));
    }
}

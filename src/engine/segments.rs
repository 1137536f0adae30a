// WHY: the working text is a flat sequence of tagged segments over one normalized buffer
// Plain segments are byte ranges into that buffer; only Replaced segments own their text

use std::ops::Range;

use crate::error::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SegmentKind {
    /// Untouched source text, still eligible for matching
    #[default]
    Plain,
    /// Output of a replacement, immune to further matching
    Replaced,
}

/// Contiguous span of the working text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Segment {
    kind: SegmentKind,
    /// Byte range of the normalized source this segment stands for
    source: Range<usize>,
    /// Text of a Replaced segment; always empty for Plain
    replacement: String,
}

impl Segment {
    pub fn plain(source: Range<usize>) -> Self {
        Self {
            kind: SegmentKind::Plain,
            source,
            replacement: String::new(),
        }
    }

    pub fn replaced(replacement: impl Into<String>, source: Range<usize>) -> Self {
        Self {
            kind: SegmentKind::Replaced,
            source,
            replacement: replacement.into(),
        }
    }

    pub fn kind(&self) -> SegmentKind {
        self.kind
    }

    pub fn is_plain(&self) -> bool {
        self.kind == SegmentKind::Plain
    }

    pub fn is_replaced(&self) -> bool {
        self.kind == SegmentKind::Replaced
    }

    /// Current text of this segment, resolved against the normalized `source`
    pub fn text<'a>(&'a self, source: &'a str) -> &'a str {
        match self.kind {
            SegmentKind::Plain => &source[self.source.clone()],
            SegmentKind::Replaced => &self.replacement,
        }
    }

    pub fn source(&self) -> Range<usize> {
        self.source.clone()
    }
}

/// First character across `pieces`, skipping empty ones
pub fn first_char<'a>(pieces: impl IntoIterator<Item = &'a str>) -> Option<char> {
    pieces.into_iter().find_map(|piece| piece.chars().next())
}

/// Last character across `pieces` given in reverse order, skipping empty ones
pub fn last_char<'a>(pieces: impl IntoIterator<Item = &'a str>) -> Option<char> {
    pieces.into_iter().find_map(|piece| piece.chars().next_back())
}

/// Tail of the text formed by `pieces`, which are given nearest first
///
/// Returns the trailing whitespace run plus up to `context_chars` characters before it,
/// which is all the capitalization policy inspects.
pub fn tail_context<'a>(pieces: impl IntoIterator<Item = &'a str>, context_chars: usize) -> String {
    let mut collected: Vec<char> = Vec::new();
    let mut taken = 0;
    let mut in_whitespace = true;

    'outer: for piece in pieces {
        for ch in piece.chars().rev() {
            if in_whitespace && ch.is_whitespace() {
                collected.push(ch);
                continue;
            }
            in_whitespace = false;
            if taken == context_chars {
                break 'outer;
            }
            collected.push(ch);
            taken += 1;
        }
    }

    collected.iter().rev().collect()
}

/// Ordered segment sequence produced by a replace run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotatedText {
    source: String,
    segments: Vec<Segment>,
}

impl AnnotatedText {
    /// Start from a single Plain segment covering the whole normalized source
    pub fn new(normalized: impl Into<String>) -> Self {
        let source = normalized.into();
        let segments = if source.is_empty() {
            Vec::new()
        } else {
            vec![Segment::plain(0..source.len())]
        };
        Self { source, segments }
    }

    /// The normalized text every Plain segment points into
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Segment kinds paired with their current text, in order
    pub fn pieces(&self) -> impl Iterator<Item = (SegmentKind, &str)> {
        self.segments
            .iter()
            .map(|segment| (segment.kind, segment.text(&self.source)))
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn replaced_count(&self) -> usize {
        self.segments.iter().filter(|s| s.is_replaced()).count()
    }

    /// Plain-text projection: all segment texts concatenated in order
    pub fn plain_text(&self) -> String {
        let mut out = String::with_capacity(self.source.len());
        for (_, text) in self.pieces() {
            out.push_str(text);
        }
        out
    }

    /// Move the segment list out, leaving it empty until `set_segments`
    pub(crate) fn take_segments(&mut self) -> Vec<Segment> {
        std::mem::take(&mut self.segments)
    }

    pub(crate) fn set_segments(&mut self, segments: Vec<Segment>) {
        self.segments = segments;
    }

    /// Replace `range` (relative to the segment) of Plain segment `index` with a Replaced segment
    /// Empty prefix or suffix pieces are not kept
    pub fn splice_replacement(
        &mut self,
        index: usize,
        range: Range<usize>,
        replacement: String,
    ) -> Result<(), Error> {
        let segment = self.segments.get(index).ok_or_else(|| {
            Error::InvariantViolation(format!("segment {index} out of bounds ({} segments)", self.segments.len()))
        })?;
        if !segment.is_plain() {
            return Err(Error::InvariantViolation(format!(
                "attempted to rewrite replaced segment {index}"
            )));
        }
        let text = segment.text(&self.source);
        if range.start >= range.end
            || range.end > text.len()
            || !text.is_char_boundary(range.start)
            || !text.is_char_boundary(range.end)
        {
            return Err(Error::InvariantViolation(format!(
                "invalid match range {}..{} in segment of {} bytes",
                range.start,
                range.end,
                text.len()
            )));
        }

        let Range { start: base, end } = segment.source.clone();
        let (cut_start, cut_end) = (base + range.start, base + range.end);
        let mut pieces = Vec::with_capacity(3);
        if cut_start > base {
            pieces.push(Segment::plain(base..cut_start));
        }
        pieces.push(Segment::replaced(replacement, cut_start..cut_end));
        if cut_end < end {
            pieces.push(Segment::plain(cut_end..end));
        }

        self.segments.splice(index..index + 1, pieces);
        Ok(())
    }

    /// Check that segments tile the normalized source exactly once, in order
    pub fn verify(&self, normalized_source: &str) -> Result<(), Error> {
        if self.source != normalized_source {
            return Err(Error::InvariantViolation(
                "working buffer diverged from the normalized source".to_string(),
            ));
        }
        let mut cursor = 0;
        for (index, segment) in self.segments.iter().enumerate() {
            if segment.source.start != cursor {
                return Err(Error::InvariantViolation(format!(
                    "segment {index} starts at {} but previous ended at {cursor}",
                    segment.source.start
                )));
            }
            if segment.source.end <= segment.source.start {
                return Err(Error::InvariantViolation(format!("segment {index} covers no source")));
            }
            if self.source.get(segment.source.clone()).is_none() {
                return Err(Error::InvariantViolation(format!("segment {index} span outside source")));
            }
            cursor = segment.source.end;
        }
        if cursor != self.source.len() {
            return Err(Error::InvariantViolation(format!(
                "segments cover {cursor} of {} source bytes",
                self.source.len()
            )));
        }
        Ok(())
    }
}

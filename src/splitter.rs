// WHY: greedy single-pass packing of paragraphs into N parts by word count
// An optional chapter heading on the first line is cloned into every part as "<n>.<part>"

use regex_automata::meta::Regex;
use tracing::debug;

use crate::engine::matcher::escape_literal;
use crate::error::Error;

/// Configuration for document splitting
#[derive(Debug, Clone)]
pub struct SplitConfig {
    /// Number of parts to produce
    pub part_count: usize,
    /// Words that introduce a chapter heading when followed by a number
    pub heading_keywords: Vec<String>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            part_count: 2,
            heading_keywords: vec!["Chương".to_string(), "Chapter".to_string()],
        }
    }
}

impl SplitConfig {
    pub fn with_parts(part_count: usize) -> Self {
        Self {
            part_count,
            ..Self::default()
        }
    }
}

/// One output part with its word count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPart {
    pub text: String,
    pub word_count: usize,
}

/// Parts in order; always exactly `part_count` entries, trailing ones possibly empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitResult {
    pub chapter_header: Option<String>,
    pub parts: Vec<SplitPart>,
}

impl SplitResult {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|part| part.text.as_str())
    }
}

/// Whitespace-delimited word count
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Detected chapter heading and where its number ends
#[derive(Debug, Clone)]
struct ChapterHeading<'a> {
    line: &'a str,
    number_end: usize,
}

impl ChapterHeading<'_> {
    /// Heading with its number suffixed by `.part_index`
    fn for_part(&self, part_index: usize) -> String {
        format!(
            "{}.{}{}",
            &self.line[..self.number_end],
            part_index,
            &self.line[self.number_end..]
        )
    }
}

pub struct Splitter {
    config: SplitConfig,
    heading: Option<Regex>,
}

impl Splitter {
    pub fn new(config: SplitConfig) -> Result<Self, Error> {
        if config.part_count == 0 {
            return Err(Error::InvalidPartCount(0));
        }

        let keywords: Vec<String> = config
            .heading_keywords
            .iter()
            .filter(|k| !k.is_empty())
            .map(|k| escape_literal(k))
            .collect();
        let heading = if keywords.is_empty() {
            None
        } else {
            let pattern = format!(r"^(?:{})\s+([0-9]+)", keywords.join("|"));
            Some(Regex::new(&pattern).map_err(|e| Error::InvalidHeadingPattern(e.to_string()))?)
        };

        Ok(Self { config, heading })
    }

    pub fn with_parts(part_count: usize) -> Result<Self, Error> {
        Self::new(SplitConfig::with_parts(part_count))
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    fn detect_heading<'a>(&self, line: &'a str) -> Option<ChapterHeading<'a>> {
        let regex = self.heading.as_ref()?;
        let mut caps = regex.create_captures();
        regex.captures(line, &mut caps);
        let number = caps.get_group(1)?;
        Some(ChapterHeading {
            line,
            number_end: number.end,
        })
    }

    /// Split `text` into the configured number of parts
    pub fn split(&self, text: &str) -> Result<SplitResult, Error> {
        if text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }

        let part_count = self.config.part_count;
        let lines: Vec<&str> = text.lines().collect();
        let heading = lines.first().and_then(|first| self.detect_heading(first.trim()));
        let body = if heading.is_some() { &lines[1..] } else { &lines[..] };

        let paragraphs: Vec<&str> = body
            .iter()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .collect();
        let total_words: usize = paragraphs.iter().map(|p| count_words(p)).sum();
        let target = total_words.div_ceil(part_count);

        let mut groups: Vec<Vec<&str>> = Vec::with_capacity(part_count);
        let mut current: Vec<&str> = Vec::new();
        let mut current_words = 0;

        for paragraph in paragraphs {
            let words = count_words(paragraph);
            if !current.is_empty()
                && current_words + words > target
                && groups.len() < part_count - 1
            {
                groups.push(std::mem::take(&mut current));
                current_words = 0;
            }
            current.push(paragraph);
            current_words += words;
        }
        if !current.is_empty() {
            groups.push(current);
        }

        let parts: Vec<SplitPart> = (0..part_count)
            .map(|index| {
                let text = match groups.get(index) {
                    Some(group) => {
                        let body = group.join("\n\n");
                        match &heading {
                            Some(h) => format!("{}\n\n{}", h.for_part(index + 1), body),
                            None => body,
                        }
                    }
                    None => String::new(),
                };
                SplitPart {
                    word_count: count_words(&text),
                    text,
                }
            })
            .collect();

        debug!(
            parts = part_count,
            filled = groups.len(),
            total_words,
            target,
            "Split document"
        );

        Ok(SplitResult {
            chapter_header: heading.map(|h| h.line.to_string()),
            parts,
        })
    }
}

/// Split `text` into `part_count` parts with the default heading keywords
pub fn split(text: &str, part_count: usize) -> Result<SplitResult, Error> {
    Splitter::with_parts(part_count)?.split(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize, prefix: &str) -> String {
        (0..n).map(|i| format!("{prefix}{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   \n\t "), 0);
        assert_eq!(count_words(" one  two\nthree "), 3);
    }

    #[test]
    fn test_balanced_paragraphs() {
        let text = format!("{}\n{}\n{}\n{}", words(10, "a"), words(10, "b"), words(10, "c"), words(10, "d"));
        let result = split(&text, 2).unwrap();
        assert_eq!(result.parts.len(), 2);
        assert_eq!(result.parts[0].word_count, 20);
        assert_eq!(result.parts[1].word_count, 20);
        assert!(result.parts[0].text.starts_with("a0"));
        assert!(result.parts[1].text.starts_with("c0"));
        assert!(result.chapter_header.is_none());
    }

    #[test]
    fn test_paragraphs_joined_by_blank_line() {
        let result = split("one\n\n\ntwo\nthree", 1).unwrap();
        assert_eq!(result.parts[0].text, "one\n\ntwo\n\nthree");
    }

    #[test]
    fn test_final_part_absorbs_remainder() {
        let text = format!("{}\n{}\n{}", words(5, "a"), words(5, "b"), words(50, "c"));
        let result = split(&text, 2).unwrap();
        // target is 30: a+b fit, c would overflow and opens part two
        assert_eq!(result.parts[0].word_count, 10);
        assert_eq!(result.parts[1].word_count, 50);

        let result = split(&text, 3).unwrap();
        assert_eq!(result.parts.iter().map(|p| p.word_count).collect::<Vec<_>>(), vec![10, 50, 0]);
        assert_eq!(result.parts[2].text, "");
    }

    #[test]
    fn test_chapter_header_cloned_per_part() {
        let text = format!("Chapter 12: The Storm\n{}\n{}", words(4, "a"), words(4, "b"));
        let result = split(&text, 2).unwrap();
        assert_eq!(result.chapter_header.as_deref(), Some("Chapter 12: The Storm"));
        assert!(result.parts[0].text.starts_with("Chapter 12.1: The Storm\n\na0"));
        assert!(result.parts[1].text.starts_with("Chapter 12.2: The Storm\n\nb0"));
    }

    #[test]
    fn test_vietnamese_heading_keyword() {
        let text = "  Chương 7  \nmột hai ba\nbốn năm sáu";
        let result = split(text, 2).unwrap();
        assert_eq!(result.chapter_header.as_deref(), Some("Chương 7"));
        assert_eq!(result.parts[0].text, "Chương 7.1\n\nmột hai ba");
        assert_eq!(result.parts[1].text, "Chương 7.2\n\nbốn năm sáu");
    }

    #[test]
    fn test_heading_requires_number() {
        let result = split("Chapter One\nbody text", 1).unwrap();
        assert!(result.chapter_header.is_none());
        assert_eq!(result.parts[0].text, "Chapter One\n\nbody text");
    }

    #[test]
    fn test_empty_parts_have_no_header() {
        let result = split("Chapter 3\nonly paragraph", 3).unwrap();
        assert_eq!(result.parts[0].text, "Chapter 3.1\n\nonly paragraph");
        assert_eq!(result.parts[1].text, "");
        assert_eq!(result.parts[2].word_count, 0);
    }

    #[test]
    fn test_blank_input_rejected() {
        assert_eq!(split("  \n ", 2).unwrap_err(), Error::EmptyInput);
    }

    #[test]
    fn test_zero_parts_rejected() {
        assert_eq!(split("text", 0).unwrap_err(), Error::InvalidPartCount(0));
    }

    #[test]
    fn test_custom_keywords() {
        let config = SplitConfig {
            part_count: 1,
            heading_keywords: vec!["Part".to_string()],
        };
        let splitter = Splitter::new(config).unwrap();
        let result = splitter.split("Part 2\nbody").unwrap();
        assert_eq!(result.parts[0].text, "Part 2.1\n\nbody");

        let result = splitter.split("Chapter 2\nbody").unwrap();
        assert!(result.chapter_header.is_none());
    }
}

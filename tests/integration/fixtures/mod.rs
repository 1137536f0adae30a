// Test fixtures with known prose inputs and expected outputs
// WHY: Golden-text testing requires deterministic input/output pairs for validation

#![allow(dead_code)]

/// Dialogue with curly quotes, sentence starts and a line break
pub const DIALOGUE_TEXT: &str = "\u{201C}Where is he?\u{201D} she asked. he was gone.
he had left the house. The cat knew. THE CAT ALWAYS KNEW.";

/// Expected plain output for DIALOGUE_TEXT with DIALOGUE_RULES (match case off, whole word on)
pub const DIALOGUE_EXPECTED: &str = "\"Where is she?\" she asked. She was gone.
She had left the house. The fox knew. THE FOX ALWAYS KNEW.";

/// Vietnamese prose exercising Unicode word boundaries and case folding
pub const VIETNAMESE_TEXT: &str = "Anh ấy nói: \u{201C}Em đi đâu?\u{201D} EM không trả lời. Em đang khóc.";

/// Expected output replacing "em" with "cô ấy" (match case off, whole word on)
pub const VIETNAMESE_EXPECTED: &str = "Anh ấy nói: \"Cô ấy đi đâu?\" CÔ ẤY không trả lời. Cô ấy đang khóc.";

/// Chapter with six short paragraphs, 30 words in total
pub const CHAPTER_TEXT: &str = "Chapter 4
One two three four five.
Six seven eight nine ten.

Eleven twelve thirteen fourteen fifteen.
Sixteen seventeen eighteen nineteen twenty.


Twenty-one twenty-two twenty-three twenty-four twenty-five.
Twenty-six twenty-seven twenty-eight twenty-nine thirty.";

/// Expected first part of CHAPTER_TEXT split in three
pub const CHAPTER_PART_ONE: &str = "Chapter 4.1

One two three four five.

Six seven eight nine ten.";

/// Expected CSV export for the two-mode settings used in CSV tests
pub const EXPORTED_CSV: &str = "\u{FEFF}find,replace,mode
\"\"\"\",\"'\",\"default\"
\"colour\",\"color\",\"default\"
\"he said \"\"no\"\"\",\"she said, \"\"yes\"\"\",\"fiction\"
";

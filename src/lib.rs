pub mod engine;
pub mod error;
pub mod interchange;
pub mod normalize;
pub mod ops;
pub mod render;
pub mod rules;
pub mod settings;
pub mod splitter;

// Re-export main types for convenient access
pub use engine::{apply, AnnotatedText, ReplaceEngine, ReplaceReport, Segment, SegmentKind};
pub use error::{Error, ErrorKind};
pub use normalize::normalize;
pub use rules::{Rule, RuleSet};

// Re-export the invocation surface
pub use ops::{replace, split, ReplaceOutput, Session};
pub use render::{render, Rendered};
pub use settings::{Settings, SettingsStore, DEFAULT_MODE};
pub use splitter::{count_words, SplitConfig, SplitResult, Splitter};

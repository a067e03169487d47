//! Line Classifier
//!
//! Turns the fragments collected for one line into line-level statistics and
//! a render-ready list of segments. Partial versus full is a property of the
//! line: every hit fragment of a line with at least one miss renders as
//! [`RenderClass::Partial`].

use super::fragment::{is_trivial_code, Fragment, RenderClass};
use std::fmt;

/// Line-level coverage statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineClassification {
    /// 1-based line number
    pub line_number: u32,
    /// At least one non-trivial code fragment
    pub executable: bool,
    /// At least one non-trivial code fragment ran
    pub hit: bool,
    /// Highest count over all fragments of the line
    pub max_count: u64,
    /// Number of non-trivial code fragments
    pub candidate_count: u32,
    /// Number of non-trivial code fragments that ran
    pub hit_candidate_count: u32,
    /// A region starting on this line ran
    pub has_partial_region_entry: bool,
}

impl LineClassification {
    /// Compute the statistics of one line
    #[must_use]
    pub fn from_fragments(line_number: u32, fragments: &[Fragment]) -> Self {
        let mut stats = Self {
            line_number,
            ..Self::default()
        };
        for fragment in fragments {
            if fragment.is_candidate() {
                stats.candidate_count += 1;
                if fragment.count > 0 {
                    stats.hit_candidate_count += 1;
                }
            }
            if fragment.region_entry && fragment.count > 0 && !is_trivial_code(&fragment.text) {
                stats.has_partial_region_entry = true;
            }
            stats.max_count = stats.max_count.max(fragment.count);
        }
        stats.executable = stats.candidate_count > 0;
        stats.hit = stats.hit_candidate_count > 0;
        stats
    }

    /// Executable and every candidate ran
    #[must_use]
    pub fn is_fully_covered(&self) -> bool {
        self.executable && self.hit_candidate_count == self.candidate_count
    }

    /// Render class of `fragment` on this line
    #[must_use]
    pub fn render_class(&self, fragment: &Fragment) -> RenderClass {
        if !fragment.is_candidate() {
            RenderClass::None
        } else if fragment.count == 0 {
            RenderClass::Miss
        } else if self.is_fully_covered() {
            RenderClass::Full
        } else {
            RenderClass::Partial
        }
    }

    /// Gutter shown left of the line
    #[must_use]
    pub fn gutter(&self) -> Gutter {
        if !self.executable {
            Gutter::Blank
        } else if self.is_fully_covered() {
            Gutter::Count(self.max_count)
        } else if self.has_partial_region_entry {
            Gutter::Partial {
                hit: self.hit_candidate_count,
                total: self.candidate_count,
            }
        } else {
            Gutter::Uncovered {
                hit: self.hit_candidate_count,
                total: self.candidate_count,
            }
        }
    }
}

/// Gutter representation of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gutter {
    /// Not executable
    Blank,
    /// Fully covered, with the highest execution count
    Count(u64),
    /// Some candidates ran and a region entered on this line
    Partial {
        /// Candidates that ran
        hit: u32,
        /// All candidates
        total: u32,
    },
    /// Some candidates never ran
    Uncovered {
        /// Candidates that ran
        hit: u32,
        /// All candidates
        total: u32,
    },
}

impl fmt::Display for Gutter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Blank => Ok(()),
            Self::Count(count) => f.write_str(&abbreviate_count(count)),
            Self::Partial { hit, total } | Self::Uncovered { hit, total } => {
                write!(f, "{hit} / {total} ")
            }
        }
    }
}

/// Abbreviate an execution count: `999`, `12K`, `3M`, `7G`.
#[must_use]
pub fn abbreviate_count(count: u64) -> String {
    match count {
        0..=999 => count.to_string(),
        1_000..=999_999 => format!("{}K", count / 1_000),
        1_000_000..=999_999_999 => format!("{}M", count / 1_000_000),
        _ => format!("{}G", count / 1_000_000_000),
    }
}

/// A run of same-class text within a line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Text of the run, invalid UTF-8 replaced by U+FFFD
    pub text: String,
    /// How the run is rendered
    pub class: RenderClass,
}

/// One fully processed source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedLine {
    /// Line statistics
    pub classification: LineClassification,
    /// Adjacent same-class fragments merged into runs
    pub segments: Vec<Segment>,
}

impl AnnotatedLine {
    /// 1-based line number
    #[must_use]
    pub fn number(&self) -> u32 {
        self.classification.line_number
    }

    /// Full text of the line
    #[must_use]
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }
}

/// Classify one line and merge its fragments into render segments.
#[must_use]
pub fn classify_line(line_number: u32, fragments: &[Fragment]) -> AnnotatedLine {
    let classification = LineClassification::from_fragments(line_number, fragments);
    let mut runs: Vec<(Vec<u8>, RenderClass)> = Vec::new();
    for fragment in fragments {
        let class = classification.render_class(fragment);
        match runs.last_mut() {
            Some((bytes, last)) if *last == class => bytes.extend_from_slice(&fragment.text),
            _ => runs.push((fragment.text.clone(), class)),
        }
    }
    // decoded only now, so a character split between fragments of one run survives
    let segments = runs
        .into_iter()
        .map(|(bytes, class)| Segment {
            text: String::from_utf8_lossy(&bytes).into_owned(),
            class,
        })
        .collect();
    AnnotatedLine {
        classification,
        segments,
    }
}

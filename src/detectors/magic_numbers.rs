//! Magic Numbers Detector

use crate::detectors::base::{Detector, FileContext};
use crate::models::{Severity, Smell, SmellKind};
use regex::Regex;
use std::sync::OnceLock;

static NUMBER_PATTERN: OnceLock<Regex> = OnceLock::new();

fn get_pattern() -> &'static Regex {
    // Match digit runs (2+ digits), filter neighbours in logic
    NUMBER_PATTERN.get_or_init(|| Regex::new(r"\d{2,}").expect("magic number pattern is valid"))
}

/// Numbers common enough to need no name
static ACCEPTABLE: &[&str] = &["10", "100"];

/// Reported per file at most
const MAX_PER_FILE: usize = 10;

/// Characters of the trimmed line kept as context
const CONTEXT_CHARS: usize = 50;

fn is_word_or_dot(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

/// Integer literals of two or more digits standing on their own
fn standalone_numbers(line: &str) -> impl Iterator<Item = &str> {
    get_pattern().find_iter(line).filter_map(move |m| {
        let before = line[..m.start()].chars().next_back();
        let after = line[m.end()..].chars().next();
        let isolated = !before.is_some_and(is_word_or_dot) && !after.is_some_and(is_word_or_dot);
        isolated.then_some(m.as_str())
    })
}

pub struct MagicNumbersDetector;

impl Detector for MagicNumbersDetector {
    fn name(&self) -> &'static str {
        "magic-numbers"
    }

    fn description(&self) -> &'static str {
        "Detects unexplained numeric literals"
    }

    fn detect(&self, ctx: &FileContext) -> Vec<Smell> {
        let mut smells = Vec::new();

        for (line_num, line) in ctx.content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.starts_with('#') || line.contains("\"\"\"") || line.contains("'''") {
                continue;
            }

            for number in standalone_numbers(line) {
                if ACCEPTABLE.contains(&number) {
                    continue;
                }
                smells.push(Smell {
                    line: line_num as u32 + 1,
                    severity: Severity::Low,
                    kind: SmellKind::MagicNumber {
                        value: number.to_string(),
                        context: trimmed.chars().take(CONTEXT_CHARS).collect(),
                    },
                });
                if smells.len() >= MAX_PER_FILE {
                    return smells;
                }
            }
        }

        smells
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Thresholds;
    use crate::models::StructuralUnit;

    fn detect(content: &str) -> Vec<Smell> {
        let unit = StructuralUnit::empty("m.py");
        let thresholds = Thresholds::default();
        MagicNumbersDetector.detect(&FileContext::new(&unit, content, &thresholds))
    }

    fn values(smells: &[Smell]) -> Vec<String> {
        smells
            .iter()
            .filter_map(|s| match &s.kind {
                SmellKind::MagicNumber { value, .. } => Some(value.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_standalone_numbers() {
        let found: Vec<&str> = standalone_numbers("x = 42 + y2 + 3.14 + 99 + abc123 + 1_000").collect();
        assert_eq!(found, vec!["42", "99"]);
    }

    #[test]
    fn test_skips_comments_docstrings_and_common_values() {
        let content = "# timeout 30\nretries = 3\nlimit = 10\nscale = 100\n\"\"\"port 8080\"\"\"\ndelay = 250\n";
        let smells = detect(content);
        assert_eq!(values(&smells), vec!["250"]);
        assert_eq!(smells[0].line, 6);
        assert_eq!(
            smells[0].kind,
            SmellKind::MagicNumber { value: "250".into(), context: "delay = 250".into() }
        );
    }

    #[test]
    fn test_context_is_truncated() {
        let line = format!("value = 42  # {}", "x".repeat(80));
        let smells = detect(&line);
        match &smells[0].kind {
            SmellKind::MagicNumber { context, .. } => assert_eq!(context.chars().count(), 50),
            other => panic!("unexpected smell {other:?}"),
        }
    }

    #[test]
    fn test_capped_per_file() {
        let content: String = (20..40).map(|n| format!("v{n} = {n}\n")).collect();
        assert_eq!(detect(&content).len(), 10);
    }
}

use anyhow::{Context, Result};
use regex::Regex;

/// Category of a single input line. Texts borrow the trimmed line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    ArticleHeader { number: u64, title: &'a str },
    Rule(&'a str),
    Lettered(&'a str),
    Roman(&'a str),
    Unrecognized(&'a str),
}

impl LineKind<'_> {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Blank => "blank",
            Self::ArticleHeader { .. } => "article_header",
            Self::Rule(_) => "rule",
            Self::Lettered(_) => "lettered",
            Self::Roman(_) => "roman",
            Self::Unrecognized(_) => "unrecognized",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LineClassifier {
    article_header: Regex,
    decimal_digit: Regex,
    bullet_rule: Regex,
    numbered_rule: Regex,
    lettered_rule: Regex,
    roman_rule: Regex,
}

impl LineClassifier {
    pub fn new() -> Result<Self> {
        Ok(Self {
            article_header: Regex::new(r"^Article\s+(\d+)[\s:\-]*(.*)$")
                .context("failed to compile article header regex")?,
            decimal_digit: Regex::new(r"^\d$").context("failed to compile decimal digit regex")?,
            bullet_rule: Regex::new(r"^[-•]\s+\S")
                .context("failed to compile bullet rule regex")?,
            numbered_rule: Regex::new(r"^\d+\.\s+\S")
                .context("failed to compile numbered rule regex")?,
            lettered_rule: Regex::new(r"^[a-z]\)\s+\S")
                .context("failed to compile lettered rule regex")?,
            roman_rule: Regex::new(r"^[ivxlcdm]+\.\s+\S")
                .context("failed to compile roman rule regex")?,
        })
    }

    /// Classifies one raw line. Patterns are tried in a fixed order and the
    /// first match wins.
    pub fn classify<'a>(&self, raw_line: &'a str) -> LineKind<'a> {
        let line = raw_line.trim();
        if line.is_empty() {
            return LineKind::Blank;
        }

        if let Some((number, title)) = self.article_header(line) {
            return LineKind::ArticleHeader { number, title };
        }

        if self.bullet_rule.is_match(line) || self.numbered_rule.is_match(line) {
            return LineKind::Rule(line);
        }

        if self.lettered_rule.is_match(line) {
            return LineKind::Lettered(line);
        }

        if self.roman_rule.is_match(line) {
            return LineKind::Roman(line);
        }

        LineKind::Unrecognized(line)
    }

    fn article_header<'a>(&self, line: &'a str) -> Option<(u64, &'a str)> {
        let captures = self.article_header.captures(line)?;
        let number = self.decimal_value(captures.get(1)?.as_str());
        let title = captures
            .get(2)
            .map(|value| value.as_str().trim())
            .unwrap_or_default();
        Some((number, title))
    }

    /// Value of a run of decimal digits in any script, saturating at `u64::MAX`.
    fn decimal_value(&self, digits: &str) -> u64 {
        digits.chars().fold(0u64, |value, digit| {
            value
                .saturating_mul(10)
                .saturating_add(u64::from(self.digit_value(digit)))
        })
    }

    fn digit_value(&self, digit: char) -> u32 {
        if let Some(value) = digit.to_digit(10) {
            return value;
        }

        // Unicode assigns decimal digits in contiguous runs of ten starting at zero.
        let mut run_start = u32::from(digit);
        let mut buf = [0u8; 4];
        while let Some(previous) = run_start.checked_sub(1).and_then(char::from_u32) {
            if !self.decimal_digit.is_match(previous.encode_utf8(&mut buf)) {
                break;
            }
            run_start -= 1;
        }
        (u32::from(digit) - run_start) % 10
    }
}

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use super::classify::{LineClassifier, LineKind};
use crate::model::{Article, Rule, StructureCounts, SubRule, SubSubRule};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    NoOpenArticle,
    NoOpenRule,
    NoOpenSubRule,
}

impl DropReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NoOpenArticle => "no_open_article",
            Self::NoOpenRule => "no_open_rule",
            Self::NoOpenSubRule => "no_open_sub_rule",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedLine {
    pub line_number: usize,
    pub kind: &'static str,
    pub reason: DropReason,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseReport {
    pub line_count: usize,
    pub blank_line_count: usize,
    pub unrecognized_line_count: usize,
    pub article_count: usize,
    pub rule_count: usize,
    pub sub_rule_count: usize,
    pub sub_sub_rule_count: usize,
    pub dropped: Vec<DroppedLine>,
}

impl ParseReport {
    pub fn counts(&self) -> StructureCounts {
        StructureCounts {
            line_count: self.line_count,
            blank_line_count: self.blank_line_count,
            unrecognized_line_count: self.unrecognized_line_count,
            article_count: self.article_count,
            rule_count: self.rule_count,
            sub_rule_count: self.sub_rule_count,
            sub_sub_rule_count: self.sub_sub_rule_count,
            dropped_line_count: self.dropped.len(),
        }
    }
}

/// Builds the article tree in a single forward pass over the lines of a text.
///
/// Holds only compiled patterns; every call gets its own scan state, so one
/// extractor can be shared between threads.
#[derive(Debug, Clone)]
pub struct StructureExtractor {
    classifier: LineClassifier,
}

impl StructureExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            classifier: LineClassifier::new()?,
        })
    }

    pub fn extract(&self, text: &str) -> Vec<Article> {
        self.extract_with_report(text).0
    }

    pub fn extract_with_report(&self, text: &str) -> (Vec<Article>, ParseReport) {
        let mut state = ScanState::default();

        for (index, raw_line) in text.split('\n').enumerate() {
            state.report.line_count += 1;
            state.apply(index + 1, self.classifier.classify(raw_line));
        }

        state.finish()
    }
}

/// A rule that has been opened but not yet attached to its article.
#[derive(Debug)]
struct OpenRule {
    rule: Rule,
    // Opened before any article header; it and everything under it is lost.
    orphaned: bool,
}

#[derive(Debug, Default)]
struct ScanState {
    articles: Vec<Article>,
    open_article: Option<Article>,
    open_rule: Option<OpenRule>,
    report: ParseReport,
}

impl ScanState {
    fn apply(&mut self, line_number: usize, kind: LineKind<'_>) {
        match kind {
            LineKind::Blank => self.report.blank_line_count += 1,
            LineKind::Unrecognized(_) => self.report.unrecognized_line_count += 1,
            LineKind::ArticleHeader { number, title } => {
                self.close_article();
                self.open_article = Some(Article::new(number, title));
            }
            LineKind::Rule(text) => {
                self.close_rule();
                let orphaned = self.open_article.is_none();
                if orphaned {
                    self.drop_line(line_number, kind, DropReason::NoOpenArticle, text);
                }
                self.open_rule = Some(OpenRule {
                    rule: Rule::new(text),
                    orphaned,
                });
            }
            LineKind::Lettered(text) => {
                let reason = match self.open_rule.as_mut() {
                    Some(open) if !open.orphaned => {
                        open.rule.sub_rules.push(SubRule::new(text));
                        return;
                    }
                    Some(_) => DropReason::NoOpenArticle,
                    None => DropReason::NoOpenRule,
                };
                self.drop_line(line_number, kind, reason, text);
            }
            LineKind::Roman(text) => {
                let reason = match self.open_rule.as_mut() {
                    Some(open) if !open.orphaned => match open.rule.sub_rules.last_mut() {
                        Some(sub_rule) => {
                            sub_rule.sub_rules.push(SubSubRule::new(text));
                            return;
                        }
                        None => DropReason::NoOpenSubRule,
                    },
                    Some(_) => DropReason::NoOpenArticle,
                    None => DropReason::NoOpenRule,
                };
                self.drop_line(line_number, kind, reason, text);
            }
        }
    }

    fn drop_line(&mut self, line_number: usize, kind: LineKind<'_>, reason: DropReason, text: &str) {
        debug!(
            line = line_number,
            kind = kind.as_str(),
            reason = reason.as_str(),
            "dropping unattached line"
        );
        self.report.dropped.push(DroppedLine {
            line_number,
            kind: kind.as_str(),
            reason,
            text: text.to_string(),
        });
    }

    fn close_rule(&mut self) {
        let Some(open) = self.open_rule.take() else {
            return;
        };
        if open.orphaned {
            return;
        }
        let Some(article) = self.open_article.as_mut() else {
            return;
        };

        self.report.rule_count += 1;
        self.report.sub_rule_count += open.rule.sub_rules.len();
        self.report.sub_sub_rule_count += open
            .rule
            .sub_rules
            .iter()
            .map(|sub_rule| sub_rule.sub_rules.len())
            .sum::<usize>();
        article.rules.push(open.rule);
    }

    fn close_article(&mut self) {
        self.close_rule();
        if let Some(article) = self.open_article.take() {
            self.report.article_count += 1;
            self.articles.push(article);
        }
    }

    fn finish(mut self) -> (Vec<Article>, ParseReport) {
        self.close_article();
        (self.articles, self.report)
    }
}

use serde::{Deserialize, Serialize};

use crate::structure::DroppedLine;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    #[serde(rename = "article_number")]
    pub number: u64,
    pub title: String,
    pub rules: Vec<Rule>,
}

impl Article {
    pub fn new(number: u64, title: impl Into<String>) -> Self {
        Self {
            number,
            title: title.into(),
            rules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub text: String,
    pub sub_rules: Vec<SubRule>,
}

impl Rule {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sub_rules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubRule {
    pub text: String,
    pub sub_rules: Vec<SubSubRule>,
}

impl SubRule {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sub_rules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubSubRule {
    pub text: String,
}

impl SubSubRule {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolVersions {
    pub pdftotext: Option<String>,
    pub pdftoppm: Option<String>,
    pub tesseract: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    pub path: String,
    pub sha256: String,
    pub byte_len: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionSummary {
    pub mode: String,
    pub page_count: usize,
    pub native_page_count: usize,
    pub text_char_count: usize,
    pub ocr_lang: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StructureCounts {
    pub line_count: usize,
    pub blank_line_count: usize,
    pub unrecognized_line_count: usize,
    pub article_count: usize,
    pub rule_count: usize,
    pub sub_rule_count: usize,
    pub sub_sub_rule_count: usize,
    pub dropped_line_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractRunManifest {
    pub manifest_version: u32,
    pub run_id: String,
    pub status: String,
    pub started_at: String,
    pub updated_at: String,
    pub command: String,
    pub output_path: Option<String>,
    pub output_format: String,
    pub tool_versions: ToolVersions,
    pub source: SourceDocument,
    pub acquisition: AcquisitionSummary,
    pub structure: StructureCounts,
    pub dropped_lines: Vec<DroppedLine>,
    pub warnings: Vec<String>,
}

/// Fields of an extract run manifest that `status` reports on.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractRunSummary {
    pub run_id: Option<String>,
    pub status: Option<String>,
    pub updated_at: Option<String>,
    pub command: Option<String>,
    pub output_path: Option<String>,
    pub source: Option<SourceDocument>,
    pub acquisition: Option<AcquisitionSummary>,
    pub structure: Option<StructureCounts>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

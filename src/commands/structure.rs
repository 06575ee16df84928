use anyhow::{Context, Result};
use tracing::{debug, info};

use super::output::emit_articles;
use crate::cli::StructureArgs;
use crate::structure::StructureExtractor;
use crate::util::read_input_bytes;

pub fn run(args: StructureArgs) -> Result<()> {
    let extractor = StructureExtractor::new()?;

    let bytes = read_input_bytes(&args.input)?;
    let text = String::from_utf8(bytes)
        .with_context(|| format!("input is not valid UTF-8: {}", args.input.display()))?;

    let (articles, report) = extractor.extract_with_report(&text);
    for dropped in &report.dropped {
        debug!(
            line = dropped.line_number,
            kind = dropped.kind,
            reason = dropped.reason.as_str(),
            text = %dropped.text,
            "dropped line"
        );
    }
    info!(
        lines = report.line_count,
        articles = report.article_count,
        rules = report.rule_count,
        dropped = report.dropped.len(),
        "structure extracted"
    );

    emit_articles(&articles, args.format, args.output.as_deref(), None)
}

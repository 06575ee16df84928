use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::OutputFormat;
use crate::model::Article;
use crate::structure::render_outline;
use crate::util::{write_json_pretty, write_text};

/// Writes the article tree to `output`, or to stdout when no path is given.
pub(super) fn emit_articles(
    articles: &[Article],
    format: OutputFormat,
    output: Option<&Path>,
    preview: Option<&str>,
) -> Result<()> {
    match (format, output) {
        (OutputFormat::Json, Some(path)) => write_json_pretty(path, &articles),
        (OutputFormat::Json, None) => {
            let mut stdout = io::BufWriter::new(io::stdout().lock());
            serde_json::to_writer_pretty(&mut stdout, &articles)
                .context("failed to serialize article json output")?;
            writeln!(stdout)?;
            stdout.flush()?;
            Ok(())
        }
        (OutputFormat::Outline, output) => {
            let rendered = render_outline_with_preview(articles, preview);
            match output {
                Some(path) => write_text(path, &rendered),
                None => emit_text(&rendered),
            }
        }
    }
}

pub(super) fn emit_text(text: &str) -> Result<()> {
    let mut stdout = io::BufWriter::new(io::stdout().lock());
    stdout
        .write_all(text.as_bytes())
        .context("failed to write to stdout")?;
    if !text.ends_with('\n') {
        writeln!(stdout)?;
    }
    stdout.flush()?;
    Ok(())
}

fn render_outline_with_preview(articles: &[Article], preview: Option<&str>) -> String {
    let outline = render_outline(articles);
    match preview {
        Some(preview) => format!(
            "Extracted Text Preview:\n{}\n\nExtracted Articles:\n{}",
            preview.trim_end(),
            outline
        ),
        None => outline,
    }
}

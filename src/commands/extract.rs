use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use super::EXTRACT_MANIFEST_PREFIX;
use super::output::emit_articles;
use crate::acquire::{self, AcquiredText, collect_tool_versions};
use crate::cli::ExtractArgs;
use crate::model::{AcquisitionSummary, ExtractRunManifest, SourceDocument};
use crate::structure::{ParseReport, StructureExtractor, preview_text};
use crate::util::{
    is_stdin_path, now_utc_string, read_input_bytes, sha256_bytes, utc_compact_string,
    write_json_pretty,
};

pub fn run(args: ExtractArgs) -> Result<()> {
    let started_ts = Utc::now();
    let started_at = now_utc_string();
    let run_id = format!("extract-{}", utc_compact_string(started_ts));
    let config = args.acquire.to_config();
    let extractor = StructureExtractor::new()?;

    info!(input = %args.input.display(), run_id = %run_id, "starting extract");

    let bytes = read_input_bytes(&args.input)?;
    let source = SourceDocument {
        path: if is_stdin_path(&args.input) {
            "<stdin>".to_string()
        } else {
            args.input.display().to_string()
        },
        sha256: sha256_bytes(&bytes),
        byte_len: bytes.len() as u64,
    };

    let acquired = if is_stdin_path(&args.input) {
        acquire::acquire_text_from_bytes(&bytes, &config)?
    } else {
        acquire::acquire(&args.input, &config)?
    };

    let (articles, report) = extractor.extract_with_report(&acquired.text);
    let warnings = collect_warnings(&acquired, &report);
    for message in &warnings {
        warn!(run_id = %run_id, "{message}");
    }

    info!(
        mode = acquired.mode.as_str(),
        pages = acquired.page_count,
        articles = report.article_count,
        rules = report.rule_count,
        sub_rules = report.sub_rule_count,
        sub_sub_rules = report.sub_sub_rule_count,
        dropped = report.dropped.len(),
        "structure extracted"
    );

    let preview = args
        .preview_limit()
        .map(|max_chars| preview_text(&acquired.text, max_chars));
    emit_articles(&articles, args.format, args.output.as_deref(), preview)?;

    if args.dry_run {
        info!("extract dry-run complete, manifest not written");
        return Ok(());
    }

    let manifest_path = args.manifest_path.clone().unwrap_or_else(|| {
        args.cache_root.join("manifests").join(format!(
            "{}{}.json",
            EXTRACT_MANIFEST_PREFIX,
            utc_compact_string(started_ts)
        ))
    });

    let manifest = ExtractRunManifest {
        manifest_version: 1,
        run_id,
        status: "completed".to_string(),
        started_at,
        updated_at: now_utc_string(),
        command: render_extract_command(&args),
        output_path: args.output.as_ref().map(|path| path.display().to_string()),
        output_format: args.format.as_str().to_string(),
        tool_versions: collect_tool_versions(),
        source,
        acquisition: AcquisitionSummary {
            mode: acquired.mode.as_str().to_string(),
            page_count: acquired.page_count,
            native_page_count: acquired.native_page_count,
            text_char_count: acquired.text.chars().count(),
            ocr_lang: match acquired.mode {
                acquire::AcquisitionMode::Ocr => Some(config.ocr_lang.clone()),
                acquire::AcquisitionMode::Native => None,
            },
        },
        structure: report.counts(),
        dropped_lines: report.dropped,
        warnings,
    };

    write_json_pretty(&manifest_path, &manifest)?;
    info!(path = %manifest_path.display(), "wrote extract run manifest");

    Ok(())
}

fn collect_warnings(acquired: &AcquiredText, report: &ParseReport) -> Vec<String> {
    let mut warnings = Vec::new();

    if acquired.text.is_empty() {
        warnings.push(format!(
            "no text acquired from {} page(s) via {}",
            acquired.page_count,
            acquired.mode.as_str()
        ));
    } else if report.article_count == 0 {
        warnings.push("no article headers found in acquired text".to_string());
    }

    if !report.dropped.is_empty() {
        warnings.push(format!(
            "{} clause line(s) dropped without an open parent",
            report.dropped.len()
        ));
    }

    warnings
}

fn render_extract_command(args: &ExtractArgs) -> String {
    let mut command = vec![
        "legallens".to_string(),
        "extract".to_string(),
        "--input".to_string(),
        args.input.display().to_string(),
    ];

    if let Some(path) = &args.output {
        command.push("--output".to_string());
        command.push(path.display().to_string());
    }
    command.push("--format".to_string());
    command.push(args.format.as_str().to_string());
    match args.preview_limit() {
        Some(max_chars) => {
            command.push("--preview-chars".to_string());
            command.push(max_chars.to_string());
        }
        None => command.push("--no-preview".to_string()),
    }
    command.push("--ocr-lang".to_string());
    command.push(args.acquire.ocr_lang.clone());
    command.push("--ocr-dpi".to_string());
    command.push(args.acquire.ocr_dpi.to_string());
    command.push("--cache-root".to_string());
    command.push(args.cache_root.display().to_string());
    if let Some(path) = &args.manifest_path {
        command.push("--manifest-path".to_string());
        command.push(path.display().to_string());
    }

    command.join(" ")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::acquire::AcquisitionMode;
    use crate::cli::{AcquireArgs, OutputFormat};

    fn acquired(text: &str) -> AcquiredText {
        AcquiredText {
            text: text.to_string(),
            mode: AcquisitionMode::Ocr,
            page_count: 2,
            native_page_count: 0,
        }
    }

    #[test]
    fn warns_on_empty_acquisition() {
        let report = ParseReport::default();
        let warnings = collect_warnings(&acquired(""), &report);

        assert_eq!(warnings, vec!["no text acquired from 2 page(s) via ocr"]);
    }

    #[test]
    fn warns_on_missing_headers_and_dropped_lines() {
        let extractor = StructureExtractor::new().unwrap();
        let text = "Preamble\n- orphan rule";
        let (_, report) = extractor.extract_with_report(text);

        let warnings = collect_warnings(&acquired(text), &report);

        assert_eq!(
            warnings,
            vec![
                "no article headers found in acquired text",
                "1 clause line(s) dropped without an open parent"
            ]
        );
    }

    #[test]
    fn renders_reproducible_command_line() {
        let args = ExtractArgs {
            input: PathBuf::from("decree.pdf"),
            output: Some(PathBuf::from("out/articles.json")),
            format: OutputFormat::Json,
            preview_chars: 1000,
            no_preview: false,
            acquire: AcquireArgs {
                ocr_lang: "fra".to_string(),
                ocr_dpi: 300,
            },
            cache_root: PathBuf::from(".cache/legallens"),
            manifest_path: None,
            dry_run: false,
        };

        assert_eq!(
            render_extract_command(&args),
            "legallens extract --input decree.pdf --output out/articles.json --format json \
             --preview-chars 1000 --ocr-lang fra --ocr-dpi 300 --cache-root .cache/legallens"
        );
    }

    #[test]
    fn renders_disabled_preview() {
        let args = ExtractArgs {
            input: PathBuf::from("-"),
            output: None,
            format: OutputFormat::Outline,
            preview_chars: 1000,
            no_preview: true,
            acquire: AcquireArgs {
                ocr_lang: "eng".to_string(),
                ocr_dpi: 200,
            },
            cache_root: PathBuf::from("cache"),
            manifest_path: None,
            dry_run: true,
        };

        assert_eq!(
            render_extract_command(&args),
            "legallens extract --input - --format outline --no-preview \
             --ocr-lang eng --ocr-dpi 200 --cache-root cache"
        );
    }
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::acquire::AcquireConfig;

#[derive(Parser, Debug)]
#[command(
    name = "legallens",
    version,
    about = "Extract article/rule structure from legal and regulatory PDFs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Acquire text from a PDF and extract its article tree.
    Extract(ExtractArgs),
    /// Acquire text from a PDF without structuring it.
    Text(TextArgs),
    /// Extract the article tree from already-acquired plain text.
    Structure(StructureArgs),
    /// Summarize the most recent extract run.
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct AcquireArgs {
    #[arg(long, default_value = "eng")]
    pub ocr_lang: String,

    #[arg(long, default_value_t = 200)]
    pub ocr_dpi: u32,
}

impl AcquireArgs {
    pub fn to_config(&self) -> AcquireConfig {
        AcquireConfig {
            ocr_lang: self.ocr_lang.clone(),
            ocr_dpi: self.ocr_dpi,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// PDF path, or `-` to read PDF bytes from stdin.
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Characters of acquired text shown before the outline.
    #[arg(long, default_value_t = 1000)]
    pub preview_chars: usize,

    #[arg(long, default_value_t = false)]
    pub no_preview: bool,

    #[command(flatten)]
    pub acquire: AcquireArgs,

    #[arg(long, default_value = ".cache/legallens")]
    pub cache_root: PathBuf,

    #[arg(long)]
    pub manifest_path: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

impl ExtractArgs {
    pub fn preview_limit(&self) -> Option<usize> {
        (!self.no_preview).then_some(self.preview_chars)
    }
}

#[derive(Args, Debug, Clone)]
pub struct TextArgs {
    /// PDF path, or `-` to read PDF bytes from stdin.
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub acquire: AcquireArgs,
}

#[derive(Args, Debug, Clone)]
pub struct StructureArgs {
    /// Text path, or `-` to read UTF-8 text from stdin.
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long)]
    pub output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    #[arg(long, default_value = ".cache/legallens")]
    pub cache_root: PathBuf,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Outline,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Outline => "outline",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_extract(args: &[&str]) -> ExtractArgs {
        let argv = ["legallens", "extract", "--input", "a.pdf"]
            .iter()
            .chain(args)
            .copied();
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Extract(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn extract_previews_first_thousand_chars_by_default() {
        let args = parse_extract(&[]);

        assert_eq!(args.preview_chars, 1000);
        assert_eq!(args.preview_limit(), Some(1000));
    }

    #[test]
    fn extract_preview_can_be_resized_or_disabled() {
        assert_eq!(parse_extract(&["--preview-chars", "40"]).preview_limit(), Some(40));
        assert_eq!(parse_extract(&["--no-preview"]).preview_limit(), None);
    }
}

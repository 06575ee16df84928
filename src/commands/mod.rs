pub mod extract;
mod output;
pub mod status;
pub mod structure;
pub mod text;

const EXTRACT_MANIFEST_PREFIX: &str = "extract_run_";

//! Subcommands and the options they share.

pub mod batch;
pub mod config;
pub mod locales;
pub mod process;

use std::path::Path;
use std::sync::Arc;

use clap::Args;
use tracing::debug;

use pdfctx_core::{
    DocumentPipeline, LocaleRegistry, PageSelection, PdfCtxConfig, TableEngine, TabulaEngine,
};

use crate::output::OutputFormat;

/// Extraction options shared by `process` and `batch`.
#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: OutputFormat,

    /// Domain parser applied to the extracted rows (e.g. bank_statement)
    #[arg(long)]
    pub parser: Option<String>,

    /// Use this locale instead of detecting it (fr, de, en)
    #[arg(short, long)]
    pub locale: Option<String>,

    /// Pages to read, e.g. "1,3" (default: all)
    #[arg(long)]
    pub pages: Option<String>,

    /// Convert amount cells to numbers using the document locale
    #[arg(long)]
    pub normalize: bool,

    /// Only print errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl ExtractArgs {
    /// Command-line flags take precedence over the config file.
    pub fn apply(&self, config: &mut PdfCtxConfig) {
        if let Some(parser) = &self.parser {
            config.extraction.parser = Some(parser.clone());
        }
        if self.normalize {
            config.extraction.normalize_amounts = true;
        }
    }

    pub fn page_selection(&self) -> anyhow::Result<PageSelection> {
        match &self.pages {
            None => Ok(PageSelection::All),
            Some(pages) => parse_pages(pages),
        }
    }
}

/// Parse "all" or a comma-separated list of 1-indexed page numbers.
pub fn parse_pages(input: &str) -> anyhow::Result<PageSelection> {
    let input = input.trim();
    if input.is_empty() || input.eq_ignore_ascii_case("all") {
        return Ok(PageSelection::All);
    }

    let mut pages = Vec::new();
    for part in input.split(',') {
        let page: u32 = part
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("Invalid page number: '{}'", part.trim()))?;
        if page == 0 {
            anyhow::bail!("Page numbers start at 1");
        }
        pages.push(page);
    }
    Ok(PageSelection::Pages(pages))
}

/// Load the config from `path`, the default location, or built-in defaults.
pub fn load_config(path: Option<&str>) -> anyhow::Result<PdfCtxConfig> {
    if let Some(path) = path {
        return Ok(PdfCtxConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        Ok(PdfCtxConfig::from_file(&default_path)?)
    } else {
        Ok(PdfCtxConfig::default())
    }
}

/// Check the engine once and build the document pipeline.
pub fn build_pipeline(
    config: &PdfCtxConfig,
    args: &ExtractArgs,
) -> anyhow::Result<DocumentPipeline<TabulaEngine>> {
    let pages = args.page_selection()?;

    let engine = TabulaEngine::from_config(&config.engine);
    engine
        .check_available()
        .map_err(|e| anyhow::anyhow!("Table extraction engine unavailable: {}", e))?;

    let registry = Arc::new(LocaleRegistry::builtin());
    Ok(DocumentPipeline::from_config(engine, config, registry)?.with_pages(pages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_pages() {
        assert_eq!(parse_pages("all").unwrap(), PageSelection::All);
        assert_eq!(parse_pages("1, 3,4").unwrap(), PageSelection::Pages(vec![1, 3, 4]));
        assert!(parse_pages("0").is_err());
        assert!(parse_pages("1,two").is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let args = ExtractArgs {
            format: OutputFormat::Csv,
            parser: Some("bank_statement".to_string()),
            locale: None,
            pages: None,
            normalize: true,
            quiet: false,
        };

        let mut config = PdfCtxConfig::default();
        args.apply(&mut config);
        assert_eq!(config.extraction.parser.as_deref(), Some("bank_statement"));
        assert!(config.extraction.normalize_amounts);
    }
}

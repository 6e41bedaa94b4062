//! Locales command - list supported locales.

use clap::Args;
use console::style;

use pdfctx_core::LocaleRegistry;

/// Arguments for the locales command.
#[derive(Args)]
pub struct LocalesArgs {
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: LocalesArgs) -> anyhow::Result<()> {
    let registry = LocaleRegistry::builtin();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&registry.list_available_locales())?);
        return Ok(());
    }

    println!("{}", style("Available locales:").bold());
    for locale in registry.iter() {
        println!(
            "  {}  {:<8} decimal '{}', thousands '{}'",
            style(&locale.code).cyan(),
            locale.name,
            locale.decimal_separator,
            locale.thousands_separator
        );
    }

    Ok(())
}

//! Terminal host for the financial statement query form.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::Datelike;
use clap::{Parser, ValueEnum};
use finform::{
    ControllerConfig, DEFAULT_BASE_URL, Field, FormController, Labels, MemoryPage, SubmitOutcome,
    render_text,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum Lang {
    #[default]
    En,
    Zh,
}

/// Query stock financial statements and print the result.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Server root the query is posted to.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Tushare token, forwarded as a header.
    #[arg(long, default_value = "")]
    tushare_token: String,

    /// OpenAI key, forwarded as a header.
    #[arg(long, default_value = "")]
    openai_key: String,

    /// Stock symbols, separated by commas or whitespace (at most 10 are sent).
    #[arg(long, default_value = "")]
    symbols: String,

    /// Query quarterly statements instead of yearly ones.
    #[arg(long)]
    quarter: bool,

    /// First year of the range (defaults to the end year).
    #[arg(long)]
    start_year: Option<String>,

    /// Last year of the range (defaults to the current year).
    #[arg(long)]
    end_year: Option<String>,

    /// First quarter, only sent with --quarter.
    #[arg(long, default_value = "")]
    start_quarter: String,

    /// Last quarter, only sent with --quarter.
    #[arg(long, default_value = "")]
    end_quarter: String,

    /// Name of the generated Excel file.
    #[arg(long, default_value = "")]
    filename: String,

    /// Language of the status and link labels.
    #[arg(long, value_enum, default_value_t = Lang::En)]
    lang: Lang,

    /// Print the page as JSON instead of a text table.
    #[arg(long)]
    json: bool,

    /// Download the generated file to this path.
    #[arg(long)]
    save: Option<PathBuf>,
}

impl Cli {
    fn fill(&self, page: &MemoryPage) {
        let end_year = self
            .end_year
            .clone()
            .unwrap_or_else(|| chrono::Local::now().year().to_string());
        let start_year = self.start_year.clone().unwrap_or_else(|| end_year.clone());

        let form = &page.form;
        form.set(Field::TushareToken, self.tushare_token.as_str());
        form.set(Field::OpenAiKey, self.openai_key.as_str());
        form.set(Field::Filename, self.filename.as_str());
        form.set(Field::Symbols, self.symbols.as_str());
        form.set(Field::StartYear, start_year);
        form.set(Field::EndYear, end_year);
        form.set(Field::StartQuarter, self.start_quarter.as_str());
        form.set(Field::EndQuarter, self.end_quarter.as_str());
        form.set_quarter_mode(self.quarter);
    }

    fn config(&self) -> ControllerConfig {
        let labels = match self.lang {
            Lang::En => Labels::default(),
            Lang::Zh => Labels::zh_cn(),
        };
        ControllerConfig::new().with_labels(labels)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    debug!(base_url = %cli.base_url, quarter = cli.quarter, "Starting");

    let page = MemoryPage::new();
    cli.fill(&page);

    let controller = FormController::http(page.regions(), &cli.base_url, cli.config())
        .with_context(|| format!("invalid base URL {}", cli.base_url))?;
    let outcome = controller.submit().await;

    let snapshot = page.snapshot();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", render_text(&snapshot));
    }

    match outcome {
        SubmitOutcome::Rendered => {}
        SubmitOutcome::Failed(_) | SubmitOutcome::Ignored => return Ok(ExitCode::FAILURE),
    }

    if let Some(path) = &cli.save {
        let link = snapshot.download;
        let href = match link.href {
            Some(href) if !link.disabled => href,
            _ => anyhow::bail!("the response carries no download link"),
        };
        let bytes = controller
            .backend()
            .download(&href)
            .await
            .with_context(|| format!("failed to download {href}"))?;
        tokio::fs::write(path, &bytes)
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), bytes = bytes.len(), "Saved download");
        eprintln!("saved {} bytes to {}", bytes.len(), path.display());
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use finform::FormSource;

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from([
            "finform",
            "--symbols",
            "AAPL MSFT",
            "--quarter",
            "--start-year",
            "2020",
            "--end-year",
            "2023",
            "--start-quarter",
            "2",
            "--lang",
            "zh",
        ])
        .unwrap();

        assert_eq!(cli.base_url, DEFAULT_BASE_URL);
        assert!(cli.quarter);
        assert!(matches!(cli.lang, Lang::Zh));
        assert!(cli.save.is_none());
    }

    #[test]
    fn test_fill_form() {
        let cli = Cli::try_parse_from([
            "finform",
            "--symbols",
            "AAPL",
            "--end-year",
            "2023",
            "--quarter",
        ])
        .unwrap();
        let page = MemoryPage::new();
        cli.fill(&page);

        let form: &dyn FormSource = page.form.as_ref();
        assert_eq!(form.value(Field::Symbols), "AAPL");
        assert_eq!(form.value(Field::StartYear), "2023");
        assert_eq!(form.value(Field::EndYear), "2023");
        assert_eq!(form.value(Field::StartQuarter), "");
        assert!(form.quarter_mode());
    }

    #[test]
    fn test_end_year_defaults_to_current_year() {
        let cli = Cli::try_parse_from(["finform"]).unwrap();
        let page = MemoryPage::new();
        cli.fill(&page);

        let current = chrono::Local::now().year().to_string();
        let form: &dyn FormSource = page.form.as_ref();
        assert_eq!(form.value(Field::EndYear), current);
    }

    #[test]
    fn test_zh_labels() {
        let cli = Cli::try_parse_from(["finform", "--lang", "zh"]).unwrap();
        assert_eq!(cli.config().labels, Labels::zh_cn());
    }
}

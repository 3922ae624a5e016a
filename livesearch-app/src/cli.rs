use clap::{ArgAction, Parser};
use livesearch_core::source::{split_handles, split_list};
use livesearch_core::{
    Mode, SearchError, SearchParametersBuilder, SourceConfig, SourceKind, SourceOptions,
};
use std::path::PathBuf;

/// Ask Grok a question with live search and print the answer with its citations.
#[derive(Debug, Parser)]
#[command(name = "livesearch", version)]
pub struct Cli {
    /// The question; multiple words are joined with spaces.
    #[arg(required_unless_present = "list_models")]
    pub query: Vec<String>,

    /// YAML config file; skipped when it does not exist.
    #[arg(short, long, default_value = "livesearch.yaml")]
    pub config: PathBuf,

    #[arg(long, env = "XAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[arg(short, long)]
    pub model: Option<String>,

    /// auto, on or off
    #[arg(long, value_parser = parse_mode)]
    pub mode: Option<Mode>,

    /// Search the web.
    #[arg(long)]
    pub web: bool,

    /// Search news sites.
    #[arg(long)]
    pub news: bool,

    /// Two-letter region code for web/news.
    #[arg(long)]
    pub country: Option<String>,

    /// Comma-separated sites to leave out of web/news results.
    #[arg(long, value_name = "SITES")]
    pub exclude: Option<String>,

    /// Safe search for web/news; omitted unless given.
    #[arg(long, action = ArgAction::Set, value_name = "BOOL")]
    pub safe_search: Option<bool>,

    /// Comma-separated X handles, with or without `@`.
    #[arg(long, value_name = "HANDLES")]
    pub x_handles: Option<String>,

    /// Comma-separated RSS feed URLs.
    #[arg(long, value_name = "URLS")]
    pub rss_links: Option<String>,

    /// Start date, YYYY-MM-DD.
    #[arg(long)]
    pub from: Option<String>,

    /// End date, YYYY-MM-DD.
    #[arg(long)]
    pub to: Option<String>,

    #[arg(long)]
    pub max_results: Option<u32>,

    #[arg(long)]
    pub no_citations: bool,

    /// Print the raw response instead of content and citations.
    #[arg(long)]
    pub json: bool,

    /// Print the suggested model names and exit.
    #[arg(long)]
    pub list_models: bool,
}

fn parse_mode(s: &str) -> Result<Mode, SearchError> {
    s.parse()
}

impl Cli {
    pub fn query_text(&self) -> String {
        self.query.join(" ").trim().to_string()
    }

    /// Sources in a fixed order: web, x, news, rss.
    pub fn sources(&self) -> Vec<SourceConfig> {
        let site_options = || SourceOptions {
            country: self.country.clone(),
            excluded_sites: self.exclude.as_deref().map(split_list),
            safe_search: self.safe_search,
            ..Default::default()
        };

        let mut sources = Vec::new();
        if self.web {
            sources.push(SourceConfig::for_kind(SourceKind::Web, site_options()));
        }
        if let Some(handles) = &self.x_handles {
            sources.push(SourceConfig::for_kind(
                SourceKind::Social,
                SourceOptions {
                    handles: Some(split_handles(handles)),
                    ..Default::default()
                },
            ));
        }
        if self.news {
            sources.push(SourceConfig::for_kind(SourceKind::News, site_options()));
        }
        if let Some(links) = &self.rss_links {
            sources.push(SourceConfig::for_kind(
                SourceKind::Feed,
                SourceOptions {
                    links: Some(split_list(links)),
                    ..Default::default()
                },
            ));
        }
        sources
    }

    /// Layer the flags over the configured defaults.
    pub fn apply(&self, mut builder: SearchParametersBuilder) -> SearchParametersBuilder {
        if let Some(mode) = self.mode {
            builder = builder.mode(mode);
        }
        if let Some(n) = self.max_results {
            builder = builder.max_results(n);
        }
        if self.no_citations {
            builder = builder.return_citations(false);
        }
        builder
            .sources(self.sources())
            .date_range(self.from.clone(), self.to.clone())
    }
}

//! CLI argument parsing.
//!
//! In the action the inputs usually arrive as `INPUT_*` environment
//! variables; these flags exist for local runs and take priority over
//! both the environment and the config file.

use clap::Parser;

use critiq::models::{Language, ProviderName, ReviewType, Severity};

/// AI code review for GitHub pull requests.
#[derive(Parser, Debug)]
#[command(name = "critiq", version = critiq::constants::VERSION)]
pub struct Cli {
    /// Review focus: full, security, performance, or style.
    #[arg(long)]
    pub review_type: Option<ReviewType>,

    /// Language for review text: en, ko, ja, or zh.
    #[arg(long)]
    pub language: Option<Language>,

    /// Maximum issues reported per file (1-10).
    #[arg(long)]
    pub max_issues_per_file: Option<u8>,

    /// Minimum severity included in the report.
    #[arg(long)]
    pub severity_filter: Option<Severity>,

    /// Maximum number of changed files to review.
    #[arg(long)]
    pub max_files: Option<usize>,

    /// LLM provider: anthropic, openai, gemini, or openai-compatible.
    #[arg(long)]
    pub provider: Option<ProviderName>,

    /// Model identifier passed to the provider.
    #[arg(long)]
    pub model: Option<String>,

    /// Base URL for OpenAI-compatible providers.
    #[arg(long)]
    pub base_url: Option<String>,

    /// Run the reviews but print the comment instead of posting it.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

impl Cli {
    /// Fold the flags into an already-layered config.
    pub fn apply_to(&self, config: &mut critiq::config::Config) {
        if let Some(review_type) = self.review_type {
            config.review.review_type = review_type;
        }
        if let Some(language) = self.language {
            config.review.language = language;
        }
        if let Some(n) = self.max_issues_per_file {
            config.review.max_issues_per_file = n.clamp(1, 10);
        }
        if let Some(severity) = self.severity_filter {
            config.review.severity_filter = severity;
        }
        if let Some(n) = self.max_files {
            config.review.max_files = n;
        }
        if let Some(provider) = self.provider {
            config.provider.name = provider;
        }
        if let Some(ref model) = self.model {
            config.provider.model = model.clone();
        }
        if let Some(ref base_url) = self.base_url {
            config.provider.base_url = Some(base_url.clone());
        }
    }
}

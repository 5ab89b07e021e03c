use std::env;

/// Secrets and endpoints loaded from environment variables (and `.env`).
///
/// Everything is optional here; the pipeline builder decides which keys the
/// selected policy actually needs and reports the missing ones.
#[derive(Debug, Clone, Default)]
pub struct Config {
    // AI providers
    pub gemini_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,

    // Search
    pub tavily_api_key: Option<String>,
    pub serper_api_key: Option<String>,

    // Retrieval
    pub apify_api_token: Option<String>,
    pub browserless_url: Option<String>,
    pub browserless_token: Option<String>,
    pub reader_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let config = Self {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            openai_api_key: optional_env("OPENAI_API_KEY"),
            tavily_api_key: optional_env("TAVILY_API_KEY"),
            serper_api_key: optional_env("SERPER_API_KEY"),
            apify_api_token: optional_env("APIFY_API_TOKEN"),
            browserless_url: optional_env("BROWSERLESS_URL"),
            browserless_token: optional_env("BROWSERLESS_TOKEN"),
            reader_api_key: optional_env("READER_API_KEY"),
        };

        config.log_keys();
        config
    }

    fn log_keys(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  GEMINI_API_KEY: {}", preview_opt(&self.gemini_api_key));
        tracing::info!("  ANTHROPIC_API_KEY: {}", preview_opt(&self.anthropic_api_key));
        tracing::info!("  OPENAI_API_KEY: {}", preview_opt(&self.openai_api_key));
        tracing::info!("  TAVILY_API_KEY: {}", preview_opt(&self.tavily_api_key));
        tracing::info!("  SERPER_API_KEY: {}", preview_opt(&self.serper_api_key));
        tracing::info!("  APIFY_API_TOKEN: {}", preview_opt(&self.apify_api_token));
        tracing::info!("  BROWSERLESS_URL: {}", preview_opt(&self.browserless_url));
        tracing::info!("  READER_API_KEY: {}", preview_opt(&self.reader_api_key));
    }
}

/// Empty values count as unset.
fn optional_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn preview(val: &str) -> String {
    let n = val
        .char_indices()
        .nth(5)
        .map(|(i, _)| i)
        .unwrap_or(val.len());
    format!("{}...({} chars)", &val[..n], val.chars().count())
}

fn preview_opt(val: &Option<String>) -> String {
    match val {
        Some(v) => preview(v),
        None => "<not set>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_hides_most_of_the_secret() {
        assert_eq!(preview("tvly-abcdef123456"), "tvly-...(17 chars)");
        assert_eq!(preview("abc"), "abc...(3 chars)");
    }

    #[test]
    fn preview_opt_reports_missing() {
        assert_eq!(preview_opt(&None), "<not set>");
    }
}

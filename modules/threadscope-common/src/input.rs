use crate::types::is_site_url;

/// What the user asked to analyze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputTarget {
    /// Free text; the locator searches for threads.
    Topic(String),
    /// Explicit thread URLs; the locator wraps them without searching.
    Urls(Vec<String>),
}

impl InputTarget {
    /// Classify raw input. Tokens are split on commas and whitespace; any
    /// token that is a URL on `site` switches to explicit mode, and only
    /// those tokens are kept. Anything else is a topic.
    ///
    /// Pasted links often lack a scheme (`www.reddit.com/r/...`); a token
    /// with a path and no scheme is read as `https://`.
    pub fn parse(input: &str, site: &str) -> Self {
        let urls: Vec<String> = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(with_scheme)
            .filter(|token| is_site_url(token, site))
            .collect();

        if urls.is_empty() {
            InputTarget::Topic(input.split_whitespace().collect::<Vec<_>>().join(" "))
        } else {
            InputTarget::Urls(urls)
        }
    }

    /// Short label for logs and reports.
    pub fn label(&self) -> String {
        match self {
            InputTarget::Topic(topic) => topic.clone(),
            InputTarget::Urls(urls) => format!("{} direct URL(s)", urls.len()),
        }
    }
}

fn with_scheme(token: &str) -> String {
    if token.contains("://") || !token.contains('/') {
        token.to_string()
    } else {
        format!("https://{token}")
    }
}

// src/fetch.rs
//! Page fetch collaborator: URL in, line-oriented plain text out.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}

pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new(user_agent: &str, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .build()
            .context("building http client")?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("GET {url}"))?
            .error_for_status()
            .with_context(|| format!("GET {url} non-2xx"))?;
        let body = resp.text().await.with_context(|| format!("reading body of {url}"))?;
        Ok(html_to_text(&body))
    }
}

static RE_DROP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<script\b.*?</script\s*>|<style\b.*?</style\s*>|<noscript\b.*?</noscript\s*>|<!--.*?-->")
        .expect("drop regex")
});
static RE_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</?(?:p|div|li|ul|ol|tr|td|th|table|h[1-6]|section|article|header|footer|nav|span|a|time)\b[^>]*>")
        .expect("break regex")
});
static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)</?[^>]+>").expect("tag regex"));
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\u{00A0}\r\f\v]+").expect("ws regex"));

/// Crude HTML → text: drops script/style, breaks lines at block tags, strips
/// the remaining tags and decodes entities. One output line per text run.
pub fn html_to_text(html: &str) -> String {
    let out = RE_DROP.replace_all(html, " ");
    let out = RE_BREAK.replace_all(&out, "\n");
    let out = RE_TAGS.replace_all(&out, " ");
    let out = html_escape::decode_html_entities(&out);

    out.lines()
        .map(|l| RE_WS.replace_all(l, " ").trim().to_string())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

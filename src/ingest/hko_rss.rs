/// HKO RSS Feed Loader
///
/// Every HKO RSS feed is an envelope: the channel/item metadata is plain
/// XML, while the actual bulletin lives in a CDATA blob inside the item's
/// `<description>`. Loading a feed therefore parses twice: once as XML to
/// find the envelope fields and the blob, once as HTML to read the blob.
///
/// Feed index: https://www.hko.gov.hk/en/rss/rss.htm

use std::time::Duration;

use quick_xml::Reader;
use quick_xml::events::Event;
use scraper::{Html, Selector};

use crate::model::FeedError;

// ============================================================================
// Document sources
// ============================================================================

/// Anything that can return the raw body of a feed URL.
///
/// The record builder only ever talks to this trait, so tests can hand it
/// fixture documents keyed by URL.
pub trait DocumentSource {
    fn fetch(&self, url: &str) -> Result<String, FeedError>;
}

/// Production source: blocking HTTP for `http(s)://` URLs, local reads for
/// `file://` URLs (handy for pointing the config at saved feeds).
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: reqwest::blocking::Client,
}

impl FeedClient {
    pub fn new(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }

    /// Builds a client with an optional overall request timeout.
    pub fn with_timeout(
        user_agent: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, reqwest::Error> {
        // reqwest's blocking client defaults to 30s; `None` means wait forever.
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent.to_string())
            .timeout(timeout)
            .build()?;
        Ok(Self::new(client))
    }
}

impl DocumentSource for FeedClient {
    fn fetch(&self, url: &str) -> Result<String, FeedError> {
        if let Some(path) = url.strip_prefix("file://") {
            return std::fs::read_to_string(path).map_err(|e| FeedError::Http {
                url: url.to_string(),
                message: e.to_string(),
            });
        }

        let response = self.client.get(url).send().map_err(|e| FeedError::Http {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        if !response.status().is_success() {
            return Err(FeedError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.text().map_err(|e| FeedError::Http {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

// ============================================================================
// Envelope + fragment
// ============================================================================

/// Metadata read from the XML envelope. Each field is the text of the
/// first element with that name, or empty if there was none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEnvelope {
    pub title: String,
    pub author: String,
    pub pub_date: String,
    payload: Option<String>,
}

/// A loaded feed: its envelope plus the re-parsed CDATA payload.
#[derive(Debug)]
pub struct FeedFragment {
    pub envelope: FeedEnvelope,
    html: Html,
}

impl FeedFragment {
    /// All text nodes of the payload concatenated, markup removed.
    pub fn text(&self) -> String {
        self.html.root_element().text().collect()
    }

    /// `src` of the first `<img>` in the payload, or empty.
    pub fn first_image_src(&self) -> String {
        Selector::parse("img")
            .ok()
            .and_then(|selector| {
                self.html
                    .select(&selector)
                    .next()
                    .and_then(|el| el.value().attr("src"))
                    .map(str::to_string)
            })
            .unwrap_or_default()
    }

    /// Text of the first `<tag id="id">` in the payload, or empty.
    pub fn element_text_by_id(&self, tag: &str, id: &str) -> String {
        Selector::parse(&format!("{tag}#{id}"))
            .ok()
            .and_then(|selector| {
                self.html
                    .select(&selector)
                    .next()
                    .map(|el| el.text().collect::<String>())
            })
            .unwrap_or_default()
    }

    /// Number of `<table>` elements in the payload.
    pub fn table_count(&self) -> usize {
        Selector::parse("table")
            .map(|selector| self.html.select(&selector).count())
            .unwrap_or(0)
    }
}

/// Scans the RSS envelope for the first `title`, `author`, `pubDate` and
/// the first CDATA section.
pub fn parse_envelope(url: &str, xml: &str) -> Result<FeedEnvelope, FeedError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut envelope = FeedEnvelope::default();
    let mut current: Vec<u8> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => current = e.name().as_ref().to_vec(),
            Ok(Event::End(_)) => current.clear(),
            Ok(Event::Text(e)) => {
                let slot = match current.as_slice() {
                    b"title" => &mut envelope.title,
                    b"author" => &mut envelope.author,
                    b"pubDate" => &mut envelope.pub_date,
                    _ => continue,
                };
                if slot.is_empty() {
                    let text = e.unescape().map_err(|err| FeedError::Xml {
                        url: url.to_string(),
                        message: err.to_string(),
                    })?;
                    *slot = text.trim().to_string();
                }
            }
            Ok(Event::CData(e)) => {
                if envelope.payload.is_none() {
                    envelope.payload = Some(String::from_utf8_lossy(&e.into_inner()).into_owned());
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(FeedError::Xml {
                    url: url.to_string(),
                    message: format!(
                        "at byte {}: {}",
                        reader.error_position(),
                        err
                    ),
                });
            }
            _ => {}
        }
    }

    Ok(envelope)
}

/// Splits a fetched feed body into envelope and parsed payload.
///
/// Fails with `MissingPayload` when the item has no CDATA blob; there is no
/// useful partial result in that case.
pub fn parse_feed(url: &str, body: &str) -> Result<FeedFragment, FeedError> {
    let envelope = parse_envelope(url, body)?;
    let payload = envelope
        .payload
        .as_deref()
        .ok_or_else(|| FeedError::MissingPayload(url.to_string()))?;
    let html = Html::parse_fragment(payload.trim());

    Ok(FeedFragment { envelope, html })
}

/// Fetches `url` through `source` and parses it into a fragment.
pub fn load_fragment(source: &dyn DocumentSource, url: &str) -> Result<FeedFragment, FeedError> {
    let body = source.fetch(url)?;
    parse_feed(url, &body)
}

// ============================================================================
// Tests
// ============================================================================

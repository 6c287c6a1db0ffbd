//! Sitemap XML parsing
//!
//! Parses a single (already decompressed) XML document into either a list of
//! child sitemap URLs (a sitemap index) or a list of URL entries with their
//! optional metadata (a urlset). The parser is namespace-insensitive: only
//! local element names matter, so `<news:publication_name>` and
//! `<publication_name>` are the same tag.
//!
//! Malformed XML raises a distinguishable [`ParseError`] rather than
//! corrupting state or returning a silently empty result.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::model::SitemapKind;

/// Sitemap parsing failure
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed XML: {0}")]
    Xml(String),

    #[error("Unexpected root element <{0}>, expected <sitemapindex> or <urlset>")]
    UnexpectedRoot(String),

    #[error("Document contains no root element")]
    Empty,
}

/// One `<url>` entry of a leaf sitemap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    /// The required `<loc>` value
    pub loc: String,

    /// Every other tag of the entry, keyed by local name; nested elements
    /// are flattened with ancestor-tag prefixes joined by underscores
    /// (e.g. `news_publication_name`)
    pub extra: BTreeMap<String, String>,
}

/// A parsed sitemap document
#[derive(Debug, Clone)]
pub enum ParsedSitemap {
    /// A sitemap index: the `<loc>` values of its child sitemaps
    Index(Vec<String>),

    /// A leaf urlset: one entry per `<url>` element carrying a `<loc>`
    UrlSet(Vec<SitemapEntry>),
}

impl ParsedSitemap {
    /// The document kind discriminator recorded on the sitemap node
    pub fn kind(&self) -> SitemapKind {
        match self {
            ParsedSitemap::Index(_) => SitemapKind::Index,
            ParsedSitemap::UrlSet(_) => SitemapKind::UrlSet,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RootKind {
    Index,
    UrlSet,
}

/// Parses one sitemap document
///
/// The root element's local name selects the branch: `sitemapindex` yields
/// the child sitemap URLs, `urlset` yields URL entries. Entries without a
/// `<loc>` child are skipped with a warning, since some feeds omit it.
pub fn parse_sitemap(bytes: &[u8]) -> Result<ParsedSitemap, ParseError> {
    let mut reader = Reader::from_reader(bytes);
    reader.trim_text(true);

    let mut buf = Vec::new();

    let mut root: Option<RootKind> = None;
    let mut child_sitemaps: Vec<String> = Vec::new();
    let mut entries: Vec<SitemapEntry> = Vec::new();

    // True while inside a <sitemap> or <url> entry element
    let mut in_entry = false;
    // Local names of open elements below the entry element
    let mut stack: Vec<String> = Vec::new();
    let mut loc: Option<String> = None;
    let mut extra: BTreeMap<String, String> = BTreeMap::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let local = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                match root {
                    None => {
                        root = Some(match local.as_str() {
                            "sitemapindex" => RootKind::Index,
                            "urlset" => RootKind::UrlSet,
                            _ => return Err(ParseError::UnexpectedRoot(local)),
                        });
                    }
                    Some(root_kind) => {
                        let entry_tag = match root_kind {
                            RootKind::Index => "sitemap",
                            RootKind::UrlSet => "url",
                        };
                        if !in_entry && local == entry_tag {
                            in_entry = true;
                            stack.clear();
                            loc = None;
                            extra.clear();
                        } else if in_entry {
                            stack.push(local);
                        }
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if in_entry && !stack.is_empty() {
                    let text = e.unescape().map_err(|e| ParseError::Xml(e.to_string()))?;
                    record_text(text.as_bytes(), &stack, &mut loc, &mut extra);
                }
            }
            Ok(Event::CData(e)) => {
                if in_entry && !stack.is_empty() {
                    record_text(e.as_ref(), &stack, &mut loc, &mut extra);
                }
            }
            Ok(Event::End(e)) => {
                let local = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                if in_entry {
                    if stack.last().map(|s| s.as_str()) == Some(local.as_str()) {
                        stack.pop();
                    } else if local == "sitemap" || local == "url" {
                        // Closing the entry itself
                        in_entry = false;
                        match root {
                            Some(RootKind::Index) => match loc.take() {
                                Some(l) => child_sitemaps.push(l),
                                None => {
                                    tracing::warn!("No <loc> tag found in a sitemap index node");
                                }
                            },
                            Some(RootKind::UrlSet) => match loc.take() {
                                Some(l) => entries.push(SitemapEntry {
                                    loc: l,
                                    extra: std::mem::take(&mut extra),
                                }),
                                None => {
                                    tracing::warn!("No <loc> tag found in a urlset node");
                                }
                            },
                            None => {}
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(ParseError::Xml(e.to_string())),
        }
        buf.clear();
    }

    match root {
        Some(RootKind::Index) => Ok(ParsedSitemap::Index(child_sitemaps)),
        Some(RootKind::UrlSet) => Ok(ParsedSitemap::UrlSet(entries)),
        None => Err(ParseError::Empty),
    }
}

/// Assigns element text to either the entry's `loc` or a flattened extra key
fn record_text(
    raw: &[u8],
    stack: &[String],
    loc: &mut Option<String>,
    extra: &mut BTreeMap<String, String>,
) {
    let text = String::from_utf8_lossy(raw);
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    if stack.len() == 1 && stack[0] == "loc" {
        *loc = Some(text.to_string());
    } else {
        extra.insert(stack.join("_"), text.to_string());
    }
}

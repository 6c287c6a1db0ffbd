//! Sitemap discovery engine
//!
//! The pieces of the crawl pipeline that turn a target URL into a flat
//! table of discovered URLs: robots.txt directive extraction, sitemap XML
//! parsing, the work-queue resolver that walks index trees through a
//! bounded worker pool, and the aggregator that deduplicates the merged
//! result.

mod aggregate;
mod parser;
mod resolver;
mod robots;

pub use aggregate::aggregate;
pub use parser::{parse_sitemap, ParseError, ParsedSitemap, SitemapEntry};
pub use resolver::resolve;
pub use robots::{is_robots_url, sitemaps_from_robots};

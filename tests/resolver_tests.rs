//! Integration tests for sitemap discovery
//!
//! These tests use wiremock to stand up mock newspaper sites and exercise
//! the full resolve → aggregate → classify pipeline end-to-end.

use chrono::{TimeZone, Utc};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mediaeye::config::Config;
use mediaeye::fetch::build_http_client;
use mediaeye::model::{Category, CrawlTarget, UrlRecord};
use mediaeye::sitemap::{aggregate, resolve};
use mediaeye::discover;

fn test_config() -> Config {
    // RUST_LOG=mediaeye=debug surfaces the crawl trace when a test fails
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let mut config = Config::default();
    // Short timeouts keep the fault-injection tests fast
    config.fetch.timeout_secs = 5;
    config.fetch.recursive_timeout_secs = 1;
    config
}

fn urlset(locs: &[(&str, Option<&str>)]) -> String {
    let mut body = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for (loc, lastmod) in locs {
        body.push_str("  <url>\n");
        body.push_str(&format!("    <loc>{}</loc>\n", loc));
        if let Some(lm) = lastmod {
            body.push_str(&format!("    <lastmod>{}</lastmod>\n", lm));
        }
        body.push_str("  </url>\n");
    }
    body.push_str("</urlset>\n");
    body
}

fn sitemap_index(locs: &[&str]) -> String {
    let mut body = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <sitemapindex xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for loc in locs {
        body.push_str(&format!("  <sitemap><loc>{}</loc></sitemap>\n", loc));
    }
    body.push_str("</sitemapindex>\n");
    body
}

fn gzip(payload: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(payload.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

fn xml_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "application/xml")
}

fn discovered_urls(rows: &[UrlRecord]) -> Vec<&str> {
    rows.iter().filter_map(|r| r.url.as_deref()).collect()
}

#[tokio::test]
async fn index_with_two_leaves_merges_all_rows() {
    let server = MockServer::start().await;
    let uri = server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml_response(sitemap_index(&[
            &format!("{}/sitemap-news.xml", uri),
            &format!("{}/sitemap-sports.xml", uri),
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sitemap-news.xml"))
        .respond_with(xml_response(urlset(&[
            ("https://paper.example.edu/news/story-1", None),
            ("https://paper.example.edu/news/story-2", None),
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sitemap-sports.xml"))
        .respond_with(xml_response(urlset(&[(
            "https://paper.example.edu/sports/game-1",
            None,
        )])))
        .mount(&server)
        .await;

    let config = test_config();
    let client = build_http_client(&config.user_agent).unwrap();
    let target = CrawlTarget::new(format!("{}/sitemap.xml", uri));

    let rows = resolve(&client, &config, &target).await.unwrap();

    assert_eq!(rows.iter().filter(|r| !r.is_error()).count(), 3);
    assert!(rows.iter().all(|r| !r.is_error()));
}

#[tokio::test]
async fn duplicate_urls_across_leaves_collapse_after_aggregation() {
    let server = MockServer::start().await;
    let uri = server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml_response(sitemap_index(&[
            &format!("{}/a.xml", uri),
            &format!("{}/b.xml", uri),
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/a.xml"))
        .respond_with(xml_response(urlset(&[
            ("https://paper.example.edu/news/shared", Some("2024-01-01")),
            ("https://paper.example.edu/news/only-a", None),
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/b.xml"))
        .respond_with(xml_response(urlset(&[
            ("https://paper.example.edu/news/shared", Some("2024-06-01")),
            ("https://paper.example.edu/news/only-b", None),
        ])))
        .mount(&server)
        .await;

    let config = test_config();
    let client = build_http_client(&config.user_agent).unwrap();
    let target = CrawlTarget::new(format!("{}/sitemap.xml", uri));

    let rows = aggregate(resolve(&client, &config, &target).await.unwrap());

    // 2 + 2 rows minus the one shared URL
    assert_eq!(rows.len(), 3);
    let shared = rows
        .iter()
        .find(|r| r.url.as_deref() == Some("https://paper.example.edu/news/shared"))
        .unwrap();
    // lastmod takes the maximum observed across duplicates
    assert_eq!(
        shared.lastmod,
        Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
    );
}

#[tokio::test]
async fn self_referential_index_yields_warning_row_not_a_loop() {
    let server = MockServer::start().await;
    let uri = server.uri();
    let index_url = format!("{}/sitemap.xml", uri);

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml_response(sitemap_index(&[
            &index_url,
            &format!("{}/leaf.xml", uri),
        ])))
        // The self-referential entry must not trigger a second fetch
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/leaf.xml"))
        .respond_with(xml_response(urlset(&[(
            "https://paper.example.edu/news/story",
            None,
        )])))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config();
    let client = build_http_client(&config.user_agent).unwrap();
    let target = CrawlTarget::new(&index_url);

    let rows = resolve(&client, &config, &target).await.unwrap();

    let warnings: Vec<&UrlRecord> = rows.iter().filter(|r| r.is_error()).collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].sitemap, index_url);
    assert!(warnings[0]
        .errors
        .as_deref()
        .unwrap()
        .contains("link to itself"));

    assert_eq!(
        discovered_urls(&rows),
        vec!["https://paper.example.edu/news/story"]
    );
}

#[tokio::test]
async fn leaf_timeout_produces_error_row_while_siblings_survive() {
    let server = MockServer::start().await;
    let uri = server.uri();
    let slow_url = format!("{}/slow.xml", uri);

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml_response(sitemap_index(&[
            &slow_url,
            &format!("{}/fast.xml", uri),
        ])))
        .mount(&server)
        .await;

    // Stalls past the 1s recursive timeout
    Mock::given(method("GET"))
        .and(path("/slow.xml"))
        .respond_with(
            xml_response(urlset(&[("https://paper.example.edu/news/too-late", None)]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/fast.xml"))
        .respond_with(xml_response(urlset(&[
            ("https://paper.example.edu/news/on-time-1", None),
            ("https://paper.example.edu/news/on-time-2", None),
        ])))
        .mount(&server)
        .await;

    let config = test_config();
    let client = build_http_client(&config.user_agent).unwrap();
    let target = CrawlTarget::new(format!("{}/sitemap.xml", uri));

    let rows = resolve(&client, &config, &target).await.unwrap();

    let errors: Vec<&UrlRecord> = rows.iter().filter(|r| r.is_error()).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].sitemap, slow_url);

    assert_eq!(
        discovered_urls(&rows),
        vec![
            "https://paper.example.edu/news/on-time-1",
            "https://paper.example.edu/news/on-time-2"
        ]
    );
}

#[tokio::test]
async fn gzip_compressed_sitemap_is_transparently_decompressed() {
    let server = MockServer::start().await;
    let uri = server.uri();

    let body = urlset(&[("https://paper.example.edu/news/zipped-story", None)]);
    Mock::given(method("GET"))
        .and(path("/sitemap.xml.gz"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(gzip(&body), "application/gzip"))
        .mount(&server)
        .await;

    let config = test_config();
    let client = build_http_client(&config.user_agent).unwrap();
    let target = CrawlTarget::new(format!("{}/sitemap.xml.gz", uri));

    let rows = resolve(&client, &config, &target).await.unwrap();

    assert_eq!(
        discovered_urls(&rows),
        vec!["https://paper.example.edu/news/zipped-story"]
    );
    // The recorded document size reflects the compressed payload
    assert!(rows[0].sitemap_size_mb > 0.0);
}

#[tokio::test]
async fn non_gzip_bytes_at_gz_url_become_a_parse_error_row() {
    let server = MockServer::start().await;
    let uri = server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml.gz"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("definitely not xml", "application/gzip"),
        )
        .mount(&server)
        .await;

    let config = test_config();
    let client = build_http_client(&config.user_agent).unwrap();
    let target = CrawlTarget::new(format!("{}/sitemap.xml.gz", uri));

    let rows = resolve(&client, &config, &target).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert!(rows[0].is_error());
    assert_eq!(rows[0].sitemap, format!("{}/sitemap.xml.gz", uri));
}

#[tokio::test]
async fn watermark_drops_stale_rows_and_keeps_fresh_ones() {
    let server = MockServer::start().await;
    let uri = server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml_response(urlset(&[
            ("https://paper.example.edu/news/stale", Some("2020-01-01")),
            ("https://paper.example.edu/news/fresh", Some("2024-06-01")),
        ])))
        .mount(&server)
        .await;

    let config = test_config();
    let client = build_http_client(&config.user_agent).unwrap();
    let target = CrawlTarget::new(format!("{}/sitemap.xml", uri))
        .with_watermark(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());

    let rows = resolve(&client, &config, &target).await.unwrap();

    assert_eq!(
        discovered_urls(&rows),
        vec!["https://paper.example.edu/news/fresh"]
    );
}

#[tokio::test]
async fn watermark_date_parameter_skips_the_fetch_entirely() {
    let server = MockServer::start().await;
    let uri = server.uri();

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml_response(sitemap_index(&[
            &format!("{}/feed.xml?date=2020-01-01", uri),
            &format!("{}/feed.xml?date=2024-06-01", uri),
        ])))
        .mount(&server)
        .await;

    // Only the fresh dated feed may be requested
    Mock::given(method("GET"))
        .and(path("/feed.xml"))
        .respond_with(xml_response(urlset(&[(
            "https://paper.example.edu/news/recent",
            None,
        )])))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config();
    let client = build_http_client(&config.user_agent).unwrap();
    let target = CrawlTarget::new(format!("{}/sitemap.xml", uri))
        .with_watermark(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap());

    let rows = resolve(&client, &config, &target).await.unwrap();

    assert_eq!(
        discovered_urls(&rows),
        vec!["https://paper.example.edu/news/recent"]
    );
}

#[tokio::test]
async fn robots_txt_directives_drive_discovery() {
    let server = MockServer::start().await;
    let uri = server.uri();

    let robots = format!(
        "User-agent: *\nDisallow: /admin\nSitemap: {}/sitemap-a.xml\nSitemap: {}/sitemap-b.xml\n",
        uri, uri
    );
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(robots))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sitemap-a.xml"))
        .respond_with(xml_response(urlset(&[(
            "https://paper.example.edu/news/from-a",
            None,
        )])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sitemap-b.xml"))
        .respond_with(xml_response(urlset(&[(
            "https://paper.example.edu/sports/from-b",
            None,
        )])))
        .mount(&server)
        .await;

    let config = test_config();
    let client = build_http_client(&config.user_agent).unwrap();
    let target = CrawlTarget::new(format!("{}/robots.txt", uri));

    let rows = resolve(&client, &config, &target).await.unwrap();

    let mut urls = discovered_urls(&rows);
    urls.sort();
    assert_eq!(
        urls,
        vec![
            "https://paper.example.edu/news/from-a",
            "https://paper.example.edu/sports/from-b"
        ]
    );
}

#[tokio::test]
async fn missing_robots_txt_yields_empty_result_not_an_error() {
    let server = MockServer::start().await;
    let uri = server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let config = test_config();
    let client = build_http_client(&config.user_agent).unwrap();
    let target = CrawlTarget::new(format!("{}/robots.txt", uri));

    let rows = resolve(&client, &config, &target).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn discover_classifies_every_discovered_row() {
    let server = MockServer::start().await;
    let uri = server.uri();

    // Bare site URL: robots.txt is missing, sitemap.xml exists
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .respond_with(xml_response(urlset(&[
            ("https://paper.example.edu/news/big-story", Some("2024-06-01")),
            ("https://paper.example.edu/staff_name/jane-doe", None),
            ("https://paper.example.edu/ads/homecoming-special", None),
            ("https://paper.example.edu/tag/football", None),
            ("https://paper.example.edu/mystery-section/item", None),
            ("https://paper.example.edu/", None),
        ])))
        .mount(&server)
        .await;

    let config = test_config();
    let client = build_http_client(&config.user_agent).unwrap();
    let target = CrawlTarget::new(uri.clone());

    let rows = discover(&client, &config, &target).await.unwrap();

    let judgment = |url: &str| {
        let row = rows
            .iter()
            .find(|r| r.url.as_deref() == Some(url))
            .unwrap_or_else(|| panic!("missing row for {}", url));
        (row.filter_status.unwrap(), row.is_filtered.unwrap())
    };

    assert_eq!(
        judgment("https://paper.example.edu/news/big-story"),
        (Category::Article, true)
    );
    assert_eq!(
        judgment("https://paper.example.edu/staff_name/jane-doe"),
        (Category::Staff, true)
    );
    assert_eq!(
        judgment("https://paper.example.edu/ads/homecoming-special"),
        (Category::Advertisement, true)
    );
    assert_eq!(
        judgment("https://paper.example.edu/tag/football"),
        (Category::Tag, true)
    );
    assert_eq!(
        judgment("https://paper.example.edu/mystery-section/item"),
        (Category::Article, false)
    );
    assert_eq!(
        judgment("https://paper.example.edu/"),
        (Category::MissingSegment, false)
    );

    // Every discovered row carries its bookkeeping columns
    for row in rows.iter().filter(|r| !r.is_error()) {
        assert!(row.sitemap.ends_with("/sitemap.xml"));
        assert!(row.sitemap_size_mb > 0.0);
        assert!(row.time_filtered.is_some());
    }
}

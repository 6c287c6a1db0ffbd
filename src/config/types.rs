use serde::Deserialize;

/// Main configuration structure for mediaeye
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub vocabulary: VocabularyConfig,
}

/// Fetch policy configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Width of the bounded worker pool for sibling sitemap fetches
    #[serde(rename = "max-workers", default = "default_max_workers")]
    pub max_workers: usize,

    /// Timeout in seconds for the top-level fetch
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Timeout in seconds for recursive sub-sitemap fetches; lower than the
    /// top-level timeout so one hung worker cannot starve its siblings
    #[serde(
        rename = "recursive-timeout-secs",
        default = "default_recursive_timeout_secs"
    )]
    pub recursive_timeout_secs: u64,
}

fn default_max_workers() -> usize {
    8
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_recursive_timeout_secs() -> u64 {
    15
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            timeout_secs: default_timeout_secs(),
            recursive_timeout_secs: default_recursive_timeout_secs(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email", default)]
    pub contact_email: String,
}

fn default_crawler_name() -> String {
    "mediaeye".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: String::new(),
            contact_email: String::new(),
        }
    }
}

/// Category vocabulary configuration.
///
/// Each list maps first path segments to a content category. The lists are
/// configuration data, not code: extending the classification policy for a
/// new site's path vocabulary means editing the config file, not the
/// classifier.
#[derive(Debug, Clone, Deserialize)]
pub struct VocabularyConfig {
    /// Segments marking tag listing pages
    #[serde(rename = "tag-dirs", default = "default_tag_dirs")]
    pub tag_dirs: Vec<String>,

    /// Segments marking advertisement or sponsored content
    #[serde(rename = "ad-dirs", default = "default_ad_dirs")]
    pub ad_dirs: Vec<String>,

    /// Segments marking staff or author profile pages
    #[serde(rename = "staff-dirs", default = "default_staff_dirs")]
    pub staff_dirs: Vec<String>,

    /// Known article section names
    #[serde(rename = "article-dirs", default = "default_article_dirs")]
    pub article_dirs: Vec<String>,

    /// Four-digit years treated as archive-date article segments,
    /// inclusive on both ends
    #[serde(rename = "article-year-min", default = "default_article_year_min")]
    pub article_year_min: u32,
    #[serde(rename = "article-year-max", default = "default_article_year_max")]
    pub article_year_max: u32,
}

fn default_tag_dirs() -> Vec<String> {
    vec_of(&["tag"])
}

fn default_ad_dirs() -> Vec<String> {
    vec_of(&["ads", "sponsored"])
}

fn default_staff_dirs() -> Vec<String> {
    vec_of(&["staff_name", "author", "staff_profile", "authors"])
}

// Section names observed across the college newspaper corpus. Categorization
// of the long tail is ongoing; unknown sections default to article-unfiltered
// so nothing is silently discarded while the list grows.
fn default_article_dirs() -> Vec<String> {
    vec_of(&[
        "news",
        "sports",
        "uncategorized",
        "archives",
        "news-stories",
        "opinion",
        "articles",
        "sports-stories",
        "features",
        "article",
        "blog",
        "lifestyles",
        "opinions-stories",
        "culture",
        "flipbook_page",
        "category",
        "campus-news",
        "post",
        "life_and_culture-stories",
        "lifestyle",
        "uganews",
        "featured",
        "multimedia",
        "variety",
        "athensnews",
        "people",
        "new-blog",
        "local",
        "arts_and_entertainment",
        "viewpoint",
        "library",
        "index.php",
        "blogs",
        "arts-life",
        "views",
        "arts",
        "the_companion",
        "p",
        "arts-and-life",
        "special-sections",
        "academics",
        "scene",
        "buzz-stories",
        "stories",
        "opinions",
        "entertainment",
        "perspective",
        "feature",
        "arts-and-culture",
        "gameday",
        "event",
        "cops",
        "campus",
        "story_segment",
        "reviews",
        "ac",
        "top-stories",
        "archive",
        "af",
        "offices",
        "funnies",
        "eat-drink",
        "section",
    ])
}

fn default_article_year_min() -> u32 {
    1970
}

fn default_article_year_max() -> u32 {
    2029
}

fn vec_of(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            tag_dirs: default_tag_dirs(),
            ad_dirs: default_ad_dirs(),
            staff_dirs: default_staff_dirs(),
            article_dirs: default_article_dirs(),
            article_year_min: default_article_year_min(),
            article_year_max: default_article_year_max(),
        }
    }
}

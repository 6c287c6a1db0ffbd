//! URL classification by first path segment
//!
//! A pure, table-driven lookup: the first path segment is checked against
//! the vocabulary tables in priority order (tag, advertisement, staff,
//! known article sections), first match wins. Unknown segments classify
//! optimistically as articles but stay unfiltered, so unseen section names
//! are never silently discarded while the vocabulary grows.

use chrono::Utc;
use std::collections::HashSet;

use crate::classify::segments::segment_url;
use crate::config::VocabularyConfig;
use crate::model::{Category, UrlRecord};

/// Compiled vocabulary tables, built once from configuration and shared
/// read-only across the crawl
#[derive(Debug, Clone)]
pub struct Vocabulary {
    tag_dirs: HashSet<String>,
    ad_dirs: HashSet<String>,
    staff_dirs: HashSet<String>,
    article_dirs: HashSet<String>,
}

impl Vocabulary {
    /// Compiles the configured tables, extending the article sections with
    /// every four-digit year in the configured range (archive-date segments
    /// like `/2022/06/story` classify as articles)
    pub fn from_config(config: &VocabularyConfig) -> Self {
        let mut article_dirs: HashSet<String> =
            config.article_dirs.iter().cloned().collect();
        for year in config.article_year_min..=config.article_year_max {
            article_dirs.insert(year.to_string());
        }

        Self {
            tag_dirs: config.tag_dirs.iter().cloned().collect(),
            ad_dirs: config.ad_dirs.iter().cloned().collect(),
            staff_dirs: config.staff_dirs.iter().cloned().collect(),
            article_dirs,
        }
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::from_config(&VocabularyConfig::default())
    }
}

/// Classifies a URL by its first path segment
///
/// Pure function: no network or database access, deterministic given the
/// vocabulary tables. Returns the category and whether the decision is a
/// confident one (`is_filtered`). Unknown segments default to
/// `(Article, false)`; a missing first segment is `(MissingSegment, false)`.
pub fn classify(dir_1: Option<&str>, vocabulary: &Vocabulary) -> (Category, bool) {
    let Some(dir_1) = dir_1 else {
        return (Category::MissingSegment, false);
    };

    if vocabulary.tag_dirs.contains(dir_1) {
        return (Category::Tag, true);
    }
    if vocabulary.ad_dirs.contains(dir_1) {
        return (Category::Advertisement, true);
    }
    if vocabulary.staff_dirs.contains(dir_1) {
        return (Category::Staff, true);
    }
    if vocabulary.article_dirs.contains(dir_1) {
        return (Category::Article, true);
    }

    // Optimistic default: unrecognized sections are assumed article-like
    // but flagged unfiltered until the vocabulary catches up
    (Category::Article, false)
}

/// Applies segmentation and classification to every non-error row
///
/// Stamps `dir_1..dir_5`, `last_dir`, `filter_status`, `is_filtered`, and
/// the classification timestamp in place. Error rows are left untouched.
pub fn apply_filter_status(rows: &mut [UrlRecord], vocabulary: &Vocabulary) {
    let now = Utc::now();

    for row in rows.iter_mut() {
        let Some(url) = row.url.as_deref() else {
            continue;
        };

        let segments = segment_url(url);
        row.dir_1 = segments.dir(1).map(str::to_string);
        row.dir_2 = segments.dir(2).map(str::to_string);
        row.dir_3 = segments.dir(3).map(str::to_string);
        row.dir_4 = segments.dir(4).map(str::to_string);
        row.dir_5 = segments.dir(5).map(str::to_string);
        row.last_dir = segments.last_dir().map(str::to_string);

        let (category, is_filtered) = classify(segments.dir(1), vocabulary);
        row.filter_status = Some(category);
        row.is_filtered = Some(is_filtered);
        row.time_filtered = Some(now);
    }
}

use crate::config::site::PAGE_EXTENSION;
use crate::domain::model::RaceSlug;
use crate::utils::error::{HarvestError, Result};
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeSet;

/// Recognises links to race pages of one season.
///
/// Both `/en/2025/abou-dhabi/classement.aspx` and `/en/2025/abou-dhabi.aspx`
/// yield `abou-dhabi`. Only site-relative hrefs are considered.
pub struct SlugMatcher {
    pattern: Regex,
}

impl SlugMatcher {
    pub fn for_year(year: u16) -> Result<Self> {
        let pattern = Regex::new(&format!(
            r"^/en/{}/([a-z0-9\-]+)(?:/|{})",
            year,
            regex::escape(PAGE_EXTENSION)
        ))
        .map_err(|e| HarvestError::Parse {
            message: format!("slug pattern: {}", e),
        })?;
        Ok(Self { pattern })
    }

    pub fn match_href(&self, href: &str) -> Option<RaceSlug> {
        let caps = self.pattern.captures(href.trim())?;
        RaceSlug::parse(caps.get(1)?.as_str())
    }
}

/// Collects the unique race slugs linked from `html`, sorted.
pub fn discover_slugs(html: &str, year: u16) -> Result<Vec<RaceSlug>> {
    let matcher = SlugMatcher::for_year(year)?;
    let anchors = Selector::parse("a[href]").map_err(|e| HarvestError::Parse {
        message: e.to_string(),
    })?;

    let document = Html::parse_document(html);
    let slugs: BTreeSet<RaceSlug> = document
        .select(&anchors)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| matcher.match_href(href))
        .collect();

    tracing::debug!("Matched {} unique race slugs", slugs.len());
    Ok(slugs.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(slugs: &[RaceSlug]) -> Vec<&str> {
        slugs.iter().map(RaceSlug::as_str).collect()
    }

    #[test]
    fn test_discovers_both_link_shapes_and_skips_malformed() {
        let html = r#"
            <html><body>
              <a href="/en/2025/abou-dhabi/classement.aspx">Abu Dhabi</a>
              <a href="/en/2025/las-vegas.aspx">Las Vegas</a>
              <a href="/en/2025/../x.aspx">broken</a>
            </body></html>
        "#;

        let slugs = discover_slugs(html, 2025).unwrap();
        assert_eq!(names(&slugs), vec!["abou-dhabi", "las-vegas"]);
    }

    #[test]
    fn test_deduplicates_and_sorts() {
        let html = r#"
            <a href="/en/2025/qatar/grille.aspx">grid</a>
            <a href="/en/2025/bahrein/">bahrain</a>
            <a href=" /en/2025/qatar/classement.aspx ">padded</a>
            <a href="/en/2025/qatar.aspx">qatar</a>
            <a>no href</a>
            <a href="/en/2025/Monaco/classement.aspx">uppercase</a>
        "#;

        let slugs = discover_slugs(html, 2025).unwrap();
        assert_eq!(names(&slugs), vec!["bahrein", "qatar"]);
    }

    #[test]
    fn test_ignores_other_years_and_absolute_links() {
        let html = r#"
            <a href="/en/2024/monaco/classement.aspx">last year</a>
            <a href="https://www.statsf1.com/en/2025/monaco/classement.aspx">absolute</a>
            <a href="/en/2025/monaco">no terminator</a>
            <a href="/fr/2025/monaco/classement.aspx">french</a>
        "#;

        assert!(discover_slugs(html, 2025).unwrap().is_empty());
    }

    #[test]
    fn test_slug_must_be_followed_by_separator_or_extension() {
        let matcher = SlugMatcher::for_year(2025).unwrap();
        assert_eq!(
            matcher.match_href("/en/2025/japon/").map(|s| s.to_string()),
            Some("japon".to_string())
        );
        assert!(matcher.match_href("/en/2025/japon.html").is_none());
        assert!(matcher.match_href("/en/2025/ja pon/").is_none());
    }
}

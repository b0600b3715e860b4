use crate::config::site::PAGE_EXTENSION;
use std::collections::HashSet;

pub const MAX_SHEET_NAME_LEN: usize = 31;
const FORBIDDEN: [char; 7] = [':', '\\', '/', '?', '*', '[', ']'];

/// Replaces characters spreadsheets reject with `-` and cuts the name to
/// 31 characters.
pub fn sanitize_sheet_name(name: &str) -> String {
    name.chars()
        .map(|c| if FORBIDDEN.contains(&c) { '-' } else { c })
        .take(MAX_SHEET_NAME_LEN)
        .collect()
}

/// `{slug}_{page}_{index}` with the page extension dropped, sanitized.
pub fn table_sheet_name(slug: &str, page: &str, index: usize) -> String {
    let page = page.strip_suffix(PAGE_EXTENSION).unwrap_or(page);
    sanitize_sheet_name(&format!("{}_{}_{}", slug, page, index))
}

/// Hands out sheet names that are unique within one workbook.
///
/// Names compare case-insensitively. A taken name gets a `~2`, `~3`, ...
/// suffix, cutting the base so the result still fits in 31 characters.
#[derive(Debug, Default)]
pub struct SheetNamer {
    taken: HashSet<String>,
}

impl SheetNamer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, name: &str) -> String {
        let base = sanitize_sheet_name(name);
        if self.taken.insert(base.to_lowercase()) {
            return base;
        }

        let mut n = 2usize;
        loop {
            let suffix = format!("~{}", n);
            let keep = MAX_SHEET_NAME_LEN.saturating_sub(suffix.chars().count());
            let candidate: String = base.chars().take(keep).chain(suffix.chars()).collect();
            if self.taken.insert(candidate.to_lowercase()) {
                tracing::debug!("Sheet name '{}' already used, renamed to '{}'", base, candidate);
                return candidate;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forbidden_characters_are_replaced() {
        assert_eq!(sanitize_sheet_name("a:b\\c/d?e*f[g]h"), "a-b-c-d-e-f-g-h");
    }

    #[test]
    fn test_truncates_to_31_characters() {
        let long = "emilie-romagne_tour-par-tour_12";
        assert_eq!(long.chars().count(), 31);
        assert_eq!(sanitize_sheet_name(long), long);

        let longer = "grand-prix-de-las-vegas_tour-par-tour_1";
        let sanitized = sanitize_sheet_name(longer);
        assert_eq!(sanitized, "grand-prix-de-las-vegas_tour-pa");
        assert_eq!(sanitized.chars().count(), MAX_SHEET_NAME_LEN);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for name in [
            "abou-dhabi_classement_1",
            "x[1]:y/z?*",
            "éèêëéèêëéèêëéèêëéèêëéèêëéèêëéèêë/",
            "",
        ] {
            let once = sanitize_sheet_name(name);
            assert_eq!(sanitize_sheet_name(&once), once);
            assert!(once.chars().count() <= MAX_SHEET_NAME_LEN);
            assert!(!once.contains(FORBIDDEN));
        }
    }

    #[test]
    fn test_table_sheet_name() {
        assert_eq!(
            table_sheet_name("abou-dhabi", "classement.aspx", 1),
            "abou-dhabi_classement_1"
        );
        assert_eq!(
            table_sheet_name("abou-dhabi", "meilleur-tour.aspx", 2),
            "abou-dhabi_meilleur-tour_2"
        );
    }

    #[test]
    fn test_namer_disambiguates_collisions() {
        let mut namer = SheetNamer::new();
        assert_eq!(namer.claim("RunLog"), "RunLog");
        assert_eq!(namer.claim("runlog"), "runlog~2");

        let a = namer.claim("grand-prix-de-las-vegas_tour-par-tour_1");
        let b = namer.claim("grand-prix-de-las-vegas_tour-par-tour_2");
        assert_eq!(a, "grand-prix-de-las-vegas_tour-pa");
        assert_eq!(b, "grand-prix-de-las-vegas_tour-~2");
        assert!(b.chars().count() <= MAX_SHEET_NAME_LEN);

        let c = namer.claim("grand-prix-de-las-vegas_tour-par-tour_3");
        assert_eq!(c, "grand-prix-de-las-vegas_tour-~3");
    }
}

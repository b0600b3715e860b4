use crate::utils::error::{HarvestError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: impl ToString, reason: impl Into<String>) -> HarvestError {
    HarvestError::InvalidConfigValue {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid(field_name, url_str, format!("Invalid URL format: {}", e))),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }

    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

/// Page names are single path segments such as `classement.aspx`.
pub fn validate_page_name(field_name: &str, page: &str) -> Result<()> {
    validate_non_empty_string(field_name, page)?;
    if page.contains(['/', '?', '#']) || page.chars().any(char::is_whitespace) {
        return Err(invalid(
            field_name,
            page,
            "Page must be a single path segment without query or whitespace",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("site.base_url", "https://www.statsf1.com").is_ok());
        assert!(validate_url("site.base_url", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("site.base_url", "").is_err());
        assert!(validate_url("site.base_url", "statsf1.com").is_err());
        assert!(validate_url("site.base_url", "ftp://statsf1.com").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("season.year", 2025u16, 1950, 2100).is_ok());
        assert!(validate_range("season.year", 1949u16, 1950, 2100).is_err());
    }

    #[test]
    fn test_validate_page_name() {
        assert!(validate_page_name("pages.harvest", "tour-par-tour.aspx").is_ok());
        assert!(validate_page_name("pages.harvest", "en/2025.aspx").is_err());
        assert!(validate_page_name("pages.harvest", "grille.aspx?x=1").is_err());
        assert!(validate_page_name("pages.harvest", "  ").is_err());
    }
}

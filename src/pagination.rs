//! Page parameters and the pagination response headers.

use axum::http::{header::HeaderName, HeaderMap, HeaderValue};
use serde::Deserialize;

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 1000;

/// Query parameters shared by list endpoints: `?page=&size=&sort=field,dir`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort: Option<String>,
}

impl PageParams {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(0).max(0)
    }

    pub fn size(&self) -> i64 {
        self.size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE)
    }

    /// Resolve the sort parameter against a column whitelist. Unknown
    /// columns and malformed directions fall back to ascending id.
    pub fn sort_for(&self, allowed: &[&str]) -> (String, &'static str) {
        let Some(sort) = &self.sort else {
            return ("id".to_string(), "ASC");
        };
        let mut parts = sort.splitn(2, ',');
        let column = parts.next().unwrap_or("id");
        let direction = match parts.next() {
            Some(d) if d.eq_ignore_ascii_case("desc") => "DESC",
            _ => "ASC",
        };
        if allowed.contains(&column) {
            (column.to_string(), direction)
        } else {
            ("id".to_string(), "ASC")
        }
    }
}

/// One page of results plus the totals needed for response headers.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_count: i64,
    pub page: i64,
    pub size: i64,
}

impl<T> Page<T> {
    pub fn total_pages(&self) -> i64 {
        if self.total_count == 0 {
            0
        } else {
            (self.total_count + self.size - 1) / self.size
        }
    }
}

/// Build the X-Total-Count and Link headers for a page response. The sort
/// parameter is carried into the link targets so following a rel keeps the
/// requested order.
pub fn page_headers<T>(path: &str, sort: Option<&str>, page: &Page<T>) -> HeaderMap {
    let mut headers = HeaderMap::new();

    if let Ok(v) = HeaderValue::from_str(&page.total_count.to_string()) {
        headers.insert(HeaderName::from_static("x-total-count"), v);
    }

    let last = (page.total_pages() - 1).max(0);
    let mut links = Vec::new();
    if page.page < last {
        links.push(link_entry(path, page.page + 1, page.size, sort, "next"));
    }
    if page.page > 0 {
        links.push(link_entry(path, page.page - 1, page.size, sort, "prev"));
    }
    links.push(link_entry(path, last, page.size, sort, "last"));
    links.push(link_entry(path, 0, page.size, sort, "first"));

    if let Ok(v) = HeaderValue::from_str(&links.join(",")) {
        headers.insert(axum::http::header::LINK, v);
    }

    headers
}

fn link_entry(path: &str, page: i64, size: i64, sort: Option<&str>, rel: &str) -> String {
    let sort = sort.map(|s| format!("&sort={}", s)).unwrap_or_default();
    format!("<{}?page={}&size={}{}>; rel=\"{}\"", path, page, size, sort, rel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_params_missing() {
        let params = PageParams::default();
        assert_eq!(params.page(), 0);
        assert_eq!(params.size(), DEFAULT_PAGE_SIZE);
        assert_eq!(params.sort_for(&["id"]), ("id".to_string(), "ASC"));
    }

    #[test]
    fn sort_parses_column_and_direction() {
        let params = PageParams {
            sort: Some("job_title,desc".to_string()),
            ..Default::default()
        };
        assert_eq!(
            params.sort_for(&["id", "job_title"]),
            ("job_title".to_string(), "DESC")
        );
    }

    #[test]
    fn unknown_sort_column_falls_back_to_id() {
        let params = PageParams {
            sort: Some("salary; DROP TABLE job,desc".to_string()),
            ..Default::default()
        };
        assert_eq!(params.sort_for(&["id", "job_title"]), ("id".to_string(), "ASC"));
    }

    #[test]
    fn size_is_clamped() {
        let params = PageParams {
            size: Some(1_000_000),
            ..Default::default()
        };
        assert_eq!(params.size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn headers_carry_total_count_and_links() {
        let page = Page::<i64> {
            content: vec![1, 2],
            total_count: 5,
            page: 1,
            size: 2,
        };
        let headers = page_headers("/api/jobs", None, &page);
        assert_eq!(headers.get("x-total-count").unwrap(), "5");
        let link = headers.get("link").unwrap().to_str().unwrap();
        assert!(link.contains("rel=\"next\""));
        assert!(link.contains("rel=\"prev\""));
        assert!(link.contains("rel=\"first\""));
        assert!(link.contains("rel=\"last\""));
    }

    #[test]
    fn first_page_has_no_prev_link() {
        let page = Page::<i64> {
            content: vec![],
            total_count: 2,
            page: 0,
            size: 2,
        };
        let headers = page_headers("/api/jobs", None, &page);
        let link = headers.get("link").unwrap().to_str().unwrap();
        assert!(!link.contains("rel=\"prev\""));
    }

    #[test]
    fn links_preserve_the_sort_parameter() {
        let page = Page::<i64> {
            content: vec![],
            total_count: 4,
            page: 1,
            size: 2,
        };
        let headers = page_headers("/api/jobs", Some("id,desc"), &page);
        let link = headers.get("link").unwrap().to_str().unwrap();
        assert!(link.contains("</api/jobs?page=0&size=2&sort=id,desc>; rel=\"prev\""));
    }
}

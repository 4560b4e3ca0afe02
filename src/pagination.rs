use serde::Serialize;

/// Forums shown per page on the home and search listings.
pub const PAGE_SIZE: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

impl Page {
    /// Page numbers start at 1; anything lower is treated as the first page.
    pub fn new(number: u32) -> Self {
        Self {
            number: number.max(1),
            size: PAGE_SIZE,
        }
    }

    /// Lenient parse of a `?page=` value: missing or unparseable means 1.
    pub fn parse(raw: Option<&str>) -> Self {
        let number = raw
            .and_then(|s| s.trim().parse::<u32>().ok())
            .unwrap_or(1);
        Self::new(number)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.number - 1) * i64::from(self.size)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.size)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1)
    }
}

pub fn total_pages(total: i64, size: u32) -> i64 {
    let size = i64::from(size.max(1));
    (total.max(0) + size - 1) / size
}

/// One page of results plus what a client needs to render pagination.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub forums: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    pub fn new(forums: Vec<T>, total: i64, page: Page) -> Self {
        Self {
            forums,
            total,
            page: page.number,
            page_size: page.size,
            total_pages: total_pages(total, page.size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_follow_page_number() {
        assert_eq!(Page::new(1).offset(), 0);
        assert_eq!(Page::new(2).offset(), 6);
        assert_eq!(Page::new(3).offset(), 12);
        assert_eq!(Page::new(3).limit(), 6);
    }

    #[test]
    fn zero_is_first_page() {
        assert_eq!(Page::new(0), Page::new(1));
    }

    #[test]
    fn parse_is_lenient() {
        assert_eq!(Page::parse(None).number, 1);
        assert_eq!(Page::parse(Some("")).number, 1);
        assert_eq!(Page::parse(Some("abc")).number, 1);
        assert_eq!(Page::parse(Some("-3")).number, 1);
        assert_eq!(Page::parse(Some("0")).number, 1);
        assert_eq!(Page::parse(Some(" 4 ")).number, 4);
    }

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0, 6), 0);
        assert_eq!(total_pages(6, 6), 1);
        assert_eq!(total_pages(7, 6), 2);
        assert_eq!(total_pages(13, 6), 3);
    }

    #[test]
    fn paginated_serializes_camel_case() {
        let page = Paginated::new(vec![1, 2, 3], 13, Page::new(3));
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["totalPages"], 3);
        assert_eq!(json["pageSize"], 6);
        assert_eq!(json["page"], 3);
    }
}

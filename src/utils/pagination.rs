use serde::Deserialize;
use utoipa::IntoParams;

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

/// Page-based query parameters accepted by every list endpoint. The HTTP
/// layer clamps these before they reach a store; stores bind limit/offset
/// as given.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct Pagination {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl Pagination {
    /// Clamp to `page >= 1`, `1 <= limit <= 100` and convert to the
    /// LIMIT/OFFSET pair the stores bind.
    pub fn limit_offset(&self) -> (i64, i64) {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let page = self.page.unwrap_or(1).max(1);
        (limit, (page - 1) * limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_first_page() {
        assert_eq!(Pagination::default().limit_offset(), (20, 0));
    }

    #[test]
    fn offset_follows_page() {
        let p = Pagination {
            page: Some(3),
            limit: Some(10),
        };
        assert_eq!(p.limit_offset(), (10, 20));
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let p = Pagination {
            page: Some(0),
            limit: Some(-5),
        };
        assert_eq!(p.limit_offset(), (1, 0));

        let p = Pagination {
            page: Some(-2),
            limit: Some(5000),
        };
        assert_eq!(p.limit_offset(), (100, 0));
    }
}

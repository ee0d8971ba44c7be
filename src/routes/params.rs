use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    /// Page number, default 1
    pub page: Option<i64>,
    /// Items per page, default 20, at most 100
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }

    /// `(offset, limit)` for slicing an in-memory collection.
    pub fn window(&self) -> (usize, usize) {
        let (_, per_page, offset) = self.normalize();
        (
            usize::try_from(offset).unwrap_or(usize::MAX),
            usize::try_from(per_page).unwrap_or(100),
        )
    }
}

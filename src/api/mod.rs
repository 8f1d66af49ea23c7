pub mod attendance;
pub mod employee;
pub mod leave_request;
pub mod payroll;

use crate::error::ApiError;

/// A validated page window for `LIMIT ? OFFSET ?` queries.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Page {
    pub page: u32,
    pub per_page: u32,
    pub offset: u64,
}

/// Resolves client pagination parameters; `per_page` is clamped to 1..=100.
pub(crate) fn paginate(
    page: Option<u64>,
    per_page: Option<u64>,
    default_per_page: u64,
) -> Result<Page, ApiError> {
    let per_page = per_page.unwrap_or(default_per_page).clamp(1, 100);
    let page = u32::try_from(page.unwrap_or(1).max(1))
        .map_err(|_| ApiError::BadRequest("page is too large".into()))?;

    let offset = u64::from(page - 1)
        .checked_mul(per_page)
        .ok_or_else(|| ApiError::BadRequest("page is too large".into()))?;

    Ok(Page {
        page,
        per_page: per_page as u32,
        offset,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_clamps() {
        assert_eq!(
            paginate(None, None, 31).unwrap(),
            Page { page: 1, per_page: 31, offset: 0 }
        );
        assert_eq!(
            paginate(Some(0), Some(0), 10).unwrap(),
            Page { page: 1, per_page: 1, offset: 0 }
        );
        assert_eq!(
            paginate(Some(3), Some(500), 10).unwrap(),
            Page { page: 3, per_page: 100, offset: 200 }
        );
    }

    #[test]
    fn huge_page_is_rejected_not_overflowed() {
        let err = paginate(Some(u64::MAX), Some(100), 10).unwrap_err();
        assert_eq!(err.to_string(), "page is too large");

        let err = paginate(Some(u64::from(u32::MAX) + 1), None, 10).unwrap_err();
        assert_eq!(err.to_string(), "page is too large");
    }

    #[test]
    fn largest_page_fits() {
        let page = paginate(Some(u64::from(u32::MAX)), Some(100), 10).unwrap();
        assert_eq!(page.page, u32::MAX);
        assert_eq!(page.offset, (u64::from(u32::MAX) - 1) * 100);
    }
}

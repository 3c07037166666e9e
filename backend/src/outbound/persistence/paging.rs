//! `OFFSET`/`LIMIT` values for a [`PageRequest`].
//!
//! PostgreSQL takes both as `BIGINT`; values beyond `i64::MAX` saturate.

use pagination::PageRequest;

pub(crate) fn offset(page: PageRequest) -> i64 {
    i64::try_from(page.offset()).unwrap_or(i64::MAX)
}

pub(crate) fn limit(page: PageRequest) -> i64 {
    i64::try_from(page.limit()).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0, 10, 0)]
    #[case(9, 10, 0)]
    #[case(25, 10, 20)]
    fn offset_starts_at_the_containing_page(
        #[case] from: i64,
        #[case] size: i64,
        #[case] expected: i64,
    ) {
        let page = PageRequest::new(from, size).expect("valid page");
        assert_eq!(offset(page), expected);
        assert_eq!(limit(page), size);
    }
}

//! Offset pagination primitives for docvault collection endpoints.
//!
//! Collection endpoints accept `limit`, `offset`, and a sort direction from
//! the client. [`PageRequest::parse`] validates the raw query-string values,
//! [`PageRequest::normalize`] applies defaults to values that are already
//! known to be well formed, and [`PageMetadata`] derives the page counters
//! returned alongside each page of rows.
//!
//! Rows are always sorted by creation time; only the direction varies.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Page size used when the client does not ask for one.
pub const DEFAULT_LIMIT: NonZeroU32 = match NonZeroU32::new(20) {
    Some(limit) => limit,
    None => NonZeroU32::MIN,
};

/// Offset used when the client does not ask for one.
pub const DEFAULT_OFFSET: u32 = 0;

/// Sort direction applied to the creation timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    /// Oldest rows first.
    Asc,
    /// Newest rows first.
    #[default]
    Desc,
}

impl SortOrder {
    /// Interpret a client-supplied direction.
    ///
    /// Anything other than an explicit `ASC` (compared case-insensitively)
    /// falls back to [`SortOrder::Desc`].
    ///
    /// # Examples
    /// ```
    /// use pagination::SortOrder;
    ///
    /// assert_eq!(SortOrder::from_client(Some("asc")), SortOrder::Asc);
    /// assert_eq!(SortOrder::from_client(Some("sideways")), SortOrder::Desc);
    /// assert_eq!(SortOrder::from_client(None), SortOrder::Desc);
    /// ```
    #[must_use]
    pub fn from_client(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if value.trim().eq_ignore_ascii_case("asc") => Self::Asc,
            _ => Self::Desc,
        }
    }
}

/// Validation failures for raw pagination parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// `limit` was not a positive whole number.
    #[error("Only positive number is allowed for limit value")]
    InvalidLimit {
        /// Value as supplied by the client.
        value: String,
    },
    /// `offset` was not a non-negative whole number.
    #[error("Only positive number is allowed for offset value")]
    InvalidOffset {
        /// Value as supplied by the client.
        value: String,
    },
}

impl PaginationError {
    /// Name of the offending query parameter.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidLimit { .. } => "limit",
            Self::InvalidOffset { .. } => "offset",
        }
    }

    /// Raw value that failed validation.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::InvalidLimit { value } | Self::InvalidOffset { value } => value.as_str(),
        }
    }
}

/// Normalised pagination parameters for one collection query.
///
/// ## Invariants
/// - `limit` is at least one.
/// - The sort key is always the creation timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    limit: NonZeroU32,
    offset: u32,
    order: SortOrder,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::normalize(None, None, None)
    }
}

impl PageRequest {
    /// Apply defaults to already-validated parameters.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageRequest, SortOrder};
    ///
    /// let page = PageRequest::normalize(None, None, None);
    /// assert_eq!(page.limit(), 20);
    /// assert_eq!(page.offset(), 0);
    /// assert_eq!(page.order(), SortOrder::Desc);
    /// ```
    #[must_use]
    pub fn normalize(
        limit: Option<NonZeroU32>,
        offset: Option<u32>,
        order: Option<SortOrder>,
    ) -> Self {
        Self {
            limit: limit.unwrap_or(DEFAULT_LIMIT),
            offset: offset.unwrap_or(DEFAULT_OFFSET),
            order: order.unwrap_or_default(),
        }
    }

    /// Validate raw query-string values and normalise them.
    ///
    /// Blank values are treated as absent. `limit` must be a whole number of
    /// at least one, `offset` a whole number of at least zero; signs,
    /// fractions, and other characters are rejected.
    ///
    /// # Errors
    /// Returns [`PaginationError`] naming the first invalid parameter.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageRequest, PaginationError, SortOrder};
    ///
    /// let page = PageRequest::parse(Some("5"), Some("10"), Some("ASC"))?;
    /// assert_eq!((page.limit(), page.offset()), (5, 10));
    /// assert_eq!(page.order(), SortOrder::Asc);
    ///
    /// assert!(PageRequest::parse(Some("-1"), None, None).is_err());
    /// # Ok::<(), PaginationError>(())
    /// ```
    pub fn parse(
        raw_limit: Option<&str>,
        raw_offset: Option<&str>,
        raw_order: Option<&str>,
    ) -> Result<Self, PaginationError> {
        let limit = match non_blank(raw_limit) {
            Some(value) => Some(
                parse_whole_number(value)
                    .and_then(NonZeroU32::new)
                    .ok_or_else(|| PaginationError::InvalidLimit {
                        value: value.to_owned(),
                    })?,
            ),
            None => None,
        };
        let offset = match non_blank(raw_offset) {
            Some(value) => Some(parse_whole_number(value).ok_or_else(|| {
                PaginationError::InvalidOffset {
                    value: value.to_owned(),
                }
            })?),
            None => None,
        };
        Ok(Self::normalize(
            limit,
            offset,
            Some(SortOrder::from_client(raw_order)),
        ))
    }

    /// Maximum number of rows in the page.
    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit.get()
    }

    /// Number of rows skipped before the page starts.
    #[must_use]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Direction applied to the creation timestamp.
    #[must_use]
    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// Derive page counters for a query that matched `total` rows.
    #[must_use]
    pub fn metadata(&self, total: u64) -> PageMetadata {
        PageMetadata::new(total, self)
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|value| !value.is_empty())
}

fn parse_whole_number(value: &str) -> Option<u32> {
    if !value.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// Page counters returned next to a page of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// Number of pages needed to show every matching row.
    pub page_count: u64,
    /// One-based index of the page that starts at the requested offset.
    pub page: u64,
    /// Requested page size.
    pub page_size: u32,
    /// Number of rows matching the query, ignoring pagination.
    pub total_count: u64,
}

impl PageMetadata {
    /// Compute counters for `total` matching rows.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageMetadata, PageRequest};
    ///
    /// let request = PageRequest::parse(Some("10"), Some("20"), None)?;
    /// let meta = PageMetadata::new(45, &request);
    /// assert_eq!(meta.page_count, 5);
    /// assert_eq!(meta.page, 3);
    /// # Ok::<(), pagination::PaginationError>(())
    /// ```
    #[must_use]
    pub fn new(total: u64, request: &PageRequest) -> Self {
        let limit = u64::from(request.limit());
        Self {
            page_count: total.div_ceil(limit),
            page: current_page(request.offset(), request.limit()),
            page_size: request.limit(),
            total_count: total,
        }
    }
}

fn current_page(offset: u32, limit: u32) -> u64 {
    u64::from(offset)
        .checked_div(u64::from(limit))
        .unwrap_or_default()
        .saturating_add(1)
}

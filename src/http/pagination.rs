//! Query-string pagination parameters.

use crate::sql::PageRequest;
use crate::sql::page::{DEFAULT_LIMIT, DEFAULT_PAGE};
use crate::task::validation::{FieldError, ValidationErrors};
use serde::Deserialize;
use std::num::NonZeroU32;

/// Raw `page` and `limit` query parameters.
///
/// Values are kept as text: absent or non-numeric values fall back to the
/// defaults, while numeric values outside `1..=u32::MAX` are rejected.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PageParams {
    page: Option<String>,
    limit: Option<String>,
}

impl PageParams {
    /// Creates parameters from optional raw values.
    #[must_use]
    pub const fn new(page: Option<String>, limit: Option<String>) -> Self {
        Self { page, limit }
    }

    /// Converts the parameters into a page request.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] naming every numeric parameter that is
    /// below one or above `u32::MAX`.
    pub fn to_page_request(&self) -> Result<PageRequest, ValidationErrors> {
        let mut errors = Vec::new();
        let page = bounded("page", self.page.as_deref(), DEFAULT_PAGE, &mut errors);
        let limit = bounded("limit", self.limit.as_deref(), DEFAULT_LIMIT, &mut errors);
        ValidationErrors::check(errors)?;
        Ok(PageRequest::new(page, limit))
    }
}

fn bounded(
    name: &str,
    raw: Option<&str>,
    default: NonZeroU32,
    errors: &mut Vec<FieldError>,
) -> NonZeroU32 {
    let Some(value) = raw.and_then(|text| text.trim().parse::<i64>().ok()) else {
        return default;
    };
    if value < 1 {
        errors.push(query_error(
            name,
            "ensure this value is greater than or equal to 1",
        ));
        return default;
    }
    match u32::try_from(value).ok().and_then(NonZeroU32::new) {
        Some(parsed) => parsed,
        None => {
            errors.push(query_error(
                name,
                format!("ensure this value is less than or equal to {}", u32::MAX),
            ));
            default
        }
    }
}

fn query_error(name: &str, message: impl Into<String>) -> FieldError {
    FieldError {
        location: vec!["query".to_owned(), name.to_owned()],
        message: message.into(),
    }
}

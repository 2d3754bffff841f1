//! Cursor state for walking through listings page by page.

use crate::client::request::Parameters;
use crate::models::Listing;

/// Which neighbour page the paginator asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageDirection {
    #[default]
    Forward,
    Backward,
}

/// Pagination cursors owned by the caller.
///
/// The paginator is borrowed when a listing request is built, so its cursors
/// are captured at that moment. After a successful response the caller feeds
/// the listing back through [`Paginator::update`] before asking for the next
/// page.
///
/// ```
/// use redstream::models::{Listing, Paginator};
/// use std::collections::BTreeMap;
///
/// let mut paginator = Paginator::new();
/// paginator.update(&Listing {
///     children: Vec::new(),
///     before: None,
///     after: Some("t3_xyz".to_string()),
/// });
///
/// let mut params = BTreeMap::new();
/// paginator.add_parameters(&mut params);
/// assert_eq!(params.get("after").map(String::as_str), Some("t3_xyz"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paginator {
    before: Option<String>,
    after: Option<String>,
    count: u32,
    direction: PageDirection,
    fetched: bool,
}

impl Paginator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cursors(before: Option<String>, after: Option<String>, count: u32) -> Self {
        Self {
            before,
            after,
            count,
            direction: PageDirection::Forward,
            fetched: false,
        }
    }

    pub fn before(&self) -> Option<&str> {
        self.before.as_deref()
    }

    pub fn after(&self) -> Option<&str> {
        self.after.as_deref()
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn direction(&self) -> PageDirection {
        self.direction
    }

    pub fn set_direction(&mut self, direction: PageDirection) {
        self.direction = direction;
    }

    /// True when no cursor is held, i.e. the next request fetches the first page.
    pub fn is_vacant(&self) -> bool {
        self.before.is_none() && self.after.is_none()
    }

    /// True when the last listing said there is nothing further in the current direction.
    ///
    /// Only a listing fed through [`Paginator::update`] can exhaust the
    /// paginator, so an empty page with no cursor ends the walk.
    pub fn is_exhausted(&self) -> bool {
        self.fetched
            && match self.direction {
                PageDirection::Forward => self.after.is_none(),
                PageDirection::Backward => self.before.is_none(),
            }
    }

    /// Add the cursor for the current direction and the running count.
    pub fn add_parameters(&self, parameters: &mut Parameters) {
        let cursor = match self.direction {
            PageDirection::Forward => self.after.as_ref().map(|c| ("after", c)),
            PageDirection::Backward => self.before.as_ref().map(|c| ("before", c)),
        };
        if let Some((name, value)) = cursor {
            parameters.insert(name.to_string(), value.clone());
        }
        if self.count > 0 {
            parameters.insert("count".to_string(), self.count.to_string());
        }
    }

    /// Record the cursors of a freshly received listing.
    pub fn update(&mut self, listing: &Listing) {
        self.before = listing.before.clone();
        self.after = listing.after.clone();
        let seen = u32::try_from(listing.children.len()).unwrap_or(u32::MAX);
        self.count = self.count.saturating_add(seen);
        self.fetched = true;
    }

    pub fn reset(&mut self) {
        *self = Self {
            direction: self.direction,
            ..Self::default()
        };
    }
}

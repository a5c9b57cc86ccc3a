use std::collections::HashSet;

use roster_logging::{roster_debug, roster_info, roster_warn};

use crate::fallback::{FallbackPolicy, UsersFallback};
use crate::{FetchError, Generation, PageWindow, User, UserId, UsersPage};

pub const DEFAULT_PAGE_SIZE: u32 = 6;

/// A page fetch issued by the accumulator. Results are matched back by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub generation: Generation,
    pub page: u32,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    /// First page failed: the list is empty and "show more" is hidden.
    Blocking(FetchError),
    /// A later page failed: loaded users are kept.
    LoadMore(FetchError),
}

impl ListError {
    pub fn fetch_error(&self) -> &FetchError {
        match self {
            ListError::Blocking(err) | ListError::LoadMore(err) => err,
        }
    }
}

/// Single owner of the loaded user sequence and its page window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListAccumulator {
    page_size: u32,
    users: Vec<User>,
    seen: HashSet<UserId>,
    window: Option<PageWindow>,
    generation: Generation,
    in_flight: Option<PageRequest>,
    reload_pending: bool,
    error: Option<ListError>,
    fallback: FallbackPolicy,
}

impl Default for ListAccumulator {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ListAccumulator {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            users: Vec::new(),
            seen: HashSet::new(),
            window: None,
            generation: 0,
            in_flight: None,
            reload_pending: false,
            error: None,
            fallback: FallbackPolicy,
        }
    }

    /// Starts a full reload from page 1.
    ///
    /// Any in-flight request becomes stale. If one is pending, page 1 is issued
    /// only after it settles, so two replacing loads never race.
    pub fn load_first_page(&mut self) -> Option<PageRequest> {
        self.generation += 1;
        if let Some(pending) = self.in_flight {
            roster_debug!(
                "Reload deferred until page {} (generation {}) settles",
                pending.page,
                pending.generation
            );
            self.reload_pending = true;
            return None;
        }
        Some(self.issue(1))
    }

    /// Requests the page after the current one. Returns `None` without touching
    /// state when nothing is loaded, the last page is reached, or a request is
    /// already in flight.
    pub fn load_next_page(&mut self) -> Option<PageRequest> {
        if self.in_flight.is_some() || self.reload_pending {
            roster_debug!("Load more ignored: a page request is already in flight");
            return None;
        }
        let window = self.window.filter(PageWindow::has_more)?;
        Some(self.issue(window.current_page() + 1))
    }

    /// Applies the result of `request`. Returns a follow-up request when a
    /// deferred reload can now start.
    pub fn apply(
        &mut self,
        request: PageRequest,
        result: Result<UsersPage, FetchError>,
    ) -> Option<PageRequest> {
        if self.in_flight != Some(request) {
            roster_debug!("Dropping result for unknown page request {:?}", request);
            return None;
        }
        self.in_flight = None;

        if request.generation != self.generation {
            roster_debug!(
                "Dropping stale page {} from generation {} (current {})",
                request.page,
                request.generation,
                self.generation
            );
            if self.reload_pending {
                self.reload_pending = false;
                return Some(self.issue(1));
            }
            return None;
        }

        match result {
            Ok(page) => self.accept(request.page, page),
            Err(err) => self.reject(request.page, err),
        }
        None
    }

    fn issue(&mut self, page: u32) -> PageRequest {
        let request = PageRequest {
            generation: self.generation,
            page,
            count: self.page_size,
        };
        self.in_flight = Some(request);
        request
    }

    fn accept(&mut self, page_number: u32, page: UsersPage) {
        if page_number == 1 {
            self.users.clear();
            self.seen.clear();
        }
        let received = page.users.len();
        let before = self.users.len();
        for user in page.users {
            if self.seen.insert(user.id) {
                self.users.push(user);
            }
        }
        let skipped = received - (self.users.len() - before);
        if skipped > 0 {
            roster_debug!("Skipped {} already listed users on page {}", skipped, page_number);
        }
        let window = PageWindow::new(page_number, page.total_pages);
        roster_info!(
            "Loaded users page {}/{} ({} received, {} total)",
            window.current_page(),
            window.total_pages(),
            received,
            self.users.len()
        );
        self.window = Some(window);
        self.error = None;
    }

    fn reject(&mut self, page_number: u32, err: FetchError) {
        roster_warn!("Failed to load users page {}: {}", page_number, err);
        match self.fallback.users(page_number) {
            UsersFallback::ClearAndBlock => {
                self.users.clear();
                self.seen.clear();
                self.window = None;
                self.error = Some(ListError::Blocking(err));
            }
            UsersFallback::KeepLoaded => {
                self.error = Some(ListError::LoadMore(err));
            }
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn window(&self) -> Option<PageWindow> {
        self.window
    }

    /// "Show more" visibility.
    pub fn has_more(&self) -> bool {
        self.window.is_some_and(|window| window.has_more())
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<PageRequest> {
        self.in_flight
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn error(&self) -> Option<&ListError> {
        self.error.as_ref()
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }
}

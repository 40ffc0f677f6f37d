//! Headless view-model for the movie list/search screen: server-driven
//! sort, client-side pagination in fixed windows, and search-as-you-type
//! state. Rendering is left to whatever presentation layer sits on top.

use crate::auth::policy::{can, Action, Denial};
use crate::auth::repo::PublicUser;
use crate::movies::dto::MovieWithCreator;

pub const PAGE_SIZE: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Search,
}

/// What the driver should do after a state transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Fetch the sorted list from the server.
    FetchSorted { sort_by: String, order: String },
    /// Arm the debounce timer; search fires after the quiet period.
    ScheduleSearch { query: String },
    /// Search immediately, bypassing the debounce (form submit).
    SearchNow { query: String },
}

/// Edit/delete affordances for one movie card, derived from the same
/// capability check the server enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieControls {
    /// Viewer is an admin and the record's creator.
    Editable,
    /// Viewer is an admin but not the creator.
    NotYours,
    /// Regular users and signed-out viewers see nothing.
    Hidden,
}

pub struct CatalogView {
    sort_by: String,
    order: String,
    query: String,
    mode: Mode,
    browse: Vec<MovieWithCreator>,
    results: Vec<MovieWithCreator>,
    page: usize,
}

impl Default for CatalogView {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogView {
    pub fn new() -> Self {
        Self {
            sort_by: "name".into(),
            order: "asc".into(),
            query: String::new(),
            mode: Mode::Browse,
            browse: Vec::new(),
            results: Vec::new(),
            page: 1,
        }
    }

    pub fn initial_fetch(&self) -> Effect {
        Effect::FetchSorted {
            sort_by: self.sort_by.clone(),
            order: self.order.clone(),
        }
    }

    /// Switching sort resets to page 1 and cancels any active search.
    pub fn on_sort_change(&mut self, sort_by: &str) -> Effect {
        self.sort_by = sort_by.to_string();
        self.leave_search();
        self.initial_fetch()
    }

    pub fn on_order_change(&mut self, order: &str) -> Effect {
        self.order = order.to_string();
        self.leave_search();
        self.initial_fetch()
    }

    /// A keystroke in the search box. Clearing the field reverts to the
    /// sorted list with no server round trip; otherwise the search is
    /// scheduled behind the debounce.
    pub fn on_query_change(&mut self, query: &str) -> Effect {
        self.query = query.to_string();
        if self.query.trim().is_empty() {
            self.mode = Mode::Browse;
            self.page = 1;
            return Effect::None;
        }
        self.mode = Mode::Search;
        Effect::ScheduleSearch {
            query: self.query.clone(),
        }
    }

    /// Submitting the form searches immediately.
    pub fn on_submit(&mut self) -> Effect {
        if self.query.trim().is_empty() {
            self.mode = Mode::Browse;
            self.page = 1;
            return Effect::None;
        }
        self.mode = Mode::Search;
        Effect::SearchNow {
            query: self.query.clone(),
        }
    }

    pub fn on_movies_loaded(&mut self, movies: Vec<MovieWithCreator>) {
        self.browse = movies;
        self.page = 1;
    }

    pub fn on_search_results(&mut self, movies: Vec<MovieWithCreator>) {
        self.results = movies;
        self.page = 1;
    }

    fn leave_search(&mut self) {
        self.query.clear();
        self.results.clear();
        self.mode = Mode::Browse;
        self.page = 1;
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort(&self) -> (&str, &str) {
        (&self.sort_by, &self.order)
    }

    fn current_list(&self) -> &[MovieWithCreator] {
        match self.mode {
            Mode::Browse => &self.browse,
            Mode::Search => &self.results,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.current_list().len().div_ceil(PAGE_SIZE).max(1)
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.page_count());
    }

    /// The fixed-size window of movies for the current page.
    pub fn visible(&self) -> &[MovieWithCreator] {
        let list = self.current_list();
        let start = (self.page - 1) * PAGE_SIZE;
        let end = (start + PAGE_SIZE).min(list.len());
        if start >= list.len() {
            &[]
        } else {
            &list[start..end]
        }
    }

    /// Ownership-aware rendering decision, backed by the shared capability
    /// check.
    pub fn controls_for(
        viewer: Option<&PublicUser>,
        movie: &MovieWithCreator,
    ) -> MovieControls {
        let Some(user) = viewer else {
            return MovieControls::Hidden;
        };
        match can(
            user.role,
            user.id,
            Action::EditMovie {
                added_by: movie.added_by.id,
            },
        ) {
            Ok(()) => MovieControls::Editable,
            Err(Denial::NotOwner) => MovieControls::NotYours,
            Err(Denial::NotAdmin) => MovieControls::Hidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repo::Role;
    use time::macros::{date, datetime};
    use uuid::Uuid;

    fn user(role: Role) -> PublicUser {
        PublicUser {
            id: Uuid::new_v4(),
            username: "viewer".into(),
            email: "viewer@example.com".into(),
            role,
        }
    }

    fn movie(n: usize, added_by: &PublicUser) -> MovieWithCreator {
        MovieWithCreator {
            id: Uuid::new_v4(),
            name: format!("Movie {n}"),
            description: "Ten characters at least.".into(),
            rating: 7.0,
            release_date: date!(2024 - 05 - 01),
            duration: 100,
            added_by: added_by.clone(),
            created_at: datetime!(2024-05-02 10:00 UTC),
            updated_at: datetime!(2024-05-02 10:00 UTC),
        }
    }

    fn movies(n: usize) -> Vec<MovieWithCreator> {
        let creator = user(Role::Admin);
        (0..n).map(|i| movie(i, &creator)).collect()
    }

    #[test]
    fn paginates_in_windows_of_eight() {
        let mut view = CatalogView::new();
        view.on_movies_loaded(movies(20));
        assert_eq!(view.page_count(), 3);
        assert_eq!(view.visible().len(), 8);
        view.set_page(3);
        assert_eq!(view.visible().len(), 4);
        assert_eq!(view.visible()[0].name, "Movie 16");
    }

    #[test]
    fn set_page_clamps_to_valid_range() {
        let mut view = CatalogView::new();
        view.on_movies_loaded(movies(5));
        view.set_page(99);
        assert_eq!(view.page(), 1);
        assert_eq!(view.page_count(), 1);
    }

    #[test]
    fn empty_list_still_has_one_page() {
        let view = CatalogView::new();
        assert_eq!(view.page_count(), 1);
        assert!(view.visible().is_empty());
    }

    #[test]
    fn sort_change_resets_page_and_cancels_search() {
        let mut view = CatalogView::new();
        view.on_movies_loaded(movies(20));
        view.set_page(2);
        assert_eq!(view.on_query_change("zone"), Effect::ScheduleSearch { query: "zone".into() });
        assert_eq!(view.mode(), Mode::Search);

        let effect = view.on_sort_change("rating");
        assert_eq!(
            effect,
            Effect::FetchSorted {
                sort_by: "rating".into(),
                order: "asc".into()
            }
        );
        assert_eq!(view.mode(), Mode::Browse);
        assert_eq!(view.page(), 1);
        assert!(view.query().is_empty());
    }

    #[test]
    fn submit_bypasses_debounce() {
        let mut view = CatalogView::new();
        view.on_query_change("stalker");
        assert_eq!(
            view.on_submit(),
            Effect::SearchNow {
                query: "stalker".into()
            }
        );
    }

    #[test]
    fn clearing_query_reverts_without_refetch() {
        let mut view = CatalogView::new();
        view.on_movies_loaded(movies(10));
        view.on_query_change("solaris");
        view.on_search_results(Vec::new());
        assert!(view.visible().is_empty());

        assert_eq!(view.on_query_change(""), Effect::None);
        assert_eq!(view.mode(), Mode::Browse);
        assert_eq!(view.visible().len(), 8);
    }

    #[test]
    fn controls_matrix() {
        let creator = user(Role::Admin);
        let m = movie(0, &creator);

        assert_eq!(
            CatalogView::controls_for(Some(&creator), &m),
            MovieControls::Editable
        );
        let other_admin = user(Role::Admin);
        assert_eq!(
            CatalogView::controls_for(Some(&other_admin), &m),
            MovieControls::NotYours
        );
        let regular = user(Role::User);
        assert_eq!(
            CatalogView::controls_for(Some(&regular), &m),
            MovieControls::Hidden
        );
        assert_eq!(CatalogView::controls_for(None, &m), MovieControls::Hidden);
    }
}

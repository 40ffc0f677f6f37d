//! Headless client for the catalog API: session handling, the request
//! layer, and the list/search view-model. Presentation is out of scope;
//! this module carries every behavior a UI shell needs to wire up.

pub mod api;
pub mod catalog;
pub mod debounce;
pub mod session;

pub use api::{ApiClient, ClientError};
pub use catalog::{CatalogView, Effect, Mode, MovieControls, PAGE_SIZE};
pub use debounce::{Debouncer, SEARCH_DEBOUNCE};
pub use session::Session;

//! Client library for the Kabinet personal-account service.
//!
//! Layers, bottom up:
//! - [`session`]: the persisted session slot (token + user snapshot),
//!   loaded once at startup and written explicitly on login/logout.
//! - [`api_client`]: the reqwest core — URL building, bearer headers,
//!   uniform error mapping.
//! - [`auth_api`] / [`users_api`]: the two request groups, each read
//!   registering under a cache tag and each write invalidating the tags it
//!   affects.
//! - [`query_cache`]: the tag-invalidation cache backing the reads.
//! - [`profile`]: the aggregate view-model a front-end consumes.

pub mod api_client;
pub mod auth_api;
pub mod error;
pub mod profile;
pub mod query_cache;
pub mod session;
pub mod users_api;

pub use api_client::ApiClient;
pub use auth_api::AuthApi;
pub use error::ApiError;
pub use profile::ProfileViewModel;
pub use query_cache::{QueryCache, Tag};
pub use session::{SessionStore, StoredSession};
pub use users_api::UsersApi;

pub mod auth_service;
pub use auth_service::{AccessToken, AuthError, AuthService, CurrentUser, Registration};

pub mod auth_service_impl;
pub use auth_service_impl::SeaOrmAuthService;

pub mod catalog_service;
pub use catalog_service::{CatalogError, CatalogService};

pub mod catalog_service_impl;
pub use catalog_service_impl::SeaOrmCatalogService;

pub mod ingest;
pub use ingest::{IngestError, LoadOutcome};

pub mod jwt;
pub use jwt::TokenKeys;

pub mod show_filter;

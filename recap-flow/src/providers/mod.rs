//! Concrete backends for the metadata and language-model seams.

#[cfg(feature = "rig")]
pub mod openrouter;
pub mod tmdb;

#[cfg(feature = "rig")]
pub use openrouter::OpenRouterModel;
pub use tmdb::{PosterSize, StillSize, TmdbProvider, poster_url, still_url};

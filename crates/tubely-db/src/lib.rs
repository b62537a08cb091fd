//! Tubely database layer
//!
//! The thumbnail pipeline only needs keyed lookup and update of video records,
//! expressed by the [`VideoStore`] trait. [`PgVideoRepository`] is the Postgres
//! implementation used by the server; [`InMemoryVideoRepository`] backs tests and
//! local runs without a database.

pub mod memory;
pub mod video;

pub use memory::InMemoryVideoRepository;
pub use video::{PgVideoRepository, VideoStore};

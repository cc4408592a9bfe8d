//! SQL repositories. Each repo is a zero-sized type with associated
//! functions taking a `&PgPool`.

pub mod project_repo;

pub use project_repo::ProjectRepo;

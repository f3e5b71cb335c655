//! Repository layer over the visit tables

pub(crate) mod rows;
mod visit_repo;

pub use visit_repo::VisitRepo;

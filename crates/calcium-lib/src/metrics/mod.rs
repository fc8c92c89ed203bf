pub mod area;
pub mod summary;

pub mod achievements;
pub mod categories;
pub mod gallery;
pub mod media;
pub mod store;
pub mod users;

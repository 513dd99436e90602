pub mod catalog;
pub mod images;
pub mod jobs;
pub mod stories;

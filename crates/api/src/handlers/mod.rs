pub mod files;
pub mod project;
pub mod project_image;
pub mod tags;
pub mod upload;
pub mod yarn;

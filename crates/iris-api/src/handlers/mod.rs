pub mod analysis;
pub mod health;
pub mod images;
pub mod upload;

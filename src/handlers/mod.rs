pub mod images;
pub mod welcome;

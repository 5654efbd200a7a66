pub mod merge;
pub mod price;
pub mod quantity;

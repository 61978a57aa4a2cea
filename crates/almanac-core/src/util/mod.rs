pub mod timestamp;
pub mod url;

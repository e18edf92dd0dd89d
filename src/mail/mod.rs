pub mod body;
pub mod mime;

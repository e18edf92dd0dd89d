pub mod label_ids;
pub mod labels;
pub mod messages;
pub mod send;

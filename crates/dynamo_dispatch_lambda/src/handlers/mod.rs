pub mod dispatch;
pub mod operations;

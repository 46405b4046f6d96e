pub mod complete;
pub mod create;
pub mod list;
pub mod request_work;

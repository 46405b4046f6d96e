pub mod delete;
pub mod list;
pub mod reorder;
pub mod submit;

pub mod get;
pub mod post;

pub use get::get_classes;
pub use post::add_class;

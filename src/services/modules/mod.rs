pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

pub use create::create_module;
pub use delete::delete_module;
pub use get::get_module;
pub use list::list_modules;
pub use update::{set_module_active, update_module};

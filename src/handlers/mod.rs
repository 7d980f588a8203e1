pub mod api_handlers;
pub mod page_handlers;

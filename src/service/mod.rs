pub mod category_index;
pub mod merge;
pub mod presenter;
pub mod quote_store;
pub mod quotes_actor;
pub mod sync_agent;
pub mod transfer;
pub mod view;

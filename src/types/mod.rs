pub mod page;
pub mod quote;
pub mod remote;

pub use page::{CategoryFilter, CategoryOption, Notice, NoticeLevel, PageSnapshot, QuoteDisplay};
pub use quote::{NewQuote, Quote, default_quotes};
pub use remote::RemoteItem;

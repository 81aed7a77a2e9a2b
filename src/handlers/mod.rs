pub mod quotes;
pub mod sync;
pub mod transfer;

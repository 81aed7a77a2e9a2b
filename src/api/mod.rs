pub mod remote_api;

pub use remote_api::{HttpRemote, RemoteSource};

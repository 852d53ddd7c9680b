pub mod traits;

pub mod connectivity;
pub mod http;

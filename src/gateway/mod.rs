pub mod rest;
pub mod traits;

pub use rest::RestGateway;
pub use traits::Gateway;

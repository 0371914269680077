//! Services - use cases composed from the access policy and the ports.

mod posts;
mod users;

pub use posts::PostService;
pub use users::UserService;

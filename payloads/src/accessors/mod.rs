//! One accessor group per backend resource.
//!
//! Each operation returns `Result<Sourced<T>, ClientError>`. With demo mode
//! off, failures propagate. With demo mode on, any failure (network, HTTP
//! status, undecodable body) is logged and replaced by locally fabricated
//! data tagged [`Sourced::Fallback`](crate::Sourced::Fallback); the HTTP
//! interceptors have already run by then.

mod bookings;
mod services;
mod users;

pub use bookings::BookingsAPI;
pub use services::ServicesAPI;
pub use users::UsersAPI;

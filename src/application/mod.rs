//! Application layer containing the business logic behind each endpoint.
//!
//! Every service owns the ports it needs and returns a plain `Result`; the
//! HTTP layer decides what status code an error becomes. None of the services
//! hold state between calls, so a single instance is shared by all requests.

pub mod checkout;
pub mod notification;
pub mod reconciliation;

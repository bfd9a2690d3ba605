//! Domain types and the ports the application layer talks through.

pub mod order;
pub mod order_email;
pub mod payment;
pub mod ports;

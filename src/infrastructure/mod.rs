//! Adapters implementing the domain ports against concrete services.

pub mod gopay;
pub mod in_memory;
pub mod resend;
pub mod supabase;

pub mod admin_handler;
pub mod donor_handler;

pub mod auth;
pub mod blood_requests;
pub mod geo;

//! Bangladesh administrative geography (division → district → upazila).
//!
//! Static reference data embedded in the binary. Used to enumerate filter
//! options and to normalize location filters on blood request listings.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/geo/divisions` | List all divisions |
//! | GET | `/api/geo/divisions/{division}/districts` | List districts in a division |
//! | GET | `/api/geo/districts/{district}/upazilas` | List upazilas in a district |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::GeoService;

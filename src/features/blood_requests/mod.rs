//! Blood request lifecycle.
//!
//! Requests are submitted by any authenticated user and start `pending`.
//! Admins move them along `pending → active → fulfilled | cancelled`;
//! `fulfilled` and `cancelled` are terminal.
//!
//! | method | path                        | who       |
//! |--------|-----------------------------|-----------|
//! | GET    | `/api/admin/requests`       | admin     |
//! | PUT    | `/api/admin/requests`       | admin     |
//! | GET    | `/api/admin/requests/{id}`  | admin     |
//! | GET    | `/api/donor/requests`       | any user  |
//! | POST   | `/api/donor/requests`       | any user  |
//! | GET    | `/api/donor/requests/{id}`  | any user  |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::{
    BloodRequestRepository, InMemoryBloodRequestRepository, PgBloodRequestRepository,
};
pub use services::BloodRequestService;

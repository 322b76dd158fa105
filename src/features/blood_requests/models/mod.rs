mod blood_request;
mod request_query;

pub use blood_request::{
    BloodGroup, BloodRequest, BloodRequestStatus, NewBloodRequest, StatusTransition, Urgency,
};
pub use request_query::{PlaceMatch, RequestCounts, RequestQuery, StatusScope};

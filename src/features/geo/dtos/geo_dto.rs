use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::geo::models::{District, Division};

/// Response DTO for a division
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DivisionDto {
    pub name: String,
    pub district_count: usize,
}

impl From<&Division> for DivisionDto {
    fn from(d: &Division) -> Self {
        Self {
            name: d.name.clone(),
            district_count: d.districts.len(),
        }
    }
}

/// Response DTO for a district
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DistrictDto {
    pub name: String,
    pub division: String,
    pub upazila_count: usize,
}

impl DistrictDto {
    pub fn new(district: &District, division: &Division) -> Self {
        Self {
            name: district.name.clone(),
            division: division.name.clone(),
            upazila_count: district.upazilas.len(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DivisionListResponse {
    pub divisions: Vec<DivisionDto>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DistrictListResponse {
    pub districts: Vec<DistrictDto>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UpazilaListResponse {
    pub district: String,
    pub upazilas: Vec<String>,
}

use crate::core::error::{AppError, Result};
use crate::features::geo::dtos::{DistrictDto, DivisionDto};
use crate::features::geo::models::GeoDirectory;

const BANGLADESH_JSON: &str = include_str!("../data/bangladesh.json");

/// Read-only lookups over the administrative hierarchy
pub struct GeoService {
    directory: GeoDirectory,
}

impl GeoService {
    pub fn new(directory: GeoDirectory) -> Self {
        Self { directory }
    }

    /// Load the embedded Bangladesh dataset
    pub fn bangladesh() -> Result<Self> {
        let directory = GeoDirectory::from_json(BANGLADESH_JSON)
            .map_err(|e| AppError::Internal(format!("Invalid geo dataset: {}", e)))?;

        tracing::debug!(
            "Geo directory loaded: divisions={}, districts={}",
            directory.divisions.len(),
            directory.district_count()
        );

        Ok(Self::new(directory))
    }

    pub fn list_divisions(&self) -> Vec<DivisionDto> {
        self.directory.divisions.iter().map(DivisionDto::from).collect()
    }

    pub fn list_districts(&self, division: &str) -> Result<Vec<DistrictDto>> {
        let division = self
            .directory
            .division(division)
            .ok_or_else(|| AppError::NotFound(format!("Division '{}' not found", division)))?;

        Ok(division
            .districts
            .iter()
            .map(|d| DistrictDto::new(d, division))
            .collect())
    }

    /// Returns the canonical district name with its upazilas
    pub fn list_upazilas(&self, district: &str) -> Result<(String, Vec<String>)> {
        let found = self
            .directory
            .district(district, None)
            .ok_or_else(|| AppError::NotFound(format!("District '{}' not found", district)))?;

        Ok((found.name.clone(), found.upazilas.clone()))
    }

    /// Canonical division name, or `None` for unknown input
    pub fn normalize_division(&self, value: &str) -> Option<String> {
        self.directory.division(value).map(|d| d.name.clone())
    }

    /// Canonical district name; with a division, the district must belong to it
    pub fn normalize_district(&self, value: &str, division: Option<&str>) -> Option<String> {
        self.directory
            .district(value, division)
            .map(|d| d.name.clone())
    }

    /// Canonical division name with its aliases
    pub fn division_spellings(&self, value: &str) -> Option<(String, Vec<String>)> {
        self.directory
            .division(value)
            .map(|d| (d.name.clone(), d.aliases.clone()))
    }

    /// Canonical district name with its aliases
    pub fn district_spellings(
        &self,
        value: &str,
        division: Option<&str>,
    ) -> Option<(String, Vec<String>)> {
        self.directory
            .district(value, division)
            .map(|d| (d.name.clone(), d.aliases.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> GeoService {
        GeoService::bangladesh().unwrap()
    }

    #[test]
    fn test_embedded_dataset_is_complete() {
        let geo = service();
        assert_eq!(geo.list_divisions().len(), 8);
        assert_eq!(geo.directory.district_count(), 64);
    }

    #[test]
    fn test_list_districts_case_insensitive() {
        let districts = service().list_districts("sylhet").unwrap();
        let names: Vec<_> = districts.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Habiganj", "Moulvibazar", "Sunamganj", "Sylhet"]);
        assert!(districts.iter().all(|d| d.division == "Sylhet"));
    }

    #[test]
    fn test_unknown_division_is_not_found() {
        assert!(matches!(
            service().list_districts("Atlantis"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_list_upazilas() {
        let (district, upazilas) = service().list_upazilas("gazipur").unwrap();
        assert_eq!(district, "Gazipur");
        assert!(upazilas.contains(&"Kaliakair".to_string()));

        assert!(matches!(
            service().list_upazilas("Nowhere"),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_normalize_accepts_aliases() {
        let geo = service();
        assert_eq!(geo.normalize_division("chittagong").as_deref(), Some("Chattogram"));
        assert_eq!(geo.normalize_district("Comilla", None).as_deref(), Some("Cumilla"));
        assert_eq!(geo.normalize_division("Mars"), None);
    }

    #[test]
    fn test_spellings_include_aliases() {
        let geo = service();
        let (name, aliases) = geo.division_spellings("Chittagong").unwrap();
        assert_eq!(name, "Chattogram");
        assert!(aliases.contains(&"Chittagong".to_string()));

        let (name, aliases) = geo.district_spellings("cumilla", Some("chattogram")).unwrap();
        assert_eq!(name, "Cumilla");
        assert!(aliases.contains(&"Comilla".to_string()));
    }

    #[test]
    fn test_normalize_district_respects_division() {
        let geo = service();
        assert_eq!(
            geo.normalize_district("Gazipur", Some("Dhaka")).as_deref(),
            Some("Gazipur")
        );
        assert_eq!(geo.normalize_district("Gazipur", Some("Khulna")), None);
    }
}

use serde::Deserialize;

/// District with its upazilas (sub-districts)
#[derive(Debug, Clone, Deserialize)]
pub struct District {
    pub name: String,
    /// Older or alternate spellings, e.g. "Comilla" for "Cumilla"
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub upazilas: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Division {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    pub districts: Vec<District>,
}

/// Static division → district → upazila hierarchy
#[derive(Debug, Clone, Deserialize)]
pub struct GeoDirectory {
    pub divisions: Vec<Division>,
}

fn same_place(name: &str, aliases: &[String], value: &str) -> bool {
    let value = value.trim();
    name.eq_ignore_ascii_case(value) || aliases.iter().any(|a| a.eq_ignore_ascii_case(value))
}

impl Division {
    fn is(&self, value: &str) -> bool {
        same_place(&self.name, &self.aliases, value)
    }
}

impl District {
    fn is(&self, value: &str) -> bool {
        same_place(&self.name, &self.aliases, value)
    }
}

impl GeoDirectory {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn division(&self, value: &str) -> Option<&Division> {
        self.divisions.iter().find(|d| d.is(value))
    }

    /// Find a district, optionally restricted to one division
    pub fn district(&self, value: &str, division: Option<&str>) -> Option<&District> {
        let mut divisions: Box<dyn Iterator<Item = &Division>> = match division {
            Some(div) => Box::new(self.division(div).into_iter()),
            None => Box::new(self.divisions.iter()),
        };
        divisions.find_map(|d| d.districts.iter().find(|dist| dist.is(value)))
    }

    pub fn district_count(&self) -> usize {
        self.divisions.iter().map(|d| d.districts.len()).sum()
    }
}

use super::country::Country;
use super::repo::{Checker, ChildGuard, Entity, ParentLink, Repository};
use crate::error::Result;
use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

/// A city with its country (and that country's continent) joined in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub id: i64,
    pub name: String,
    pub population: i64,
    /// Decimal degrees, stored as entered.
    pub latitude: String,
    pub longitude: String,
    pub country_id: i64,
    pub country: Country,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CityInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub population: Option<i64>,
    #[serde(default)]
    pub latitude: String,
    #[serde(default)]
    pub longitude: String,
    #[serde(default)]
    pub country_id: Option<i64>,
}

impl Entity for City {
    type Input = CityInput;

    const KIND: &'static str = "city";
    const TABLE: &'static str = "cities";
    const ALIAS: &'static str = "ci";
    const SELECT: &'static str = "SELECT ci.id, ci.name, ci.population, ci.latitude, ci.longitude, \
        ci.country_id, co.id, co.name, co.population, co.official_language, co.currency, \
        co.continent_id, ct.id, ct.name, ct.description \
        FROM cities ci \
        JOIN countries co ON co.id = ci.country_id \
        JOIN continents ct ON ct.id = co.continent_id";
    const COLUMNS: &'static [&'static str] =
        &["name", "population", "latitude", "longitude", "country_id"];
    const PARENT: Option<ParentLink> = Some(ParentLink {
        column: "country_id",
        kind: "country",
    });
    const CHILDREN: Option<ChildGuard> = None;

    fn read(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(offset)?,
            name: row.get(offset + 1)?,
            population: row.get(offset + 2)?,
            latitude: row.get(offset + 3)?,
            longitude: row.get(offset + 4)?,
            country_id: row.get(offset + 5)?,
            country: Country::read(row, offset + 6)?,
        })
    }

    fn bind(input: &CityInput) -> Result<Vec<Value>> {
        let mut check = Checker::default();
        let values = vec![
            check.text("name", &input.name),
            check.population(input.population),
            check.degrees("latitude", &input.latitude, 90.0),
            check.degrees("longitude", &input.longitude, 180.0),
            check.reference("country_id", input.country_id),
        ];
        check.finish(values)
    }

    fn parent_id(input: &CityInput) -> Option<i64> {
        input.country_id
    }
}

impl Repository<'_, City> {
    /// Cities whose country belongs to the given continent.
    pub fn list_by_continent(&self, continent_id: i64) -> Result<Vec<City>> {
        self.select("WHERE co.continent_id = ?1", &[Value::Integer(continent_id)])
    }
}

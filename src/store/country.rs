use super::continent::Continent;
use super::repo::{Checker, ChildGuard, Entity, ParentLink};
use crate::error::Result;
use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

/// A country with its continent joined in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub id: i64,
    pub name: String,
    pub population: i64,
    pub official_language: String,
    pub currency: String,
    pub continent_id: i64,
    pub continent: Continent,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CountryInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub population: Option<i64>,
    #[serde(default)]
    pub official_language: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub continent_id: Option<i64>,
}

impl Entity for Country {
    type Input = CountryInput;

    const KIND: &'static str = "country";
    const TABLE: &'static str = "countries";
    const ALIAS: &'static str = "co";
    const SELECT: &'static str = "SELECT co.id, co.name, co.population, co.official_language, \
        co.currency, co.continent_id, ct.id, ct.name, ct.description \
        FROM countries co JOIN continents ct ON ct.id = co.continent_id";
    const COLUMNS: &'static [&'static str] =
        &["name", "population", "official_language", "currency", "continent_id"];
    const PARENT: Option<ParentLink> = Some(ParentLink {
        column: "continent_id",
        kind: "continent",
    });
    const CHILDREN: Option<ChildGuard> = Some(ChildGuard {
        table: "cities",
        column: "country_id",
        kind_plural: "cities",
    });

    fn read(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(offset)?,
            name: row.get(offset + 1)?,
            population: row.get(offset + 2)?,
            official_language: row.get(offset + 3)?,
            currency: row.get(offset + 4)?,
            continent_id: row.get(offset + 5)?,
            continent: Continent::read(row, offset + 6)?,
        })
    }

    fn bind(input: &CountryInput) -> Result<Vec<Value>> {
        let mut check = Checker::default();
        let values = vec![
            check.text("name", &input.name),
            check.population(input.population),
            check.text("official_language", &input.official_language),
            check.text("currency", &input.currency),
            check.reference("continent_id", input.continent_id),
        ];
        check.finish(values)
    }

    fn parent_id(input: &CountryInput) -> Option<i64> {
        input.continent_id
    }
}

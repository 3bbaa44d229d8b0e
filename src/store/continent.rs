use super::repo::{Checker, ChildGuard, Entity, ParentLink};
use crate::error::Result;
use rusqlite::types::Value;
use rusqlite::Row;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Continent {
    pub id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContinentInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Entity for Continent {
    type Input = ContinentInput;

    const KIND: &'static str = "continent";
    const TABLE: &'static str = "continents";
    const ALIAS: &'static str = "ct";
    const SELECT: &'static str = "SELECT ct.id, ct.name, ct.description FROM continents ct";
    const COLUMNS: &'static [&'static str] = &["name", "description"];
    const PARENT: Option<ParentLink> = None;
    const CHILDREN: Option<ChildGuard> = Some(ChildGuard {
        table: "countries",
        column: "continent_id",
        kind_plural: "countries",
    });

    fn read(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(offset)?,
            name: row.get(offset + 1)?,
            description: row.get(offset + 2)?,
        })
    }

    fn bind(input: &ContinentInput) -> Result<Vec<Value>> {
        let mut check = Checker::default();
        let name = check.text("name", &input.name);
        let description = Value::Text(input.description.trim().to_string());
        check.finish(vec![name, description])
    }
}

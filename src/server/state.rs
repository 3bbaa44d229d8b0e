use crate::error::Result;
use crate::external::{Fetch, Gateway};
use crate::store::{Entity, Repository};
use rusqlite::Connection;
use std::sync::{Arc, Mutex, PoisonError};

pub type SharedGateway = Arc<Gateway<Box<dyn Fetch>>>;

pub struct AppState {
    db: Mutex<Connection>,
    pub gateway: SharedGateway,
}

impl AppState {
    pub fn new(conn: Connection, gateway: Gateway<Box<dyn Fetch>>) -> Self {
        Self {
            db: Mutex::new(conn),
            gateway: Arc::new(gateway),
        }
    }

    /// Run one store operation under the connection lock.
    ///
    /// The lock is released before this returns, so callers never hold it
    /// across an `.await`.
    pub fn with_repo<E, T, F>(&self, op: F) -> Result<T>
    where
        E: Entity,
        F: FnOnce(&Repository<'_, E>) -> Result<T>,
    {
        let conn = self.db.lock().unwrap_or_else(PoisonError::into_inner);
        op(&Repository::new(&conn))
    }
}

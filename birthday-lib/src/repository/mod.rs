use std::sync::Arc;

use agdb::{Comparison, DbValue, QueryBuilder, QueryResult};
use parking_lot::RwLock;
use tracing::debug;

use crate::{
    Error, Result,
    query::{Engine, validate_month},
    record::{Record, RecordId},
    repository::{
        config::{Cfg, CoreConfig},
        db::{BIRTHDAYS, Db, NEXT_UID, inserted_id, models::BirthdayModel},
    },
};

mod db;

pub mod config;

/// Central access point for all persistent data.
///
/// The [`Repository`] owns the database and the configuration file. It hands out plain
/// [`Record`] snapshots; feeding them to the [`Engine`] is up to the caller.
#[derive(Clone, Debug)]
pub struct Repository {
    db: Db,
    cfg: Cfg,
}

impl Repository {
    /// Open the repository described by the configuration file
    pub fn new() -> Result<Self> {
        Self::with_config(CoreConfig::load()?)
    }

    pub fn with_config(cfg: CoreConfig) -> Result<Self> {
        let db = Db::open(&cfg.database_path()?)?;
        Ok(Self {
            db,
            cfg: Arc::new(RwLock::new(cfg)),
        })
    }

    pub fn cfg(&self) -> Cfg {
        self.cfg.clone()
    }

    /// An [`Engine`] using the configured leap day policy
    pub fn engine(&self) -> Engine {
        Engine::new(self.cfg.read().leap_day())
    }

    /// Store a new birthday, returning its freshly allocated id.
    pub fn create(&self, record: &Record) -> Result<RecordId> {
        let birth_date = record.validate()?;

        let id = self.db.write().transaction_mut(|t| -> Result<RecordId> {
            let uid = first_value(
                t.exec(
                    QueryBuilder::select()
                        .values(NEXT_UID)
                        .ids(NEXT_UID)
                        .query(),
                )?,
            )
            .expect("the uid counter is created with the database")
            .to_u64()?;

            t.exec_mut(
                QueryBuilder::insert()
                    .values([[(NEXT_UID, uid + 1).into()]])
                    .ids(NEXT_UID)
                    .query(),
            )?;

            let id = RecordId::from(uid);
            let model = BirthdayModel::new(id, record, birth_date);
            let db_id = inserted_id(t.exec_mut(QueryBuilder::insert().element(model).query())?);

            t.exec_mut(
                QueryBuilder::insert()
                    .edges()
                    .from(BIRTHDAYS)
                    .to(db_id)
                    .query(),
            )?;

            Ok(id)
        })?;

        debug!("Created birthday {id}: {}", record.name());

        Ok(id)
    }

    /// Replace the name, birth date and notes of an existing birthday.
    pub fn update(&self, id: RecordId, record: &Record) -> Result<()> {
        let birth_date = record.validate()?;
        let db_id = self.find_model(id)?.db_id.ok_or(Error::NotFound(id))?;
        let model = BirthdayModel::new(id, record, birth_date);

        self.db.write().exec_mut(
            QueryBuilder::insert()
                .values([[
                    ("name", model.name).into(),
                    ("search_name", model.search_name).into(),
                    ("birth_year", model.birth_year).into(),
                    ("birth_month", model.birth_month).into(),
                    ("birth_day", model.birth_day).into(),
                    ("notes", model.notes).into(),
                ]])
                .ids(db_id)
                .query(),
        )?;

        debug!("Updated birthday {id}");

        Ok(())
    }

    pub fn delete(&self, id: RecordId) -> Result<()> {
        let model = self.find_model(id)?;
        let db_id = model.db_id.ok_or(Error::NotFound(id))?;

        self.db
            .write()
            .exec_mut(QueryBuilder::remove().ids(db_id).query())?;

        debug!("Removed birthday {id}: {}", model.name);

        Ok(())
    }

    pub fn get(&self, id: RecordId) -> Result<Record> {
        Ok(self.find_model(id)?.into())
    }

    /// Every stored birthday, in creation order
    pub fn list_all(&self) -> Result<Vec<Record>> {
        let result = self.db.read().exec(
            QueryBuilder::select()
                .elements::<BirthdayModel>()
                .search()
                .from(BIRTHDAYS)
                .where_()
                .neighbor()
                .query(),
        )?;

        into_records(result)
    }

    /// Birthdays whose name contains `query`, ignoring case. A blank query lists everything.
    pub fn find_by_name(&self, query: &str) -> Result<Vec<Record>> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.list_all();
        }

        let result = self.db.read().exec(
            QueryBuilder::select()
                .elements::<BirthdayModel>()
                .search()
                .from(BIRTHDAYS)
                .where_()
                .neighbor()
                .and()
                .key("search_name")
                .value(Comparison::Contains(query.into()))
                .query(),
        )?;

        into_records(result)
    }

    /// Birthdays falling in `month` (1 through 12)
    pub fn find_by_month(&self, month: u32) -> Result<Vec<Record>> {
        validate_month(month)?;

        let result = self.db.read().exec(
            QueryBuilder::select()
                .elements::<BirthdayModel>()
                .search()
                .from(BIRTHDAYS)
                .where_()
                .neighbor()
                .and()
                .key("birth_month")
                .value(u64::from(month))
                .query(),
        )?;

        into_records(result)
    }

    fn find_model(&self, id: RecordId) -> Result<BirthdayModel> {
        let models: Vec<BirthdayModel> = self
            .db
            .read()
            .exec(
                QueryBuilder::select()
                    .elements::<BirthdayModel>()
                    .search()
                    .from(BIRTHDAYS)
                    .where_()
                    .neighbor()
                    .and()
                    .key("uid")
                    .value(id.get())
                    .query(),
            )?
            .try_into()?;

        models.into_iter().next().ok_or(Error::NotFound(id))
    }

    #[cfg(test)]
    /// Return a mock version of a [`Repository`] with an in-memory database and configuration.
    pub(crate) fn mock() -> Self {
        Self {
            db: Db::in_memory().unwrap(),
            cfg: Arc::new(RwLock::new(CoreConfig::mock())),
        }
    }
}

fn into_records(result: QueryResult) -> Result<Vec<Record>> {
    let mut models: Vec<BirthdayModel> = result.try_into()?;
    models.sort_by_key(|m| m.uid);

    Ok(models.into_iter().map(Record::from).collect())
}

fn first_value(result: QueryResult) -> Option<DbValue> {
    result
        .elements
        .into_iter()
        .next()?
        .values
        .into_iter()
        .next()
        .map(|kv| kv.value)
}

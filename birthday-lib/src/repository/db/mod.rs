use std::{path::Path, sync::Arc};

use agdb::{DbAny, DbId, QueryBuilder, QueryResult};
use derive_more::Deref;
use parking_lot::RwLock;
use tracing::debug;

use crate::{
    Error, Result,
    repository::db::models::{CURRENT_MODEL_VERSION, ModelVersion},
};

pub(crate) mod models;

/// Root node every stored birthday is linked from
pub(crate) const BIRTHDAYS: &str = "birthdays";
/// Holds the id the next created birthday receives
pub(crate) const NEXT_UID: &str = "next_uid";
const MODEL_VERSION: &str = "model_version";

#[derive(Debug, Clone, Deref)]
pub(crate) struct Db {
    #[deref]
    db: Arc<RwLock<DbAny>>,
}

impl Db {
    /// Open (or create) the file backed database at `path`
    pub fn open(path: &Path) -> Result<Self> {
        debug!("Opening database at {}", path.display());
        Self::init(DbAny::new_file(&path.to_string_lossy())?)
    }

    fn init(db: DbAny) -> Result<Self> {
        let db = Self {
            db: Arc::new(RwLock::new(db)),
        };

        let alias_count = db
            .read()
            .exec(QueryBuilder::select().aliases().query())?
            .result;

        if alias_count == 0 {
            db.write().transaction_mut(|t| -> Result<()> {
                t.exec_mut(
                    QueryBuilder::insert()
                        .nodes()
                        .aliases([BIRTHDAYS, MODEL_VERSION, NEXT_UID])
                        .query(),
                )?;

                // Ids are never reused, so the counter only ever grows
                t.exec_mut(
                    QueryBuilder::insert()
                        .values([[(NEXT_UID, 0_u64).into()]])
                        .ids(NEXT_UID)
                        .query(),
                )?;

                Ok(())
            })?;
        }

        let model_versions: Vec<ModelVersion> = db
            .read()
            .exec(
                QueryBuilder::select()
                    .elements::<ModelVersion>()
                    .search()
                    .from(MODEL_VERSION)
                    .where_()
                    .neighbor()
                    .query(),
            )?
            .try_into()?;

        match model_versions.first() {
            Some(mv) if mv.version() > CURRENT_MODEL_VERSION => {
                return Err(Error::UnsupportedModelVersion {
                    found: mv.version(),
                    supported: CURRENT_MODEL_VERSION,
                });
            }
            Some(_) => {}
            None => {
                db.write().transaction_mut(|t| -> Result<()> {
                    let model_version_id = inserted_id(
                        t.exec_mut(
                            QueryBuilder::insert()
                                .element(ModelVersion::default())
                                .query(),
                        )?,
                    );

                    t.exec_mut(
                        QueryBuilder::insert()
                            .edges()
                            .from(MODEL_VERSION)
                            .to(model_version_id)
                            .query(),
                    )?;

                    Ok(())
                })?;
            }
        }

        Ok(db)
    }

    /// Create a memory backed database for use in tests
    #[cfg(test)]
    pub(crate) fn in_memory() -> Result<Self> {
        Self::init(DbAny::new_memory("test")?)
    }
}

/// The id of the element created by an insert query
pub(crate) fn inserted_id(result: QueryResult) -> DbId {
    result
        .elements
        .first()
        .expect("a successful insert should return the new element")
        .id
}

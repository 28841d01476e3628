use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait,
    IntoActiveModel, Iterable, PrimaryKeyToColumn, PrimaryKeyTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionError, TransactionTrait,
};
use uuid::Uuid;

use blog_core::error::RepoError;
use blog_core::ports::{BaseRepository, ListChange};

use super::entity::Chronological;

/// Generic PostgreSQL repository implementation.
pub struct PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub(crate) db: DbConn,
    _entity: PhantomData<E>,
}

impl<E> PostgresBaseRepository<E>
where
    E: EntityTrait,
{
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }

    /// Read-modify-write of one document under a row lock.
    ///
    /// `modify` returns whether it changed the entity; nothing is written
    /// otherwise.
    pub(crate) async fn modify_locked<T, F>(
        &self,
        id: Uuid,
        modify: F,
    ) -> Result<ListChange, RepoError>
    where
        E::Model: IntoActiveModel<E::ActiveModel> + Send + Sync,
        E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
        E::PrimaryKey: PrimaryKeyTrait<ValueType = Uuid>,
        T: From<E::Model> + Into<E::ActiveModel> + Send + 'static,
        F: FnOnce(&mut T) -> bool + Send + 'static,
    {
        self.db
            .transaction::<_, ListChange, DbErr>(move |txn| {
                Box::pin(async move {
                    let Some(model) = E::find_by_id(id).lock_exclusive().one(txn).await? else {
                        return Ok(ListChange::Missing);
                    };

                    let mut entity = T::from(model);
                    if !modify(&mut entity) {
                        return Ok(ListChange::Unchanged);
                    }

                    let active_model: E::ActiveModel = entity.into();
                    active_model.update(txn).await?;
                    Ok(ListChange::Changed)
                })
            })
            .await
            .map_err(transaction_error)
    }
}

/// `Ok(None)` when the update matched no row.
pub(crate) fn updated_row<M>(result: Result<M, DbErr>) -> Result<Option<M>, RepoError> {
    match result {
        Ok(model) => Ok(Some(model)),
        Err(DbErr::RecordNotUpdated) => Ok(None),
        Err(e) => Err(write_error(e)),
    }
}

pub(crate) fn transaction_error(err: TransactionError<DbErr>) -> RepoError {
    match err {
        TransactionError::Connection(e) => RepoError::Connection(e.to_string()),
        TransactionError::Transaction(e) => RepoError::Query(e.to_string()),
    }
}

fn write_error(e: DbErr) -> RepoError {
    let err_str = e.to_string();
    if err_str.contains("duplicate") || err_str.contains("unique") {
        RepoError::Constraint("Entity already exists".to_string())
    } else {
        RepoError::Query(err_str)
    }
}

#[async_trait]
impl<E, T, ID> BaseRepository<T, ID> for PostgresBaseRepository<E>
where
    E: Chronological,
    E::Model: IntoActiveModel<E::ActiveModel> + Sync + Send,
    E::ActiveModel: ActiveModelTrait<Entity = E> + Send + Sync,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = ID>,
    ID: Send + Sync + Into<sea_orm::Value> + Clone + Copy + 'static,
    T: From<E::Model> + Into<E::ActiveModel> + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError> {
        let result = E::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.map(Into::into))
    }

    /// Oldest first, ties broken by id.
    async fn find_all(&self) -> Result<Vec<T>, RepoError> {
        let mut query = E::find().order_by_asc(E::created_at_column());
        for pk in E::PrimaryKey::iter() {
            query = query.order_by_asc(pk.into_column());
        }

        let result = query
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_many(&self, ids: &[ID]) -> Result<Vec<T>, RepoError> {
        let Some(pk) = E::PrimaryKey::iter().next() else {
            return Ok(Vec::new());
        };
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = E::find()
            .filter(pk.into_column().is_in(ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    /// Insert, or replace every column of an existing row.
    async fn save(&self, entity: T) -> Result<T, RepoError> {
        let active_model: E::ActiveModel = entity.into();
        let on_conflict = OnConflict::columns(E::PrimaryKey::iter())
            .update_columns(E::Column::iter())
            .to_owned();

        let model = E::insert(active_model)
            .on_conflict(on_conflict)
            .exec_with_returning(&self.db)
            .await
            .map_err(write_error)?;

        Ok(model.into())
    }

    async fn delete(&self, id: ID) -> Result<(), RepoError> {
        let result = E::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| RepoError::Query(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

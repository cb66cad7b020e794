use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
    sea_query::Expr,
};

use scoreqr_core::pagination::PageRequest;
use scoreqr_schema::auth_codes;

use crate::domain::repository::CodeRepository;
use crate::domain::types::{
    AuthCode, CodeFilter, CodeSortBy, NewAuthCode, StatusFilter, StoreCounts,
};
use crate::error::ServerError;

#[derive(Clone)]
pub struct DbCodeRepository {
    pub db: DatabaseConnection,
}

impl CodeRepository for DbCodeRepository {
    async fn find(&self, code: &str) -> Result<Option<AuthCode>, ServerError> {
        let model = auth_codes::Entity::find_by_id(code.to_owned())
            .one(&self.db)
            .await
            .context("find auth code")?;
        Ok(model.map(authcode_from_model))
    }

    async fn try_activate(
        &self,
        code: &str,
        now: DateTime<Utc>,
        client_ip: &str,
        user_agent: &str,
    ) -> Result<bool, ServerError> {
        // Single conditional update keyed on the previous activated value;
        // the affected-row count decides which concurrent caller won.
        let result = auth_codes::Entity::update_many()
            .col_expr(auth_codes::Column::Activated, Expr::value(true))
            .col_expr(auth_codes::Column::ActivationDate, Expr::value(Some(now)))
            .col_expr(
                auth_codes::Column::ActivationIp,
                Expr::value(Some(client_ip.to_owned())),
            )
            .col_expr(
                auth_codes::Column::ActivationUserAgent,
                Expr::value(Some(user_agent.to_owned())),
            )
            .col_expr(
                auth_codes::Column::QueryCount,
                Expr::col(auth_codes::Column::QueryCount).add(1),
            )
            .col_expr(auth_codes::Column::LastQueryDate, Expr::value(Some(now)))
            .filter(auth_codes::Column::Code.eq(code))
            .filter(auth_codes::Column::Activated.eq(false))
            .exec(&self.db)
            .await
            .context("activate auth code")?;
        Ok(result.rows_affected > 0)
    }

    async fn record_query(&self, code: &str, now: DateTime<Utc>) -> Result<bool, ServerError> {
        let result = auth_codes::Entity::update_many()
            .col_expr(
                auth_codes::Column::QueryCount,
                Expr::col(auth_codes::Column::QueryCount).add(1),
            )
            .col_expr(auth_codes::Column::LastQueryDate, Expr::value(Some(now)))
            .filter(auth_codes::Column::Code.eq(code))
            .exec(&self.db)
            .await
            .context("record repeat query")?;
        Ok(result.rows_affected > 0)
    }

    async fn insert_missing(&self, batch: &[NewAuthCode]) -> Result<(u64, u64), ServerError> {
        let batch = batch.to_vec();
        let (added, skipped) = self
            .db
            .transaction::<_, (u64, u64), sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    let mut added = 0u64;
                    let mut skipped = 0u64;
                    for candidate in &batch {
                        if exists(txn, &candidate.code).await? {
                            skipped += 1;
                            continue;
                        }
                        insert_unactivated(txn, candidate).await?;
                        added += 1;
                    }
                    Ok((added, skipped))
                })
            })
            .await
            .context("sync code batch")?;
        Ok((added, skipped))
    }

    async fn insert(&self, code: &NewAuthCode) -> Result<(), ServerError> {
        let result = auth_codes::ActiveModel {
            code: Set(code.code.clone()),
            created_date: Set(code.created_date),
            activated: Set(false),
            activation_date: Set(None),
            activation_ip: Set(None),
            activation_user_agent: Set(None),
            query_count: Set(0),
            last_query_date: Set(None),
        }
        .insert(&self.db)
        .await;
        match result {
            Ok(_) => Ok(()),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(ServerError::DuplicateCode)
            }
            Err(e) => Err(ServerError::Internal(
                anyhow::Error::new(e).context("insert auth code"),
            )),
        }
    }

    async fn delete(&self, code: &str) -> Result<bool, ServerError> {
        let result = auth_codes::Entity::delete_many()
            .filter(auth_codes::Column::Code.eq(code))
            .exec(&self.db)
            .await
            .context("delete auth code")?;
        Ok(result.rows_affected > 0)
    }

    async fn counts(
        &self,
        today_start: DateTime<Utc>,
        today_end: DateTime<Utc>,
    ) -> Result<StoreCounts, ServerError> {
        let total_codes = auth_codes::Entity::find()
            .count(&self.db)
            .await
            .context("count codes")?;
        let activated_codes = auth_codes::Entity::find()
            .filter(auth_codes::Column::Activated.eq(true))
            .count(&self.db)
            .await
            .context("count activated codes")?;
        let today_queries = auth_codes::Entity::find()
            .filter(auth_codes::Column::LastQueryDate.gte(today_start))
            .filter(auth_codes::Column::LastQueryDate.lt(today_end))
            .count(&self.db)
            .await
            .context("count today's queries")?;
        Ok(StoreCounts {
            total_codes,
            activated_codes,
            today_queries,
        })
    }

    async fn list(
        &self,
        filter: &CodeFilter,
        sort_by: CodeSortBy,
        page: PageRequest,
    ) -> Result<(Vec<AuthCode>, u64, u64), ServerError> {
        let total = filtered(filter)
            .count(&self.db)
            .await
            .context("count filtered codes")?;
        let activated = filtered(filter)
            .filter(auth_codes::Column::Activated.eq(true))
            .count(&self.db)
            .await
            .context("count filtered activated codes")?;

        let mut query = filtered(filter);
        query = match sort_by {
            CodeSortBy::CreatedDesc => {
                query.order_by_desc(auth_codes::Column::CreatedDate)
            }
            CodeSortBy::CreatedAsc => query.order_by_asc(auth_codes::Column::CreatedDate),
            CodeSortBy::ActivationDesc => {
                query.order_by_desc(auth_codes::Column::ActivationDate)
            }
            CodeSortBy::QueryDesc => query.order_by_desc(auth_codes::Column::QueryCount),
        };
        let models = query
            .offset(page.offset())
            .limit(u64::from(page.per_page))
            .all(&self.db)
            .await
            .context("list codes")?;

        Ok((
            models.into_iter().map(authcode_from_model).collect(),
            total,
            activated,
        ))
    }
}

fn filtered(filter: &CodeFilter) -> sea_orm::Select<auth_codes::Entity> {
    let mut query = auth_codes::Entity::find();
    if let Some(search) = &filter.search {
        query = query.filter(auth_codes::Column::Code.contains(search));
    }
    match filter.status {
        StatusFilter::All => {}
        StatusFilter::Activated => {
            query = query.filter(auth_codes::Column::Activated.eq(true));
        }
        StatusFilter::NotActivated => {
            query = query.filter(auth_codes::Column::Activated.eq(false));
        }
    }
    query
}

async fn exists(txn: &DatabaseTransaction, code: &str) -> Result<bool, sea_orm::DbErr> {
    Ok(auth_codes::Entity::find_by_id(code.to_owned())
        .one(txn)
        .await?
        .is_some())
}

async fn insert_unactivated(
    txn: &DatabaseTransaction,
    candidate: &NewAuthCode,
) -> Result<(), sea_orm::DbErr> {
    auth_codes::ActiveModel {
        code: Set(candidate.code.clone()),
        created_date: Set(candidate.created_date),
        activated: Set(false),
        activation_date: Set(None),
        activation_ip: Set(None),
        activation_user_agent: Set(None),
        query_count: Set(0),
        last_query_date: Set(None),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn authcode_from_model(model: auth_codes::Model) -> AuthCode {
    AuthCode {
        code: model.code,
        created_date: model.created_date,
        activated: model.activated,
        activation_date: model.activation_date,
        activation_ip: model.activation_ip,
        activation_user_agent: model.activation_user_agent,
        query_count: model.query_count,
        last_query_date: model.last_query_date,
    }
}

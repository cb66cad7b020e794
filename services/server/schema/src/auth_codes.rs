use sea_orm::entity::prelude::*;

/// One issued authenticity code. The code string itself is the business key
/// and primary key; activation fields are written once, counters on every
/// successful verification.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "auth_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    pub created_date: chrono::DateTime<chrono::Utc>,
    pub activated: bool,
    pub activation_date: Option<chrono::DateTime<chrono::Utc>>,
    pub activation_ip: Option<String>,
    pub activation_user_agent: Option<String>,
    pub query_count: i32,
    pub last_query_date: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

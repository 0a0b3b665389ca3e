use sea_orm::entity::prelude::*;

/// Message queued for a user, optionally pointing at a related entity.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    /// `new_participant`, `session_reminder` or `session_update`.
    #[sea_orm(column_name = "type")]
    pub kind: String,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub related_id: Option<Uuid>,
    pub related_type: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

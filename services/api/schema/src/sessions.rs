use sea_orm::entity::prelude::*;

/// Scheduled skill-sharing session.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: String,
    pub date_time: chrono::DateTime<chrono::Utc>,
    pub location: String,
    pub max_participants: i32,
    pub creator_id: Uuid,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatorId",
        to = "super::users::Column::Id"
    )]
    Creator,
    #[sea_orm(has_many = "super::session_participants::Entity")]
    SessionParticipants,
    #[sea_orm(has_many = "super::feedback::Entity")]
    Feedback,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::session_participants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SessionParticipants.def()
    }
}

impl Related<super::feedback::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Feedback.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

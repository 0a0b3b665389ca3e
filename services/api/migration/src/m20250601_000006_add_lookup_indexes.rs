use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .table(Sessions::Table)
                    .col(Sessions::DateTime)
                    .name("idx_sessions_date_time")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Sessions::Table)
                    .col(Sessions::Category)
                    .name("idx_sessions_category")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Sessions::Table)
                    .col(Sessions::CreatorId)
                    .name("idx_sessions_creator_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(SessionParticipants::Table)
                    .col(SessionParticipants::UserId)
                    .name("idx_session_participants_user_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Users::Table)
                    .col(Users::JwtRefreshToken)
                    .name("idx_users_jwt_refresh_token")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_users_jwt_refresh_token",
            "idx_session_participants_user_id",
            "idx_sessions_creator_id",
            "idx_sessions_category",
            "idx_sessions_date_time",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }
        Ok(())
    }
}

#[derive(Iden)]
enum Sessions {
    Table,
    DateTime,
    Category,
    CreatorId,
}

#[derive(Iden)]
enum SessionParticipants {
    Table,
    UserId,
}

#[derive(Iden)]
enum Users {
    Table,
    JwtRefreshToken,
}

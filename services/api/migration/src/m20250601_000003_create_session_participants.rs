use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SessionParticipants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SessionParticipants::SessionId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SessionParticipants::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(SessionParticipants::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .col(SessionParticipants::SessionId)
                            .col(SessionParticipants::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SessionParticipants::Table, SessionParticipants::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SessionParticipants::Table, SessionParticipants::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SessionParticipants::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SessionParticipants {
    Table,
    SessionId,
    UserId,
    JoinedAt,
}

#[derive(Iden)]
enum Sessions {
    Table,
    Id,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}

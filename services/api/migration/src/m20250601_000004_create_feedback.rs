use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Feedback::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Feedback::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Feedback::SessionId).uuid().not_null())
                    .col(ColumnDef::new(Feedback::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(Feedback::Rating)
                            .small_integer()
                            .not_null()
                            .check(Expr::col(Feedback::Rating).between(1, 5)),
                    )
                    .col(ColumnDef::new(Feedback::Comment).text().not_null().default(""))
                    .col(
                        ColumnDef::new(Feedback::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Feedback::Table, Feedback::SessionId)
                            .to(Sessions::Table, Sessions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Feedback::Table, Feedback::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Feedback::Table)
                    .col(Feedback::SessionId)
                    .col(Feedback::UserId)
                    .unique()
                    .name("uq_feedback_session_id_user_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Feedback::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Feedback {
    Table,
    Id,
    SessionId,
    UserId,
    Rating,
    Comment,
    CreatedAt,
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

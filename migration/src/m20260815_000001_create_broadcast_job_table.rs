use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create table
        manager
            .create_table(
                Table::create()
                    .table(BroadcastJob::Table)
                    .if_not_exists()
                    .col(pk_auto(BroadcastJob::Id))
                    .col(string(BroadcastJob::GuildId))
                    .col(string(BroadcastJob::ChannelId))
                    .col(string(BroadcastJob::Title))
                    .col(text(BroadcastJob::Body))
                    .col(timestamp(BroadcastJob::ScheduledAt))
                    .col(string(BroadcastJob::Status))
                    .col(integer(BroadcastJob::Attempts).default(0))
                    .col(text_null(BroadcastJob::LastError))
                    .col(timestamp_null(BroadcastJob::NextAttemptAt))
                    .col(
                        timestamp(BroadcastJob::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp(BroadcastJob::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create index for the due-job claim query
        manager
            .create_index(
                Index::create()
                    .name("idx_broadcast_job_status_scheduled_at")
                    .table(BroadcastJob::Table)
                    .col(BroadcastJob::Status)
                    .col(BroadcastJob::ScheduledAt)
                    .to_owned(),
            )
            .await?;

        // Create index for the retry sweep query
        manager
            .create_index(
                Index::create()
                    .name("idx_broadcast_job_status_next_attempt_at")
                    .table(BroadcastJob::Table)
                    .col(BroadcastJob::Status)
                    .col(BroadcastJob::NextAttemptAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop indexes first
        manager
            .drop_index(
                Index::drop()
                    .name("idx_broadcast_job_status_next_attempt_at")
                    .table(BroadcastJob::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_broadcast_job_status_scheduled_at")
                    .table(BroadcastJob::Table)
                    .to_owned(),
            )
            .await?;

        // Drop table
        manager
            .drop_table(Table::drop().table(BroadcastJob::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum BroadcastJob {
    Table,
    Id,
    GuildId,
    ChannelId,
    Title,
    Body,
    ScheduledAt,
    Status,
    Attempts,
    LastError,
    NextAttemptAt,
    CreatedAt,
    UpdatedAt,
}

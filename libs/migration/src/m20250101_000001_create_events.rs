use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(pk_auto(Events::Id))
                    .col(string(Events::Name))
                    .col(string(Events::Time))
                    .col(integer(Events::MaxSlots).check(Expr::col(Events::MaxSlots).gt(0)))
                    .col(text(Events::Observations).default("[]"))
                    .col(string_len(Events::Password, 16))
                    .col(
                        timestamp_with_time_zone(Events::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        create_roster(manager, Participants::Table, "participants").await?;
        create_roster(manager, Reservations::Table, "reservations").await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservations::Table).if_exists().to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Participants::Table).if_exists().to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Events::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

/// Participants and reservations share one shape; rows go away with their event.
async fn create_roster<T>(manager: &SchemaManager<'_>, table: T, name: &str) -> Result<(), DbErr>
where
    T: IntoIden + Copy + 'static,
{
    manager
        .create_table(
            Table::create()
                .table(table)
                .if_not_exists()
                .col(pk_auto(Roster::Id))
                .col(integer(Roster::EventId))
                .col(string(Roster::Nickname))
                .col(string(Roster::Vocation))
                .col(
                    timestamp_with_time_zone(Roster::CreatedAt)
                        .default(Expr::current_timestamp()),
                )
                .foreign_key(
                    ForeignKey::create()
                        .name(format!("fk_{name}_event_id"))
                        .from(table, Roster::EventId)
                        .to(Events::Table, Events::Id)
                        .on_delete(ForeignKeyAction::Cascade),
                )
                .to_owned(),
        )
        .await?;

    manager
        .create_index(
            Index::create()
                .name(format!("idx_{name}_event_id"))
                .table(table)
                .col(Roster::EventId)
                .to_owned(),
        )
        .await
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
    Name,
    Time,
    MaxSlots,
    Observations,
    Password,
    CreatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum Participants {
    Table,
}

#[derive(DeriveIden, Clone, Copy)]
enum Reservations {
    Table,
}

/// Columns common to both roster tables
#[derive(DeriveIden)]
enum Roster {
    Id,
    EventId,
    Nickname,
    Vocation,
    CreatedAt,
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ========== SITE ==========
        manager
            .create_table(
                Table::create()
                    .table(Site::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Site::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Site::Name).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Site::Comment)
                            .string_len(120)
                            .not_null()
                            .default(""),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== ZONE ==========
        manager
            .create_table(
                Table::create()
                    .table(Zone::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Zone::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Zone::Name).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Zone::Comment)
                            .string_len(120)
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Zone::SiteId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_zone_site")
                            .from(Zone::Table, Zone::SiteId)
                            .to(Site::Table, Site::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== PROCESS ==========
        manager
            .create_table(
                Table::create()
                    .table(Process::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Process::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Process::Name).string_len(64).not_null())
                    .col(ColumnDef::new(Process::Comment).string_len(120))
                    .col(ColumnDef::new(Process::ZoneId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_process_zone")
                            .from(Process::Table, Process::ZoneId)
                            .to(Zone::Table, Zone::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== SERVER ==========
        manager
            .create_table(
                Table::create()
                    .table(Server::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Server::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Server::Uid).string_len(64).not_null())
                    .to_owned(),
            )
            .await?;

        // ========== TAG ==========
        manager
            .create_table(
                Table::create()
                    .table(Tag::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tag::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tag::Name).string_len(64).not_null())
                    .col(ColumnDef::new(Tag::Alias).string_len(64).not_null())
                    .col(ColumnDef::new(Tag::Comment).string_len(120))
                    .col(ColumnDef::new(Tag::Unit).string_len(64))
                    .col(ColumnDef::new(Tag::Icon).string_len(255))
                    .col(ColumnDef::new(Tag::ServerId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tag_server")
                            .from(Tag::Table, Tag::ServerId)
                            .to(Server::Table, Server::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== PROCESS_TAGS ==========
        // Many-to-many join between processes and tags
        manager
            .create_table(
                Table::create()
                    .table(ProcessTags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ProcessTags::ProcessId).integer().not_null())
                    .col(ColumnDef::new(ProcessTags::TagId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(ProcessTags::ProcessId)
                            .col(ProcessTags::TagId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_process_tags_process")
                            .from(ProcessTags::Table, ProcessTags::ProcessId)
                            .to(Process::Table, Process::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_process_tags_tag")
                            .from(ProcessTags::Table, ProcessTags::TagId)
                            .to(Tag::Table, Tag::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== RECORD ==========
        manager
            .create_table(
                Table::create()
                    .table(Record::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Record::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Record::TimeOpc).date_time().not_null())
                    .col(ColumnDef::new(Record::TimeDb).date_time().not_null())
                    .col(ColumnDef::new(Record::Value).string_len(120).not_null())
                    .col(ColumnDef::new(Record::Quality).string_len(64).not_null())
                    .col(ColumnDef::new(Record::TagId).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_record_tag")
                            .from(Record::Table, Record::TagId)
                            .to(Tag::Table, Tag::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ========== INDEXES ==========
        manager
            .create_index(
                Index::create()
                    .name("idx_zone_site_id")
                    .table(Zone::Table)
                    .col(Zone::SiteId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_process_zone_id")
                    .table(Process::Table)
                    .col(Process::ZoneId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tag_server_id")
                    .table(Tag::Table)
                    .col(Tag::ServerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_process_tags_tag_id")
                    .table(ProcessTags::Table)
                    .col(ProcessTags::TagId)
                    .to_owned(),
            )
            .await?;

        // Serves both the per-tag record listing and the per-tag MAX(id) of the timeline
        manager
            .create_index(
                Index::create()
                    .name("idx_record_tag_id_id")
                    .table(Record::Table)
                    .col(Record::TagId)
                    .col(Record::Id)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_record_time_opc")
                    .table(Record::Table)
                    .col(Record::TimeOpc)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Record::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProcessTags::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tag::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Server::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Process::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Zone::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Site::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Site {
    Table,
    Id,
    Name,
    Comment,
}

#[derive(DeriveIden)]
enum Zone {
    Table,
    Id,
    Name,
    Comment,
    SiteId,
}

#[derive(DeriveIden)]
enum Process {
    Table,
    Id,
    Name,
    Comment,
    ZoneId,
}

#[derive(DeriveIden)]
enum Server {
    Table,
    Id,
    Uid,
}

#[derive(DeriveIden)]
enum Tag {
    Table,
    Id,
    Name,
    Alias,
    Comment,
    Unit,
    Icon,
    ServerId,
}

#[derive(DeriveIden)]
enum ProcessTags {
    Table,
    ProcessId,
    TagId,
}

#[derive(DeriveIden)]
enum Record {
    Table,
    Id,
    TimeOpc,
    TimeDb,
    Value,
    Quality,
    TagId,
}

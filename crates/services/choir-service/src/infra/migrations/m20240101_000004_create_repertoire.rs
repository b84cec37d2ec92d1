//! Migration: Create songs, performances with their song tree, and rehearsals.
//!
//! Everything under a performance cascades from the top so deleting a
//! performance removes its songs, musicians, voice parts and part members.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("CREATE TYPE voice_type AS ENUM ('SOPRANO', 'ALTO', 'TENOR', 'BASS')")
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Songs::Table)
                    .if_not_exists()
                    .col(&mut pk(Songs::Id))
                    .col(ColumnDef::new(Songs::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Songs::Composer).string_len(255).null())
                    .col(ColumnDef::new(Songs::Genre).string_len(100).null())
                    .col(ColumnDef::new(Songs::Language).string_len(50).null())
                    .col(ColumnDef::new(Songs::MusicalKey).string_len(50).null())
                    .col(ColumnDef::new(Songs::Lyrics).text().null())
                    .col(&mut timestamp(Songs::CreatedAt))
                    .col(&mut timestamp(Songs::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Performances::Table)
                    .if_not_exists()
                    .col(&mut pk(Performances::Id))
                    .col(ColumnDef::new(Performances::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Performances::Venue).string_len(255).null())
                    .col(
                        ColumnDef::new(Performances::PerformanceDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Performances::Description).text().null())
                    .col(&mut timestamp(Performances::CreatedAt))
                    .col(&mut timestamp(Performances::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PerformanceSongs::Table)
                    .if_not_exists()
                    .col(&mut pk(PerformanceSongs::Id))
                    .col(ColumnDef::new(PerformanceSongs::PerformanceId).integer().not_null())
                    .col(ColumnDef::new(PerformanceSongs::SongId).integer().not_null())
                    .col(ColumnDef::new(PerformanceSongs::SongOrder).integer().not_null())
                    .col(ColumnDef::new(PerformanceSongs::MusicalKey).string_len(50).null())
                    .col(ColumnDef::new(PerformanceSongs::Notes).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_performance_songs_performance")
                            .from(PerformanceSongs::Table, PerformanceSongs::PerformanceId)
                            .to(Performances::Table, Performances::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_performance_songs_song")
                            .from(PerformanceSongs::Table, PerformanceSongs::SongId)
                            .to(Songs::Table, Songs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_performance_songs_order")
                    .table(PerformanceSongs::Table)
                    .col(PerformanceSongs::PerformanceId)
                    .col(PerformanceSongs::SongOrder)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PerformanceSongMusicians::Table)
                    .if_not_exists()
                    .col(&mut pk(PerformanceSongMusicians::Id))
                    .col(
                        ColumnDef::new(PerformanceSongMusicians::PerformanceSongId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PerformanceSongMusicians::UserId).integer().not_null())
                    .col(ColumnDef::new(PerformanceSongMusicians::Instrument).string_len(100).null())
                    .col(
                        ColumnDef::new(PerformanceSongMusicians::IsSolo)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(PerformanceSongMusicians::IsAccompanist)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_performance_song_musicians_song")
                            .from(
                                PerformanceSongMusicians::Table,
                                PerformanceSongMusicians::PerformanceSongId,
                            )
                            .to(PerformanceSongs::Table, PerformanceSongs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_performance_song_musicians_user")
                            .from(PerformanceSongMusicians::Table, PerformanceSongMusicians::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PerformanceVoiceParts::Table)
                    .if_not_exists()
                    .col(&mut pk(PerformanceVoiceParts::Id))
                    .col(
                        ColumnDef::new(PerformanceVoiceParts::PerformanceSongId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PerformanceVoiceParts::VoiceType)
                            .custom(Alias::new("voice_type"))
                            .not_null(),
                    )
                    .col(ColumnDef::new(PerformanceVoiceParts::Notes).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_performance_voice_parts_song")
                            .from(
                                PerformanceVoiceParts::Table,
                                PerformanceVoiceParts::PerformanceSongId,
                            )
                            .to(PerformanceSongs::Table, PerformanceSongs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PerformanceVoicePartMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PerformanceVoicePartMembers::VoicePartId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PerformanceVoicePartMembers::UserId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(PerformanceVoicePartMembers::VoicePartId)
                            .col(PerformanceVoicePartMembers::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_voice_part_members_part")
                            .from(
                                PerformanceVoicePartMembers::Table,
                                PerformanceVoicePartMembers::VoicePartId,
                            )
                            .to(PerformanceVoiceParts::Table, PerformanceVoiceParts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_voice_part_members_user")
                            .from(
                                PerformanceVoicePartMembers::Table,
                                PerformanceVoicePartMembers::UserId,
                            )
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Rehearsals::Table)
                    .if_not_exists()
                    .col(&mut pk(Rehearsals::Id))
                    .col(ColumnDef::new(Rehearsals::Title).string_len(255).not_null())
                    .col(ColumnDef::new(Rehearsals::Venue).string_len(255).null())
                    .col(ColumnDef::new(Rehearsals::StartsAt).timestamp_with_time_zone().not_null())
                    .col(ColumnDef::new(Rehearsals::EndsAt).timestamp_with_time_zone().null())
                    .col(ColumnDef::new(Rehearsals::PerformanceId).integer().null())
                    .col(ColumnDef::new(Rehearsals::Notes).text().null())
                    .col(&mut timestamp(Rehearsals::CreatedAt))
                    .col(&mut timestamp(Rehearsals::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rehearsals_performance")
                            .from(Rehearsals::Table, Rehearsals::PerformanceId)
                            .to(Performances::Table, Performances::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RehearsalSongs::Table)
                    .if_not_exists()
                    .col(&mut pk(RehearsalSongs::Id))
                    .col(ColumnDef::new(RehearsalSongs::RehearsalId).integer().not_null())
                    .col(ColumnDef::new(RehearsalSongs::SongId).integer().not_null())
                    .col(ColumnDef::new(RehearsalSongs::SongOrder).integer().not_null())
                    .col(ColumnDef::new(RehearsalSongs::MusicalKey).string_len(50).null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rehearsal_songs_rehearsal")
                            .from(RehearsalSongs::Table, RehearsalSongs::RehearsalId)
                            .to(Rehearsals::Table, Rehearsals::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rehearsal_songs_song")
                            .from(RehearsalSongs::Table, RehearsalSongs::SongId)
                            .to(Songs::Table, Songs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_rehearsal_songs_order")
                    .table(RehearsalSongs::Table)
                    .col(RehearsalSongs::RehearsalId)
                    .col(RehearsalSongs::SongOrder)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RehearsalSongs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rehearsals::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PerformanceVoicePartMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PerformanceVoiceParts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PerformanceSongMusicians::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PerformanceSongs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Performances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Songs::Table).to_owned())
            .await?;

        manager
            .get_connection()
            .execute_unprepared("DROP TYPE IF EXISTS voice_type")
            .await?;
        Ok(())
    }
}

fn pk<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

fn timestamp<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Songs {
    Table,
    Id,
    Title,
    Composer,
    Genre,
    Language,
    MusicalKey,
    Lyrics,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Performances {
    Table,
    Id,
    Title,
    Venue,
    PerformanceDate,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PerformanceSongs {
    Table,
    Id,
    PerformanceId,
    SongId,
    SongOrder,
    MusicalKey,
    Notes,
}

#[derive(DeriveIden)]
enum PerformanceSongMusicians {
    Table,
    Id,
    PerformanceSongId,
    UserId,
    Instrument,
    IsSolo,
    IsAccompanist,
}

#[derive(DeriveIden)]
enum PerformanceVoiceParts {
    Table,
    Id,
    PerformanceSongId,
    VoiceType,
    Notes,
}

#[derive(DeriveIden)]
enum PerformanceVoicePartMembers {
    Table,
    VoicePartId,
    UserId,
}

#[derive(DeriveIden)]
enum Rehearsals {
    Table,
    Id,
    Title,
    Venue,
    StartsAt,
    EndsAt,
    PerformanceId,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum RehearsalSongs {
    Table,
    Id,
    RehearsalId,
    SongId,
    SongOrder,
    MusicalKey,
}

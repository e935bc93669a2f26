use sea_orm::sea_query::{Index, IndexCreateStatement, OnConflict, PostgresQueryBuilder};
use sea_orm::*;
use tracing::{info, warn};

use crate::entity::crew_role::{self, DEFAULT_CREW_ROLES};
use crate::entity::{crew_member, movie_list, top_creator, top_curator};

/// Seed the `crew_role` table with the default roles.
pub async fn seed_crew_roles(db: &DatabaseConnection) -> Result<(), DbErr> {
    let mut inserted = 0u32;
    for &name in DEFAULT_CREW_ROLES {
        let model = crew_role::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        };

        let result = crew_role::Entity::insert(model)
            .on_conflict(
                OnConflict::column(crew_role::Column::Name)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await;

        match result {
            Ok(_) => inserted += 1,
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if inserted > 0 {
        info!("Seeded {} new crew roles", inserted);
    }

    Ok(())
}

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't create composite indexes, so we create them
/// on startup. The unique ones back `ON CONFLICT` clauses and the list
/// invariants, so failing to create them is fatal; lookup indexes only warn.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let unique = [
        (
            "uq_movie_list_owner_name",
            Index::create()
                .if_not_exists()
                .unique()
                .table(movie_list::Entity)
                .col(movie_list::Column::OwnerId)
                .col(movie_list::Column::Name)
                .to_owned(),
        ),
        (
            "uq_movie_list_owner_contest",
            Index::create()
                .if_not_exists()
                .unique()
                .table(movie_list::Entity)
                .col(movie_list::Column::OwnerId)
                .col(movie_list::Column::ContestId)
                .to_owned(),
        ),
        (
            "uq_crew_member_movie_profile_role",
            Index::create()
                .if_not_exists()
                .unique()
                .table(crew_member::Entity)
                .col(crew_member::Column::MovieId)
                .col(crew_member::Column::ProfileId)
                .col(crew_member::Column::RoleId)
                .to_owned(),
        ),
    ];
    for (name, stmt) in unique {
        create_index(db, name, stmt).await?;
    }

    let lookup = [
        (
            "idx_top_creator_contest_pos",
            Index::create()
                .if_not_exists()
                .table(top_creator::Entity)
                .col(top_creator::Column::ContestId)
                .col(top_creator::Column::Pos)
                .to_owned(),
        ),
        (
            "idx_top_curator_contest_pos",
            Index::create()
                .if_not_exists()
                .table(top_curator::Entity)
                .col(top_curator::Column::ContestId)
                .col(top_curator::Column::Pos)
                .to_owned(),
        ),
    ];
    for (name, stmt) in lookup {
        if let Err(e) = create_index(db, name, stmt).await {
            warn!("Failed to create index {}: {}", name, e);
        }
    }

    Ok(())
}

async fn create_index(
    db: &DatabaseConnection,
    name: &str,
    mut stmt: IndexCreateStatement,
) -> Result<(), DbErr> {
    stmt.name(name);
    db.execute_unprepared(&stmt.to_string(PostgresQueryBuilder))
        .await?;
    info!("Ensured index {} exists", name);
    Ok(())
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .table(Titles::Table)
                    .col(Titles::CategoryId)
                    .name("idx_titles_category_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(GenreTitles::Table)
                    .col(GenreTitles::GenreId)
                    .name("idx_genre_titles_genre_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Comments::Table)
                    .col(Comments::ReviewId)
                    .col(Comments::PubDate)
                    .name("idx_comments_review_id_pub_date")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_comments_review_id_pub_date")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_index(Index::drop().name("idx_genre_titles_genre_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_titles_category_id").to_owned())
            .await
    }
}

#[derive(Iden)]
enum Titles {
    Table,
    CategoryId,
}

#[derive(Iden)]
enum GenreTitles {
    Table,
    GenreId,
}

#[derive(Iden)]
enum Comments {
    Table,
    ReviewId,
    PubDate,
}

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 文档表 ====================
        // 每个文档（包括子集合中的文档）占一行，以完整路径为主键
        manager
            .create_table(
                Table::create()
                    .table(Documents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Documents::Path)
                            .string_len(768)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Documents::ParentPath)
                            .string_len(768)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Documents::CollectionId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Documents::Data).text().not_null())
                    .col(ColumnDef::new(Documents::Version).big_integer().not_null())
                    .col(
                        ColumnDef::new(Documents::UpdateTime)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 集合查询索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_documents_parent_path")
                    .table(Documents::Table)
                    .col(Documents::ParentPath)
                    .to_owned(),
            )
            .await?;

        // 集合组查询索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_documents_collection_id")
                    .table(Documents::Table)
                    .col(Documents::CollectionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Documents::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Documents {
    Table,
    Path,
    ParentPath,
    CollectionId,
    Data,
    Version,
    UpdateTime,
}

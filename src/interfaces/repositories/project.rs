use async_trait::async_trait;
use sqlx::{self, types::Json, PgPool, Postgres, QueryBuilder};

use crate::{
    entities::{
        locale::Locale,
        project::{Project, ProjectRow},
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxProjectRepo,
};

const PROJECT_COLUMNS: &str = "slug, original_id, locale, title, description, technologies, images, \
     status, sort_order, seo, created_at, updated_at";

/// Helper to compute OFFSET safely from 1-based `page` and `per_page`.
fn page_offset(page: u32, per_page: u32) -> i64 {
    let page = page.saturating_sub(1);
    (page as i64) * (per_page as i64)
}

/// Storage of per-locale project records. Records are addressed either by
/// `(locale, slug)` or by `(locale, original_id)`; both pairs are unique.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Sync + Send {
    async fn find_by_slug(&self, locale: Locale, slug: &str) -> Result<Option<Project>, AppError>;
    async fn find_by_original_id(&self, locale: Locale, original_id: &str) -> Result<Option<Project>, AppError>;
    async fn find_by_slug_or_original_id(&self, locale: Locale, key: &str) -> Result<Option<Project>, AppError>;
    async fn list_projects(&self, locale: Locale, published_only: bool, page: u32, per_page: u32) -> Result<Vec<Project>, AppError>;
    async fn count_projects(&self, locale: Locale, published_only: bool) -> Result<i64, AppError>;
    /// Every published record in both locales, for the sitemap.
    async fn list_published(&self) -> Result<Vec<Project>, AppError>;
    async fn next_order(&self, locale: Locale) -> Result<i32, AppError>;
    async fn insert_project(&self, project: &Project) -> Result<Project, AppError>;
    /// Overwrites every field except `original_id`, matched on `(locale, original_id)`.
    async fn update_project(&self, project: &Project) -> Result<Project, AppError>;
    async fn set_images(&self, locale: Locale, original_id: &str, images: &[String]) -> Result<bool, AppError>;
    async fn set_order(&self, locale: Locale, original_id: &str, order: i32) -> Result<bool, AppError>;
    async fn delete_project(&self, locale: Locale, original_id: &str) -> Result<bool, AppError>;
    /// Whether any record outside `excluding_original_id` still lists `url`.
    async fn image_in_use(&self, url: &str, excluding_original_id: &str) -> Result<bool, AppError>;
    async fn check_connection(&self) -> Result<(), AppError>;
}

impl SqlxProjectRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxProjectRepo { pool }
    }

    async fn fetch_optional(&self, locale: Locale, column: &str, value: &str) -> Result<Option<Project>, AppError> {
        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE locale = "));
        query.push_bind(locale.as_str());
        query.push(format!(" AND {column} = "));
        query.push_bind(value);

        query
            .build_query_as::<ProjectRow>()
            .fetch_optional(&self.pool)
            .await?
            .map(Project::try_from)
            .transpose()
    }
}

fn map_conflict(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        match db_err.constraint() {
            Some("projects_pkey") => return AppError::Conflict("Slug already exists in this locale".into()),
            Some("projects_locale_original_id_key") => {
                return AppError::Conflict("A record for this originalId already exists in this locale".into());
            }
            _ => {}
        }
    }
    AppError::from(e)
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn find_by_slug(&self, locale: Locale, slug: &str) -> Result<Option<Project>, AppError> {
        self.fetch_optional(locale, "slug", slug).await
    }

    async fn find_by_original_id(&self, locale: Locale, original_id: &str) -> Result<Option<Project>, AppError> {
        self.fetch_optional(locale, "original_id", original_id).await
    }

    async fn find_by_slug_or_original_id(&self, locale: Locale, key: &str) -> Result<Option<Project>, AppError> {
        // Slug matches win over originalId matches.
        let sql = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects \
             WHERE locale = $1 AND (slug = $2 OR original_id = $2) \
             ORDER BY (slug = $2) DESC LIMIT 1"
        );

        sqlx::query_as::<_, ProjectRow>(&sql)
            .bind(locale.as_str())
            .bind(key)
            .fetch_optional(&self.pool)
            .await?
            .map(Project::try_from)
            .transpose()
    }

    async fn list_projects(&self, locale: Locale, published_only: bool, page: u32, per_page: u32) -> Result<Vec<Project>, AppError> {
        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE locale = "));
        query.push_bind(locale.as_str());

        if published_only {
            query.push(" AND status = TRUE");
        }

        query.push(" ORDER BY sort_order ASC, created_at DESC LIMIT ");
        query.push_bind(per_page as i64);
        query.push(" OFFSET ");
        query.push_bind(page_offset(page, per_page));

        let rows = query.build_query_as::<ProjectRow>().fetch_all(&self.pool).await?;
        rows.into_iter().map(Project::try_from).collect()
    }

    async fn count_projects(&self, locale: Locale, published_only: bool) -> Result<i64, AppError> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM projects WHERE locale = ");
        query.push_bind(locale.as_str());

        if published_only {
            query.push(" AND status = TRUE");
        }

        let count: i64 = query.build_query_scalar().fetch_one(&self.pool).await?;
        Ok(count)
    }

    async fn list_published(&self) -> Result<Vec<Project>, AppError> {
        let sql = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE status = TRUE \
             ORDER BY locale, sort_order ASC, created_at DESC"
        );

        let rows = sqlx::query_as::<_, ProjectRow>(&sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(Project::try_from).collect()
    }

    async fn next_order(&self, locale: Locale) -> Result<i32, AppError> {
        let next: i32 = sqlx::query_scalar("SELECT COALESCE(MAX(sort_order) + 1, 0) FROM projects WHERE locale = $1")
            .bind(locale.as_str())
            .fetch_one(&self.pool)
            .await?;

        Ok(next)
    }

    async fn insert_project(&self, project: &Project) -> Result<Project, AppError> {
        let sql = format!(
            "INSERT INTO projects ({PROJECT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {PROJECT_COLUMNS}"
        );

        let row = sqlx::query_as::<_, ProjectRow>(&sql)
            .bind(&project.id)
            .bind(&project.original_id)
            .bind(project.locale.as_str())
            .bind(&project.title)
            .bind(&project.description)
            .bind(&project.technologies)
            .bind(&project.images)
            .bind(project.status)
            .bind(project.order)
            .bind(Json(&project.seo))
            .bind(project.created_at)
            .bind(project.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_conflict)?;

        Project::try_from(row)
    }

    async fn update_project(&self, project: &Project) -> Result<Project, AppError> {
        let sql = format!(
            "UPDATE projects SET \
                slug = $3, title = $4, description = $5, technologies = $6, images = $7, \
                status = $8, sort_order = $9, seo = $10, updated_at = $11 \
             WHERE locale = $1 AND original_id = $2 \
             RETURNING {PROJECT_COLUMNS}"
        );

        let row = sqlx::query_as::<_, ProjectRow>(&sql)
            .bind(project.locale.as_str())
            .bind(&project.original_id)
            .bind(&project.id)
            .bind(&project.title)
            .bind(&project.description)
            .bind(&project.technologies)
            .bind(&project.images)
            .bind(project.status)
            .bind(project.order)
            .bind(Json(&project.seo))
            .bind(project.updated_at)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_conflict)?
            .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

        Project::try_from(row)
    }

    async fn set_images(&self, locale: Locale, original_id: &str, images: &[String]) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE projects SET images = $3, updated_at = NOW() WHERE locale = $1 AND original_id = $2",
        )
        .bind(locale.as_str())
        .bind(original_id)
        .bind(images)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_order(&self, locale: Locale, original_id: &str, order: i32) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE projects SET sort_order = $3, updated_at = NOW() WHERE locale = $1 AND original_id = $2",
        )
        .bind(locale.as_str())
        .bind(original_id)
        .bind(order)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_project(&self, locale: Locale, original_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE locale = $1 AND original_id = $2")
            .bind(locale.as_str())
            .bind(original_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn image_in_use(&self, url: &str, excluding_original_id: &str) -> Result<bool, AppError> {
        let in_use: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM projects WHERE $1 = ANY(images) AND original_id <> $2)",
        )
        .bind(url)
        .bind(excluding_original_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(in_use)
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_one_based() {
        assert_eq!(page_offset(0, 10), 0);
        assert_eq!(page_offset(1, 10), 0);
        assert_eq!(page_offset(3, 25), 50);
    }
}

use anyhow::{anyhow, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use super::Store;
use crate::core::{current_time_millis, ProjectId, UserId};
use crate::models::{Project, ProjectVisibility};

fn project_from_row(row: &SqliteRow) -> Result<Project> {
    let visibility: String = row.try_get("visibility")?;
    let technologies: String = row.try_get("technologies")?;
    let attachments: String = row.try_get("attachments")?;

    Ok(Project {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        visibility: ProjectVisibility::parse(&visibility)
            .ok_or_else(|| anyhow!("unknown project visibility: {}", visibility))?,
        technologies: serde_json::from_str(&technologies)?,
        attachments: serde_json::from_str(&attachments)?,
        stars_count: row.try_get("stars_count")?,
        forks_count: row.try_get("forks_count")?,
        forked_from: row.try_get("forked_from")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

const PROJECT_COLUMNS: &str = "id, user_id, title, description, visibility, technologies, \
     attachments, stars_count, forks_count, forked_from, created_at, updated_at";

impl Store {
    pub async fn insert_project(&self, project: &Project) -> Result<Project> {
        let result = sqlx::query(
            "INSERT INTO projects (user_id, title, description, visibility, technologies, \
             attachments, forked_from, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(project.user_id)
        .bind(&project.title)
        .bind(&project.description)
        .bind(project.visibility.as_str())
        .bind(serde_json::to_string(&project.technologies)?)
        .bind(serde_json::to_string(&project.attachments)?)
        .bind(project.forked_from)
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        self.get_project(id)
            .await?
            .ok_or_else(|| anyhow!("project {} missing after insert", id))
    }

    /// Copies a source project for `new_owner` and bumps the source's fork
    /// counter in the same transaction.
    pub async fn insert_fork(&self, source: &Project, new_owner: UserId) -> Result<ProjectId> {
        let now = current_time_millis();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO projects (user_id, title, description, visibility, technologies, \
             attachments, forked_from, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(new_owner)
        .bind(&source.title)
        .bind(&source.description)
        .bind(source.visibility.as_str())
        .bind(serde_json::to_string(&source.technologies)?)
        .bind(serde_json::to_string(&source.attachments)?)
        .bind(source.id)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let fork_id = result.last_insert_rowid();

        sqlx::query("UPDATE projects SET forks_count = forks_count + 1 WHERE id = ?")
            .bind(source.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(fork_id)
    }

    pub async fn get_project(&self, id: ProjectId) -> Result<Option<Project>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM projects WHERE id = ?",
            PROJECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(project_from_row).transpose()
    }

    pub async fn update_project(&self, project: &Project) -> Result<()> {
        sqlx::query(
            "UPDATE projects SET title = ?, description = ?, visibility = ?, technologies = ?, \
             attachments = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&project.title)
        .bind(&project.description)
        .bind(project.visibility.as_str())
        .bind(serde_json::to_string(&project.technologies)?)
        .bind(serde_json::to_string(&project.attachments)?)
        .bind(project.updated_at)
        .bind(project.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_project(&self, id: ProjectId) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM project_stars WHERE project_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Listing filtered to what the viewer may see: public for everyone,
    /// internal for any signed-in viewer, private for the owner only.
    pub async fn get_projects_visible_to(
        &self,
        viewer: Option<UserId>,
        limit: i64,
    ) -> Result<Vec<Project>> {
        let rows = match viewer {
            None => {
                sqlx::query(&format!(
                    "SELECT {} FROM projects WHERE visibility = 'public' \
                     ORDER BY created_at DESC LIMIT ?",
                    PROJECT_COLUMNS
                ))
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            Some(viewer_id) => {
                sqlx::query(&format!(
                    "SELECT {} FROM projects WHERE visibility IN ('public', 'internal') \
                     OR (visibility = 'private' AND user_id = ?) \
                     ORDER BY created_at DESC LIMIT ?",
                    PROJECT_COLUMNS
                ))
                .bind(viewer_id)
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter().map(project_from_row).collect()
    }

    pub async fn get_projects_by_owner(
        &self,
        owner_id: UserId,
        include_hidden: bool,
        signed_in_viewer: bool,
    ) -> Result<Vec<Project>> {
        let sql = if include_hidden {
            format!(
                "SELECT {} FROM projects WHERE user_id = ? ORDER BY created_at DESC",
                PROJECT_COLUMNS
            )
        } else if signed_in_viewer {
            format!(
                "SELECT {} FROM projects WHERE user_id = ? \
                 AND visibility IN ('public', 'internal') ORDER BY created_at DESC",
                PROJECT_COLUMNS
            )
        } else {
            format!(
                "SELECT {} FROM projects WHERE user_id = ? AND visibility = 'public' \
                 ORDER BY created_at DESC",
                PROJECT_COLUMNS
            )
        };

        let rows = sqlx::query(&sql).bind(owner_id).fetch_all(&self.pool).await?;
        rows.iter().map(project_from_row).collect()
    }

    // -- stars ---------------------------------------------------------------

    pub async fn get_star(&self, project_id: ProjectId, user_id: UserId) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM project_stars WHERE project_id = ? AND user_id = ?")
            .bind(project_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.is_some())
    }

    pub async fn insert_star(&self, project_id: ProjectId, user_id: UserId) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO project_stars (project_id, user_id, created_at) VALUES (?, ?, ?)")
            .bind(project_id)
            .bind(user_id)
            .bind(current_time_millis())
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE projects SET stars_count = stars_count + 1 WHERE id = ?")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    pub async fn delete_star(&self, project_id: ProjectId, user_id: UserId) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM project_stars WHERE project_id = ? AND user_id = ?")
            .bind(project_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("UPDATE projects SET stars_count = stars_count - 1 WHERE id = ?")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }
}

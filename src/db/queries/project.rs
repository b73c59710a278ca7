use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::project::{
    ApprovedProject, ContributorGrant, NewApprovedProject, NewProject, Project,
    ProjectContributor, UpdateProject,
};
use crate::error::{Result, StoreError};

/// Data access for the project catalog, contributor membership, and the
/// pre-vetted approved-project list.
pub struct ProjectStore {
    pool: PgPool,
}

impl ProjectStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewProject) -> Result<Project> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (id, name, description, url, license, owner_id, language, stars, forks, is_public)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.url)
        .bind(&new.license)
        .bind(new.owner_id)
        .bind(&new.language)
        .bind(new.stars)
        .bind(new.forks)
        .bind(new.is_public)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    pub async fn get(&self, id: Uuid) -> Result<Project> {
        sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StoreError::not_found("project", id))
    }

    pub async fn update(&self, id: Uuid, update: UpdateProject) -> Result<Project> {
        sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET name = $2, description = $3, url = $4, license = $5, status = $6,
                language = $7, stars = $8, forks = $9, is_public = $10, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.description)
        .bind(&update.url)
        .bind(&update.license)
        .bind(&update.status)
        .bind(&update.language)
        .bind(update.stars)
        .bind(update.forks)
        .bind(update.is_public)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::not_found("project", id))
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT * FROM projects ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    /// Idempotent delete. Contributor rows cascade with the project.
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn by_owner(&self, owner_id: Uuid, limit: i64, offset: i64) -> Result<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT * FROM projects
            WHERE owner_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    /// Projects where the user holds a contributor role other than "owner",
    /// most recently joined first.
    pub async fn by_contributor(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT p.*
            FROM projects p
            INNER JOIN project_contributors pc ON p.id = pc.project_id
            WHERE pc.user_id = $1 AND pc.role != 'owner'
            ORDER BY pc.joined_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    /// Projects linked to an approved request of the user, joined by project
    /// id or by denormalized name. Some requests carry only a name, so the
    /// name join is a deliberate fallback; DISTINCT suppresses rows matched
    /// by both paths.
    pub async fn approved_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT DISTINCT p.*
            FROM projects p
            INNER JOIN requests r ON p.id = r.project_id OR p.name = r.project_name
            WHERE r.requester_id = $1 AND r.status = 'approved'
            ORDER BY p.created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    /// Case-insensitive substring match on name or description over public
    /// projects, most-starred first.
    pub async fn search(&self, text: &str, limit: i64, offset: i64) -> Result<Vec<Project>> {
        let pattern = format!("%{text}%");
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT * FROM projects
            WHERE (name ILIKE $1 OR description ILIKE $1) AND is_public = true
            ORDER BY stars DESC, created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    /// Upsert a contributor: re-adding an existing (project, user) pair
    /// replaces role and permissions wholesale instead of duplicating.
    pub async fn add_contributor(
        &self,
        project_id: Uuid,
        user_id: Uuid,
        grant: ContributorGrant,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO project_contributors (project_id, user_id, role, permissions)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (project_id, user_id)
            DO UPDATE SET role = EXCLUDED.role, permissions = EXCLUDED.permissions
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .bind(&grant.role)
        .bind(&grant.permissions)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn remove_contributor(&self, project_id: Uuid, user_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM project_contributors WHERE project_id = $1 AND user_id = $2")
            .bind(project_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Contributor listing joined with user display fields, earliest joined
    /// first.
    pub async fn contributors(&self, project_id: Uuid) -> Result<Vec<ProjectContributor>> {
        let contributors = sqlx::query_as::<_, ProjectContributor>(
            r#"
            SELECT pc.id, pc.project_id, pc.user_id, pc.role, pc.permissions, pc.joined_at,
                   u.corporate_id, u.github_username, u.full_name
            FROM project_contributors pc
            INNER JOIN users u ON pc.user_id = u.id
            WHERE pc.project_id = $1
            ORDER BY pc.joined_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(contributors)
    }

    /// Approved projects are reference data; creation is their only
    /// mutation path.
    pub async fn create_approved_project(
        &self,
        new: NewApprovedProject,
    ) -> Result<ApprovedProject> {
        let project = sqlx::query_as::<_, ApprovedProject>(
            r#"
            INSERT INTO approved_projects (id, name, description, repository_url, license, maintainer_contact, allowed_contribution_types)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.repository_url)
        .bind(&new.license)
        .bind(&new.maintainer_contact)
        .bind(&new.allowed_contribution_types)
        .fetch_one(&self.pool)
        .await?;

        Ok(project)
    }

    pub async fn list_approved_projects(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ApprovedProject>> {
        let projects = sqlx::query_as::<_, ApprovedProject>(
            r#"
            SELECT * FROM approved_projects
            WHERE is_active = true
            ORDER BY approval_date DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }
}

//! Repository for the `projects` table and the tag collection it owns.

use std::collections::HashMap;

use sqlx::{Sqlite, SqlitePool, Transaction};
use yarnstash_core::project::ProjectFields;
use yarnstash_core::search::{self, MatchCase, LIKE_ESCAPE};
use yarnstash_core::tags::{plan_reconciliation, TagPlan, TagSlot};
use yarnstash_core::types::DbId;

use crate::models::project::{Project, ProjectDetail};
use crate::models::project_image::ProjectImage;
use crate::models::tag::Tag;
use crate::repositories::project_image_repo::{self, ProjectImageRepo};
use crate::repositories::tag_repo::{self, TagRepo};
use crate::repositories::{placeholders, NOW_SQL};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, status, difficulty, image_url, \
     started_at, finished_at, created_at, updated_at";

/// Provides CRUD, search and tag reconciliation for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a project and its initial tags in one transaction.
    ///
    /// `tags` goes through the same reconciliation as an update against an
    /// empty collection, so empty and repeated labels are skipped.
    pub async fn create(
        pool: &SqlitePool,
        fields: &ProjectFields,
        tags: &[String],
    ) -> Result<ProjectDetail, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO projects \
                (name, description, status, difficulty, image_url, started_at, finished_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?) \
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(&fields.name)
            .bind(&fields.description)
            .bind(fields.status.as_str())
            .bind(fields.difficulty.as_str())
            .bind(&fields.image_url)
            .bind(fields.started_at)
            .bind(fields.finished_at)
            .fetch_one(&mut *tx)
            .await?;

        let plan = plan_reconciliation(std::iter::empty(), tags);
        let tags = apply_tag_plan(&mut tx, project.id, &plan).await?;

        tx.commit().await?;

        Ok(ProjectDetail {
            project,
            tags,
            images: Vec::new(),
        })
    }

    /// Find a project by its ID.
    pub async fn find_by_id(pool: &SqlitePool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = ?");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project with its tags and images.
    pub async fn find_detail(
        pool: &SqlitePool,
        id: DbId,
    ) -> Result<Option<ProjectDetail>, sqlx::Error> {
        let Some(project) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let tags = TagRepo::list_by_project(pool, id).await?;
        let images = ProjectImageRepo::list_by_project(pool, id).await?;
        Ok(Some(ProjectDetail {
            project,
            tags,
            images,
        }))
    }

    /// List all projects, most recently created first.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<ProjectDetail>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY id DESC");
        let projects = sqlx::query_as::<_, Project>(&query).fetch_all(pool).await?;
        with_children(pool, projects).await
    }

    /// Multi-keyword search over name, description and tag labels.
    ///
    /// Every whitespace-separated keyword must match at least one of the
    /// three fields as a substring. Each project appears at most once,
    /// most recently created first. A blank query lists everything.
    pub async fn search(
        pool: &SqlitePool,
        query: &str,
        match_case: MatchCase,
    ) -> Result<Vec<ProjectDetail>, sqlx::Error> {
        let keywords = search::split_keywords(query);
        if keywords.is_empty() {
            return Self::list(pool).await;
        }

        let condition = match match_case {
            MatchCase::Insensitive => format!(
                "(p.name LIKE ? ESCAPE '{LIKE_ESCAPE}' \
                  OR p.description LIKE ? ESCAPE '{LIKE_ESCAPE}' \
                  OR EXISTS (SELECT 1 FROM tags t \
                             WHERE t.project_id = p.id AND t.label LIKE ? ESCAPE '{LIKE_ESCAPE}'))"
            ),
            MatchCase::Sensitive => "(instr(p.name, ?) > 0 \
                  OR instr(p.description, ?) > 0 \
                  OR EXISTS (SELECT 1 FROM tags t \
                             WHERE t.project_id = p.id AND instr(t.label, ?) > 0))"
                .to_string(),
        };
        let where_clause = vec![condition.as_str(); keywords.len()].join(" AND ");

        let sql = format!(
            "SELECT {COLUMNS} FROM projects p WHERE {where_clause} ORDER BY p.id DESC"
        );

        let mut q = sqlx::query_as::<_, Project>(&sql);
        for keyword in &keywords {
            let term = match match_case {
                MatchCase::Insensitive => search::like_pattern(keyword),
                MatchCase::Sensitive => keyword.to_string(),
            };
            q = q.bind(term.clone()).bind(term.clone()).bind(term);
        }
        let projects = q.fetch_all(pool).await?;

        tracing::debug!(keywords = keywords.len(), hits = projects.len(), "Project search");
        with_children(pool, projects).await
    }

    /// Overwrite a project's scalar fields and, when `tags` is given,
    /// reconcile its tag collection, all in one transaction.
    ///
    /// Returns `None` if no project with the given `id` exists.
    pub async fn update(
        pool: &SqlitePool,
        id: DbId,
        fields: &ProjectFields,
        tags: Option<&[String]>,
    ) -> Result<Option<ProjectDetail>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE projects SET \
                name = ?, description = ?, status = ?, difficulty = ?, image_url = ?, \
                started_at = ?, finished_at = ?, updated_at = {NOW_SQL} \
             WHERE id = ? \
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, Project>(&query)
            .bind(&fields.name)
            .bind(&fields.description)
            .bind(fields.status.as_str())
            .bind(fields.difficulty.as_str())
            .bind(&fields.image_url)
            .bind(fields.started_at)
            .bind(fields.finished_at)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(project) = updated else {
            return Ok(None);
        };

        let tags = match tags {
            Some(labels) => {
                let stored = fetch_tags(&mut tx, id).await?;
                let plan = plan_reconciliation(
                    stored.iter().map(|t| (t.id, t.label.as_str())),
                    labels,
                );
                if !plan.is_noop() {
                    tracing::debug!(
                        project_id = id,
                        created = plan.to_create.len(),
                        deleted = plan.to_delete.len(),
                        "Reconciling project tags"
                    );
                }
                apply_tag_plan(&mut tx, id, &plan).await?
            }
            None => fetch_tags(&mut tx, id).await?,
        };

        tx.commit().await?;

        let images = ProjectImageRepo::list_by_project(pool, id).await?;
        Ok(Some(ProjectDetail {
            project,
            tags,
            images,
        }))
    }

    /// Delete a project. Tags and images are removed by cascade.
    ///
    /// Returns the image URLs the project referenced (its own image first,
    /// then each gallery image), or `None` if no such project exists.
    pub async fn delete(pool: &SqlitePool, id: DbId) -> Result<Option<Vec<String>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let own_image = sqlx::query_scalar::<_, Option<String>>(
            "SELECT image_url FROM projects WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(own_image) = own_image else {
            return Ok(None);
        };

        let gallery = sqlx::query_scalar::<_, String>(
            "SELECT image_url FROM project_images WHERE project_id = ? ORDER BY id",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(own_image.into_iter().chain(gallery).collect()))
    }
}

/// Stored tags of a project, in collection order.
async fn fetch_tags(
    tx: &mut Transaction<'_, Sqlite>,
    project_id: DbId,
) -> Result<Vec<Tag>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM tags WHERE project_id = ? ORDER BY position, id",
        tag_repo::COLUMNS
    );
    sqlx::query_as::<_, Tag>(&query)
        .bind(project_id)
        .fetch_all(&mut **tx)
        .await
}

/// Execute a reconciliation plan and return the resulting collection.
async fn apply_tag_plan(
    tx: &mut Transaction<'_, Sqlite>,
    project_id: DbId,
    plan: &TagPlan,
) -> Result<Vec<Tag>, sqlx::Error> {
    for tag_id in &plan.to_delete {
        sqlx::query("DELETE FROM tags WHERE id = ?")
            .bind(tag_id)
            .execute(&mut **tx)
            .await?;
    }

    let mut created = Vec::with_capacity(plan.to_create.len());
    for label in &plan.to_create {
        let id = sqlx::query_scalar::<_, DbId>(
            "INSERT INTO tags (project_id, label) VALUES (?, ?) RETURNING id",
        )
        .bind(project_id)
        .bind(label)
        .fetch_one(&mut **tx)
        .await?;
        created.push(id);
    }

    for (position, slot) in plan.slots.iter().enumerate() {
        let tag_id = match slot {
            TagSlot::Keep(id) => *id,
            TagSlot::Create(index) => created[*index],
        };
        sqlx::query("UPDATE tags SET position = ? WHERE id = ?")
            .bind(position as i64)
            .bind(tag_id)
            .execute(&mut **tx)
            .await?;
    }

    fetch_tags(tx, project_id).await
}

/// Attach tags and images to a list of projects, keeping the list order.
async fn with_children(
    pool: &SqlitePool,
    projects: Vec<Project>,
) -> Result<Vec<ProjectDetail>, sqlx::Error> {
    if projects.is_empty() {
        return Ok(Vec::new());
    }
    let ids = placeholders(projects.len());

    let tag_query = format!(
        "SELECT {} FROM tags WHERE project_id IN ({ids}) ORDER BY position, id",
        tag_repo::COLUMNS
    );
    let mut q = sqlx::query_as::<_, Tag>(&tag_query);
    for project in &projects {
        q = q.bind(project.id);
    }
    let mut tags_by_project: HashMap<DbId, Vec<Tag>> = HashMap::new();
    for tag in q.fetch_all(pool).await? {
        tags_by_project.entry(tag.project_id).or_default().push(tag);
    }

    let image_query = format!(
        "SELECT {} FROM project_images WHERE project_id IN ({ids}) ORDER BY id",
        project_image_repo::COLUMNS
    );
    let mut q = sqlx::query_as::<_, ProjectImage>(&image_query);
    for project in &projects {
        q = q.bind(project.id);
    }
    let mut images_by_project: HashMap<DbId, Vec<ProjectImage>> = HashMap::new();
    for image in q.fetch_all(pool).await? {
        images_by_project
            .entry(image.project_id)
            .or_default()
            .push(image);
    }

    Ok(projects
        .into_iter()
        .map(|project| ProjectDetail {
            tags: tags_by_project.remove(&project.id).unwrap_or_default(),
            images: images_by_project.remove(&project.id).unwrap_or_default(),
            project,
        })
        .collect())
}

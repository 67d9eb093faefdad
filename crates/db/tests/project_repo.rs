//! Integration tests for project persistence, tag reconciliation and search.

use std::collections::BTreeSet;

use chrono::Utc;
use sqlx::SqlitePool;
use yarnstash_core::labels::ProjectStatus;
use yarnstash_core::project::ProjectFields;
use yarnstash_core::search::MatchCase;
use yarnstash_db::models::project_image::CreateProjectImage;
use yarnstash_db::models::tag::Tag;
use yarnstash_db::repositories::{ProjectImageRepo, ProjectRepo, TagRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn named(name: &str, description: &str) -> ProjectFields {
    ProjectFields {
        name: name.to_string(),
        description: description.to_string(),
        ..ProjectFields::default()
    }
}

fn labels(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn label_list(tags: &[Tag]) -> Vec<&str> {
    tags.iter().map(|t| t.label.as_str()).collect()
}

fn id_of(tags: &[Tag], label: &str) -> i64 {
    tags.iter().find(|t| t.label == label).unwrap().id
}

// ---------------------------------------------------------------------------
// Create / read
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_create_with_tags(pool: SqlitePool) {
    let detail = ProjectRepo::create(&pool, &named("Beanie", ""), &labels(&["Hat", "Gift"]))
        .await
        .unwrap();

    assert_eq!(detail.project.name, "Beanie");
    assert_eq!(detail.project.status, ProjectStatus::NotStarted);
    assert_eq!(label_list(&detail.tags), vec!["Hat", "Gift"]);
    assert!(detail.images.is_empty());

    let loaded = ProjectRepo::find_detail(&pool, detail.project.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(label_list(&loaded.tags), vec!["Hat", "Gift"]);
    assert_eq!(loaded.project.created_at, detail.project.created_at);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_create_collapses_duplicate_labels(pool: SqlitePool) {
    let detail = ProjectRepo::create(&pool, &named("Scarf", ""), &labels(&["A", "A", ""]))
        .await
        .unwrap();
    assert_eq!(label_list(&detail.tags), vec!["A"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_dates_round_trip(pool: SqlitePool) {
    let now = Utc::now();
    let fields = ProjectFields {
        status: ProjectStatus::Wip,
        started_at: Some(now),
        ..named("Socks", "")
    };
    let created = ProjectRepo::create(&pool, &fields, &[]).await.unwrap();
    let loaded = ProjectRepo::find_by_id(&pool, created.project.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.started_at, Some(now));
    assert!(loaded.finished_at.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_find_missing_returns_none(pool: SqlitePool) {
    assert!(ProjectRepo::find_detail(&pool, 999).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Tag reconciliation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_reconciliation_converges_and_keeps_ids(pool: SqlitePool) {
    let created = ProjectRepo::create(&pool, &named("Blanket", ""), &labels(&["A", "B", "C"]))
        .await
        .unwrap();
    let id = created.project.id;
    let a = id_of(&created.tags, "A");
    let b = id_of(&created.tags, "B");
    let c = id_of(&created.tags, "C");

    let updated = ProjectRepo::update(&pool, id, &created.project.fields(), Some(&labels(&["B", "C", "D"])))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(label_list(&updated.tags), vec!["B", "C", "D"]);
    assert_eq!(id_of(&updated.tags, "B"), b);
    assert_eq!(id_of(&updated.tags, "C"), c);
    assert!(TagRepo::find_by_id(&pool, a).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reconciliation_is_idempotent(pool: SqlitePool) {
    let created = ProjectRepo::create(&pool, &named("Mittens", ""), &[]).await.unwrap();
    let id = created.project.id;
    let fields = created.project.fields();
    let wanted = labels(&["Warm", "Gift"]);

    let first = ProjectRepo::update(&pool, id, &fields, Some(&wanted))
        .await
        .unwrap()
        .unwrap();
    let second = ProjectRepo::update(&pool, id, &fields, Some(&wanted))
        .await
        .unwrap()
        .unwrap();

    let ids = |tags: &[Tag]| tags.iter().map(|t| t.id).collect::<BTreeSet<_>>();
    assert_eq!(ids(&first.tags), ids(&second.tags));
    assert_eq!(TagRepo::list(&pool).await.unwrap().len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_without_tags_key_keeps_tags(pool: SqlitePool) {
    let created = ProjectRepo::create(&pool, &named("Cowl", ""), &labels(&["Neck"]))
        .await
        .unwrap();
    let mut fields = created.project.fields();
    fields.name = "Big cowl".into();

    let updated = ProjectRepo::update(&pool, created.project.id, &fields, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.project.name, "Big cowl");
    assert_eq!(updated.tags[0].id, created.tags[0].id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_order_follows_request(pool: SqlitePool) {
    let created = ProjectRepo::create(&pool, &named("Shawl", ""), &labels(&["A", "B"]))
        .await
        .unwrap();
    let updated = ProjectRepo::update(
        &pool,
        created.project.id,
        &created.project.fields(),
        Some(&labels(&["New", "B", "A"])),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(label_list(&updated.tags), vec!["New", "B", "A"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_missing_project_returns_none(pool: SqlitePool) {
    let result = ProjectRepo::update(&pool, 42, &named("x", ""), Some(&labels(&["A"])))
        .await
        .unwrap();
    assert!(result.is_none());
    assert!(TagRepo::list(&pool).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_cascades_and_reports_files(pool: SqlitePool) {
    let fields = ProjectFields {
        image_url: Some("http://localhost:3000/uploads/cover.png".into()),
        ..named("Cardigan", "")
    };
    let created = ProjectRepo::create(&pool, &fields, &labels(&["Top"])).await.unwrap();
    let id = created.project.id;
    for name in ["a.jpg", "b.jpg"] {
        ProjectImageRepo::create(
            &pool,
            &CreateProjectImage {
                project_id: id,
                image_url: format!("http://localhost:3000/uploads/{name}"),
                caption: String::new(),
            },
        )
        .await
        .unwrap();
    }

    let files = ProjectRepo::delete(&pool, id).await.unwrap().unwrap();
    assert_eq!(
        files,
        vec![
            "http://localhost:3000/uploads/cover.png",
            "http://localhost:3000/uploads/a.jpg",
            "http://localhost:3000/uploads/b.jpg",
        ]
    );

    assert!(ProjectRepo::find_by_id(&pool, id).await.unwrap().is_none());
    assert!(TagRepo::list_by_project(&pool, id).await.unwrap().is_empty());
    assert!(ProjectImageRepo::list_by_project(&pool, id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_missing_returns_none(pool: SqlitePool) {
    assert!(ProjectRepo::delete(&pool, 7).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_search_requires_every_keyword(pool: SqlitePool) {
    let beanie = ProjectRepo::create(&pool, &named("Blue Beanie", ""), &labels(&["Yarn"]))
        .await
        .unwrap();
    ProjectRepo::create(&pool, &named("Scarf", "A blue scarf"), &[])
        .await
        .unwrap();

    let hits = ProjectRepo::search(&pool, "blue yarn", MatchCase::Insensitive)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].project.id, beanie.project.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_search_deduplicates_tag_matches(pool: SqlitePool) {
    ProjectRepo::create(&pool, &named("Hat", ""), &labels(&["wool", "wool blend"]))
        .await
        .unwrap();
    let hits = ProjectRepo::search(&pool, "wool", MatchCase::Insensitive)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].tags.len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_search_orders_newest_first_and_blank_lists_all(pool: SqlitePool) {
    let older = ProjectRepo::create(&pool, &named("Sock one", ""), &[]).await.unwrap();
    let newer = ProjectRepo::create(&pool, &named("Sock two", ""), &[]).await.unwrap();

    let hits = ProjectRepo::search(&pool, "sock", MatchCase::Insensitive)
        .await
        .unwrap();
    let ids: Vec<_> = hits.iter().map(|d| d.project.id).collect();
    assert_eq!(ids, vec![newer.project.id, older.project.id]);

    let all = ProjectRepo::search(&pool, "   ", MatchCase::Insensitive)
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_search_case_sensitive_mode(pool: SqlitePool) {
    ProjectRepo::create(&pool, &named("Blue Beanie", ""), &[]).await.unwrap();

    let insensitive = ProjectRepo::search(&pool, "blue", MatchCase::Insensitive)
        .await
        .unwrap();
    let sensitive = ProjectRepo::search(&pool, "blue", MatchCase::Sensitive)
        .await
        .unwrap();
    let exact = ProjectRepo::search(&pool, "Blue", MatchCase::Sensitive)
        .await
        .unwrap();

    assert_eq!(insensitive.len(), 1);
    assert!(sensitive.is_empty());
    assert_eq!(exact.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_search_treats_wildcards_literally(pool: SqlitePool) {
    ProjectRepo::create(&pool, &named("100% wool", ""), &[]).await.unwrap();
    ProjectRepo::create(&pool, &named("1000 stitches", ""), &[]).await.unwrap();

    let hits = ProjectRepo::search(&pool, "100%", MatchCase::Insensitive)
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].project.name, "100% wool");
}

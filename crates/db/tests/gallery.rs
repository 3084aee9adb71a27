//! Integration tests for photo persistence and the single-main index.

use chrono::NaiveDate;
use rendezvous_db::models::member::{CreateMember, Member};
use rendezvous_db::models::photo::CreatePhoto;
use rendezvous_db::repositories::{MemberRepo, PhotoRepo};
use rendezvous_db::unit_of_work::UnitOfWork;
use sqlx::PgPool;

async fn member(pool: &PgPool, username: &str) -> Member {
    MemberRepo::create(
        pool,
        &CreateMember {
            username: username.to_string(),
            known_as: username.to_string(),
            gender: "female".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1994, 2, 2).unwrap(),
            city: None,
            country: None,
        },
    )
    .await
    .unwrap()
}

fn photo(member_id: i64, n: u32, is_main: bool) -> CreatePhoto {
    CreatePhoto {
        member_id,
        url: format!("https://media.test/{n}.jpg"),
        public_id: Some(format!("asset-{n}")),
        is_main,
    }
}

// ---------------------------------------------------------------------------
// Test: a second main photo violates uq_photos_single_main
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_main_photo_is_rejected_by_index(pool: PgPool) {
    let m = member(&pool, "ana").await;

    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    PhotoRepo::insert(uow.conn(), &photo(m.id, 1, true))
        .await
        .unwrap();
    let err = PhotoRepo::insert(uow.conn(), &photo(m.id, 2, true))
        .await
        .unwrap_err();

    let db_err = err.as_database_error().expect("expected a database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_photos_single_main"));
}

/// Different members may each have their own main photo.
#[sqlx::test(migrations = "../../db/migrations")]
async fn main_photo_index_is_per_member(pool: PgPool) {
    let ana = member(&pool, "ana").await;
    let bea = member(&pool, "bea").await;

    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    PhotoRepo::insert(uow.conn(), &photo(ana.id, 1, true))
        .await
        .unwrap();
    PhotoRepo::insert(uow.conn(), &photo(bea.id, 2, true))
        .await
        .unwrap();
    uow.commit().await.unwrap();

    assert_eq!(PhotoRepo::list_for_member(&pool, ana.id).await.unwrap().len(), 1);
    assert_eq!(PhotoRepo::list_for_member(&pool, bea.id).await.unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: swap_main moves the flag inside one unit of work
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn swap_main_moves_flag(pool: PgPool) {
    let m = member(&pool, "ana").await;

    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let first = PhotoRepo::insert(uow.conn(), &photo(m.id, 1, true))
        .await
        .unwrap();
    let second = PhotoRepo::insert(uow.conn(), &photo(m.id, 2, false))
        .await
        .unwrap();
    uow.commit().await.unwrap();

    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    PhotoRepo::swap_main(uow.conn(), m.id, Some(first.id), second.id)
        .await
        .unwrap();
    uow.commit().await.unwrap();

    let photos = PhotoRepo::list_for_member(&pool, m.id).await.unwrap();
    let mains: Vec<_> = photos.iter().filter(|p| p.is_main).map(|p| p.id).collect();
    assert_eq!(mains, vec![second.id]);
}

/// Promoting a photo that belongs to someone else fails and, once the unit
/// of work is dropped, the demotion is undone.
#[sqlx::test(migrations = "../../db/migrations")]
async fn swap_main_with_foreign_photo_rolls_back(pool: PgPool) {
    let ana = member(&pool, "ana").await;
    let bea = member(&pool, "bea").await;

    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let anas = PhotoRepo::insert(uow.conn(), &photo(ana.id, 1, true))
        .await
        .unwrap();
    let beas = PhotoRepo::insert(uow.conn(), &photo(bea.id, 2, false))
        .await
        .unwrap();
    uow.commit().await.unwrap();

    {
        let mut uow = UnitOfWork::begin(&pool).await.unwrap();
        let err = PhotoRepo::swap_main(uow.conn(), ana.id, Some(anas.id), beas.id)
            .await
            .unwrap_err();
        assert!(matches!(err, sqlx::Error::RowNotFound));
    }

    let photos = PhotoRepo::list_for_member(&pool, ana.id).await.unwrap();
    assert!(photos[0].is_main, "demotion must not survive the failed swap");
}

// ---------------------------------------------------------------------------
// Test: delete is scoped to the owning member
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_is_scoped_to_member(pool: PgPool) {
    let ana = member(&pool, "ana").await;
    let bea = member(&pool, "bea").await;

    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    let anas = PhotoRepo::insert(uow.conn(), &photo(ana.id, 1, false))
        .await
        .unwrap();
    assert!(!PhotoRepo::delete(uow.conn(), bea.id, anas.id).await.unwrap());
    assert!(PhotoRepo::delete(uow.conn(), ana.id, anas.id).await.unwrap());
    uow.commit().await.unwrap();

    assert!(PhotoRepo::list_for_member(&pool, ana.id).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Test: member detail exposes the main photo URL
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn detail_uses_main_photo_url(pool: PgPool) {
    let m = member(&pool, "ana").await;

    let mut uow = UnitOfWork::begin(&pool).await.unwrap();
    PhotoRepo::insert(uow.conn(), &photo(m.id, 1, false))
        .await
        .unwrap();
    PhotoRepo::insert(uow.conn(), &photo(m.id, 2, true))
        .await
        .unwrap();
    uow.commit().await.unwrap();

    let today = NaiveDate::from_ymd_opt(2024, 2, 2).unwrap();
    let detail = MemberRepo::find_detail(&pool, "ana", today)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(detail.summary.age, 30);
    assert_eq!(
        detail.summary.photo_url.as_deref(),
        Some("https://media.test/2.jpg")
    );
    assert_eq!(detail.photos.len(), 2);
}

//! Integration tests for `SqliteStore` against an in-memory database.

use scimlet_core::{
  StoreError as _,
  store::{UserFilter, UserStore},
  user::{Email, NewUser},
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn email(kind: &str, value: &str, primary: bool) -> Email {
  Email {
    kind:    kind.into(),
    value:   value.into(),
    primary,
  }
}

fn new_user(user_name: &str, emails: Vec<Email>) -> NewUser {
  NewUser {
    external_id:  None,
    user_name:    user_name.into(),
    first_name:   "Micky".into(),
    middle_name:  None,
    last_name:    "Daldo".into(),
    display_name: "Micky Daldo".into(),
    active:       true,
    emails,
  }
}

async fn email_rowid(s: &SqliteStore, user_id: i64, value: &str) -> Option<i64> {
  let value = value.to_owned();
  s.conn
    .call(move |conn| {
      Ok(
        conn
          .query_row(
            "SELECT rowid FROM emails WHERE user_id = ?1 AND value = ?2",
            rusqlite::params![user_id, value],
            |r| r.get(0),
          )
          .ok(),
      )
    })
    .await
    .unwrap()
}

async fn email_count(s: &SqliteStore) -> i64 {
  s.conn
    .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM emails", [], |r| r.get(0))?))
    .await
    .unwrap()
}

// ─── Create / get ────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_user_with_emails() {
  let s = store().await;

  let mut input = new_user("mdaldo@fake.domain", vec![
    email("work", "mdaldo@fake.domain", true),
    email("personal", "mdaldo@personal.domain", false),
  ]);
  input.external_id = Some("00u1abc".into());
  input.middle_name = Some("J".into());

  let created = s.create_user(input.clone()).await.unwrap();
  assert!(created.id > 0);

  let fetched = s.get_user(created.id).await.unwrap().unwrap();
  assert_eq!(fetched, created);
  assert_eq!(fetched.external_id.as_deref(), Some("00u1abc"));
  assert_eq!(fetched.middle_name.as_deref(), Some("J"));
  assert_eq!(fetched.emails, input.emails);
}

#[tokio::test]
async fn get_missing_user_returns_none() {
  let s = store().await;
  assert!(s.get_user(42).await.unwrap().is_none());
}

#[tokio::test]
async fn ids_are_assigned_by_the_store() {
  let s = store().await;
  let a = s.create_user(new_user("a@x", vec![])).await.unwrap();
  let b = s.create_user(new_user("b@x", vec![])).await.unwrap();
  assert!(b.id > a.id);
}

#[tokio::test]
async fn duplicate_user_name_is_a_conflict_and_writes_nothing() {
  let s = store().await;
  s.create_user(new_user("dslem@fake.domain", vec![]))
    .await
    .unwrap();

  let err = s
    .create_user(new_user("dslem@fake.domain", vec![email(
      "work",
      "other@fake.domain",
      true,
    )]))
    .await
    .unwrap_err();
  assert!(err.is_conflict(), "{err}");
  assert!(matches!(err, crate::Error::Constraint(_)));

  let all = s.list_users(&UserFilter::default()).await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(email_count(&s).await, 0);
}

#[tokio::test]
async fn duplicate_email_value_on_create_rolls_back_the_user() {
  let s = store().await;
  let err = s
    .create_user(new_user("a@x", vec![
      email("work", "a@x", true),
      email("personal", "a@x", false),
    ]))
    .await
    .unwrap_err();
  assert!(err.is_conflict());
  assert!(s.list_users(&UserFilter::default()).await.unwrap().is_empty());
}

// ─── List ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn list_orders_newest_first() {
  let s = store().await;
  let a = s.create_user(new_user("a@x", vec![])).await.unwrap();
  let b = s.create_user(new_user("b@x", vec![])).await.unwrap();
  let c = s.create_user(new_user("c@x", vec![])).await.unwrap();

  let ids: Vec<i64> = s
    .list_users(&UserFilter::default())
    .await
    .unwrap()
    .iter()
    .map(|u| u.id)
    .collect();
  assert_eq!(ids, vec![c.id, b.id, a.id]);
}

#[tokio::test]
async fn list_filters_by_exact_user_name() {
  let s = store().await;
  s.create_user(new_user("mdaldo@fake.domain", vec![]))
    .await
    .unwrap();
  let dan = s
    .create_user(new_user("dslem@fake.domain", vec![email(
      "work",
      "dslem@fake.domain",
      true,
    )]))
    .await
    .unwrap();

  let found = s
    .list_users(&UserFilter {
      user_name: Some("dslem@fake.domain".into()),
    })
    .await
    .unwrap();
  assert_eq!(found, vec![dan]);

  let none = s
    .list_users(&UserFilter {
      user_name: Some("DSLEM@fake.domain".into()),
    })
    .await
    .unwrap();
  assert!(none.is_empty());
}

#[tokio::test]
async fn list_attaches_each_users_own_emails() {
  let s = store().await;
  let a = s
    .create_user(new_user("a@x", vec![email("work", "a@x", true)]))
    .await
    .unwrap();
  let b = s
    .create_user(new_user("b@x", vec![
      email("work", "b@x", true),
      email("personal", "b@home", false),
    ]))
    .await
    .unwrap();
  s.create_user(new_user("c@x", vec![])).await.unwrap();

  let all = s.list_users(&UserFilter::default()).await.unwrap();
  assert_eq!(all.len(), 3);
  assert!(all[0].emails.is_empty());
  assert_eq!(all[1].emails, b.emails);
  assert_eq!(all[2].emails, a.emails);
}

// ─── Replace ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn replace_missing_user_returns_none() {
  let s = store().await;
  let result = s.replace_user(9, new_user("a@x", vec![])).await.unwrap();
  assert!(result.is_none());
  assert_eq!(email_count(&s).await, 0);
}

#[tokio::test]
async fn replace_overwrites_scalars_and_keeps_id() {
  let s = store().await;
  let created = s.create_user(new_user("a@x", vec![])).await.unwrap();

  let mut input = new_user("renamed@x", vec![]);
  input.first_name = "Dan".into();
  input.middle_name = Some("Q".into());
  input.last_name = "Slem".into();
  input.display_name = "Dan Slem".into();
  input.external_id = Some("ext-9".into());
  input.active = false;

  let replaced = s.replace_user(created.id, input.clone()).await.unwrap().unwrap();
  assert_eq!(replaced.id, created.id);
  assert_eq!(NewUser::from(replaced.clone()), input);
  assert_eq!(s.get_user(created.id).await.unwrap(), Some(replaced));
}

#[tokio::test]
async fn replace_removes_absent_and_adds_new_emails() {
  let s = store().await;
  let created = s
    .create_user(new_user("a@x", vec![email("work", "a@x", true)]))
    .await
    .unwrap();

  let replaced = s
    .replace_user(
      created.id,
      new_user("a@x", vec![email("personal", "b@x", false)]),
    )
    .await
    .unwrap()
    .unwrap();

  assert_eq!(replaced.emails, vec![email("personal", "b@x", false)]);
  assert_eq!(email_count(&s).await, 1);
}

#[tokio::test]
async fn replace_updates_matching_email_in_place() {
  let s = store().await;
  let created = s
    .create_user(new_user("a@x", vec![email("work", "a@x", true)]))
    .await
    .unwrap();
  let rowid_before = email_rowid(&s, created.id, "a@x").await.unwrap();

  let replaced = s
    .replace_user(created.id, new_user("a@x", vec![email("work", "a@x", false)]))
    .await
    .unwrap()
    .unwrap();

  assert_eq!(replaced.emails, vec![email("work", "a@x", false)]);
  assert_eq!(email_rowid(&s, created.id, "a@x").await, Some(rowid_before));
}

#[tokio::test]
async fn replace_with_taken_user_name_is_a_conflict_and_changes_nothing() {
  let s = store().await;
  s.create_user(new_user("taken@x", vec![])).await.unwrap();
  let victim = s
    .create_user(new_user("mine@x", vec![email("work", "mine@x", true)]))
    .await
    .unwrap();

  let err = s
    .replace_user(
      victim.id,
      new_user("taken@x", vec![email("personal", "new@x", false)]),
    )
    .await
    .unwrap_err();
  assert!(err.is_conflict(), "{err}");

  assert_eq!(s.get_user(victim.id).await.unwrap(), Some(victim));
}

#[tokio::test]
async fn replace_does_not_touch_other_users_emails() {
  let s = store().await;
  let a = s
    .create_user(new_user("a@x", vec![email("work", "shared@x", true)]))
    .await
    .unwrap();
  let b = s
    .create_user(new_user("b@x", vec![email("work", "shared@x", true)]))
    .await
    .unwrap();

  s.replace_user(a.id, new_user("a@x", vec![])).await.unwrap();

  assert_eq!(s.get_user(b.id).await.unwrap(), Some(b));
}

// ─── Set active ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn set_active_changes_only_the_flag() {
  let s = store().await;
  let created = s
    .create_user(new_user("a@x", vec![email("work", "a@x", true)]))
    .await
    .unwrap();
  let rowid_before = email_rowid(&s, created.id, "a@x").await.unwrap();

  let updated = s.set_active(created.id, false).await.unwrap().unwrap();
  assert!(!updated.active);
  assert_eq!(NewUser::from(updated.clone()), NewUser {
    active: false,
    ..NewUser::from(created.clone())
  });
  assert_eq!(s.get_user(created.id).await.unwrap(), Some(updated));
  assert_eq!(email_rowid(&s, created.id, "a@x").await, Some(rowid_before));
}

#[tokio::test]
async fn set_active_on_missing_user_returns_none() {
  let s = store().await;
  assert!(s.set_active(7, false).await.unwrap().is_none());
}

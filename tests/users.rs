use serde_json::{json, Map};
use surveyor::auth::{self, Identity, Role};
use surveyor::service;
use surveyor::store::{FileStore, Filter, MemoryStore, UserStore};
use surveyor::Error;

fn member(email: &str, unit: &str) -> Identity {
    let mut user = Identity::from_email(email);
    user.unit = Some(unit.to_string());
    user
}

fn admin(email: &str) -> Identity {
    let mut user = member(email, "it");
    user.role = Role::Admin;
    user
}

fn seeded() -> MemoryStore {
    let store = MemoryStore::new();
    store.create_user(admin("root@example.org")).unwrap();
    store.create_user(member("lan@example.org", "hr")).unwrap();
    store.create_user(member("minh@example.org", "hr")).unwrap();
    store.create_user(member("hoa@example.org", "sales")).unwrap();
    store
}

fn emails(users: &[Identity]) -> Vec<&str> {
    let mut out: Vec<&str> = users.iter().map(|u| u.email.as_str()).collect();
    out.sort();
    out
}

#[test]
fn test_file_store_user_round_trip() {
    let tmp = tempfile::tempdir().unwrap();
    let store = FileStore::open(tmp.path()).unwrap();

    store.create_user(member("lan@example.org", "hr")).unwrap();
    assert!(tmp.path().join("users").join("lan@example.org.json").exists());

    let mut patch = Map::new();
    patch.insert("display_name".into(), json!("Nguyen Lan"));
    patch.insert("role".into(), json!("admin"));
    patch.insert("email".into(), json!("someone@else.org"));
    store.update_user("lan@example.org", patch).unwrap();

    let lan = store.get_user("lan@example.org").unwrap().unwrap();
    assert_eq!(lan.email, "lan@example.org");
    assert_eq!(lan.display_name, "Nguyen Lan");
    assert!(lan.is_admin());
    assert_eq!(lan.unit.as_deref(), Some("hr"));

    assert!(matches!(
        store.update_user("ghost@example.org", Map::new()),
        Err(Error::UserNotFound(_))
    ));
    store.delete_user("lan@example.org").unwrap();
    store.delete_user("lan@example.org").unwrap();
    assert!(store.query_users(&Filter::new()).unwrap().is_empty());
}

#[test]
fn test_registered_record_wins_over_configuration() {
    let store = seeded();
    let configured = Identity::from_email("lan@example.org");

    let user = auth::resolve(&store, None, Some(configured)).unwrap().unwrap();
    assert_eq!(user.unit.as_deref(), Some("hr"));

    let user = auth::resolve(&store, Some("root@example.org"), None).unwrap().unwrap();
    assert!(user.is_admin());
    assert_eq!(auth::resolve(&store, None, None).unwrap(), None);
}

#[test]
fn test_unregistered_users_cannot_sign_in() {
    let store = seeded();
    assert!(matches!(
        auth::resolve(&store, Some("stranger@example.org"), None),
        Err(Error::Unregistered(ref email)) if email == "stranger@example.org"
    ));
    let configured = Identity::from_email("stranger@example.org");
    assert!(matches!(
        auth::resolve(&store, None, Some(configured)),
        Err(Error::Unregistered(_))
    ));
}

#[test]
fn test_empty_registry_trusts_configured_identity_only() {
    let store = MemoryStore::new();
    let configured = admin("root@example.org");

    let user = auth::resolve(&store, None, Some(configured.clone())).unwrap();
    assert_eq!(user, Some(configured.clone()));
    let user = auth::resolve(&store, Some("root@example.org"), Some(configured.clone())).unwrap();
    assert_eq!(user, Some(configured.clone()));

    assert!(matches!(
        auth::resolve(&store, Some("lan@example.org"), Some(configured)),
        Err(Error::Unregistered(_))
    ));
}

#[test]
fn test_members_see_their_own_unit() {
    let store = seeded();
    let lan = member("lan@example.org", "hr");

    let seen = service::list_users(&store, &lan, Some("sales")).unwrap();
    assert_eq!(emails(&seen), vec!["lan@example.org", "minh@example.org"]);

    let root = admin("root@example.org");
    assert_eq!(service::list_users(&store, &root, None).unwrap().len(), 4);
    let sales = service::list_users(&store, &root, Some("sales")).unwrap();
    assert_eq!(emails(&sales), vec!["hoa@example.org"]);
}

#[test]
fn test_user_management_needs_an_administrator() {
    let lan = member("lan@example.org", "hr");
    let root = admin("root@example.org");

    assert!(matches!(auth::require_admin(None, "add users"), Err(Error::Unauthenticated(_))));
    assert!(matches!(
        auth::require_admin(Some(&lan), "add users"),
        Err(Error::Forbidden(_))
    ));
    assert_eq!(auth::require_admin(Some(&root), "add users").unwrap(), &root);
}

#[test]
fn test_administrators_cannot_remove_themselves() {
    let store = seeded();
    let root = admin("root@example.org");

    assert!(matches!(
        service::remove_user(&store, &root, "root@example.org"),
        Err(Error::InvalidSelection(_))
    ));
    service::remove_user(&store, &root, "hoa@example.org").unwrap();
    assert!(store.get_user("hoa@example.org").unwrap().is_none());
    assert!(store.get_user("root@example.org").unwrap().is_some());
}

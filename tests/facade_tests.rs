use std::sync::{Arc, Once};

use metabase_admin::utils::logger;
use metabase_admin::{
    MemoryStore, MetabaseStore, NodePath, PropertyKey, PropertyValue, SchemaClass, SiteAdmin,
    SiteId,
};

static LOGGER: Once = Once::new();

fn fixture() -> (Arc<MemoryStore>, SiteAdmin) {
    LOGGER.call_once(|| logger::init_logger(true));

    let store = Arc::new(MemoryStore::new());
    store.add_server("WEB01");
    store.add_site("WEB01", SiteId(1), "Default Web Site", &["*:80"]);
    store.add_site("WEB01", SiteId(3), "Contoso", &[]);
    store.add_app_pool("WEB01", "Pool1");

    let admin = SiteAdmin::new(store.clone(), "WEB01", "Contoso");
    (store, admin)
}

#[tokio::test]
async fn test_resolve_site_id_is_case_insensitive() {
    let (store, _admin) = fixture();

    let upper = SiteAdmin::new(store.clone(), "WEB01", "Contoso");
    let lower = SiteAdmin::new(store.clone(), "WEB01", "contoso");
    assert_eq!(upper.resolve_site_id().await.unwrap(), SiteId(3));
    assert_eq!(lower.resolve_site_id().await.unwrap(), SiteId(3));

    let missing = SiteAdmin::new(store.clone(), "WEB01", "Fabrikam");
    let err = missing.resolve_site_id().await.unwrap_err();
    assert_eq!(err.kind(), "SITE_NOT_FOUND");

    let blank = SiteAdmin::new(store, "WEB01", "  ");
    let err = blank.resolve_site_id().await.unwrap_err();
    assert_eq!(err.kind(), "INVALID_ARGUMENT");
}

#[tokio::test]
async fn test_first_site_in_enumeration_order_wins() {
    let store = Arc::new(MemoryStore::new());
    store.add_server("WEB01");
    store.add_site("WEB01", SiteId(5), "Dup", &[]);
    store.add_site("WEB01", SiteId(6), "dup", &[]);

    let admin = SiteAdmin::new(store, "WEB01", "DUP");
    assert_eq!(admin.resolve_site_id().await.unwrap(), SiteId(5));
}

#[tokio::test]
async fn test_unreachable_server_is_connection_error() {
    let (store, _) = fixture();
    let admin = SiteAdmin::new(store, "WEB99", "Contoso");
    let err = admin.resolve_site_id().await.unwrap_err();
    assert_eq!(err.kind(), "CONNECTION");
}

#[tokio::test]
async fn test_binding_lifecycle_end_to_end() {
    let (_store, admin) = fixture();

    assert_eq!(admin.resolve_site_id().await.unwrap(), SiteId(3));

    assert!(admin.add_binding("contoso.com:80").await.unwrap());
    assert_eq!(
        admin.list_bindings().await.unwrap(),
        vec!["contoso.com:80".to_string()]
    );
    assert!(admin.binding_exists("contoso.com:80").await.unwrap());

    // Second add is a no-op.
    assert!(!admin.add_binding("contoso.com:80").await.unwrap());
    assert_eq!(admin.list_bindings().await.unwrap().len(), 1);

    assert!(admin.remove_binding("contoso.com:80").await.unwrap());
    assert!(admin.list_bindings().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_binding_match_policy_is_case_insensitive_exact() {
    let (_store, admin) = fixture();

    assert!(admin.add_binding("Contoso.com:80").await.unwrap());
    assert!(!admin.add_binding("contoso.COM:80").await.unwrap());
    assert!(admin.binding_exists("CONTOSO.com:80").await.unwrap());
    assert!(!admin.binding_exists("contoso.com:8080").await.unwrap());

    // The stored token keeps its original casing.
    assert_eq!(
        admin.list_bindings().await.unwrap(),
        vec!["Contoso.com:80".to_string()]
    );

    assert!(admin.remove_binding("contoso.com:80").await.unwrap());
    assert!(admin.list_bindings().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remove_absent_binding_does_not_mutate() {
    let (store, admin) = fixture();

    let commits_before = store.commit_count();
    assert!(!admin.remove_binding("absent.example:80").await.unwrap());
    assert_eq!(store.commit_count(), commits_before);
}

#[tokio::test]
async fn test_malformed_token_short_circuits_before_store_contact() {
    let (store, admin) = fixture();

    let contacts_before = store.contact_count();
    let err = admin.add_binding("nocolon").await.unwrap_err();
    assert_eq!(err.kind(), "INVALID_BINDING");

    let err = admin.remove_binding("nocolon").await.unwrap_err();
    assert_eq!(err.kind(), "INVALID_BINDING");

    assert_eq!(store.contact_count(), contacts_before);
}

#[tokio::test]
async fn test_list_bindings_keeps_store_collection_order() {
    let store = Arc::new(MemoryStore::new());
    store.add_server("WEB01");
    store.add_site(
        "WEB01",
        SiteId(3),
        "Contoso",
        &["a.example:80", "b.example:80", "c.example:80"],
    );

    let admin = SiteAdmin::new(store, "WEB01", "Contoso");
    assert_eq!(
        admin.list_bindings().await.unwrap(),
        vec![
            "a.example:80".to_string(),
            "b.example:80".to_string(),
            "c.example:80".to_string()
        ]
    );
}

#[tokio::test]
async fn test_virtual_dir_create_list_remove() {
    let (store, admin) = fixture();

    // A non-virtual-dir child must be filtered out of listings.
    store.add_site_root_child(
        "WEB01",
        SiteId(3),
        "certs",
        SchemaClass::Other("IIsCertMapper".to_string()),
    );

    admin.create_virtual_dir("App1", "C:\\inetpub\\app1").await.unwrap();
    admin.create_virtual_dir("App2", "C:\\inetpub\\app2").await.unwrap();
    assert_eq!(
        admin.list_virtual_dirs().await.unwrap(),
        vec!["App1".to_string(), "App2".to_string()]
    );

    // Removal matches case-insensitively.
    assert!(admin.remove_virtual_dir("app1").await.unwrap());
    assert_eq!(
        admin.list_virtual_dirs().await.unwrap(),
        vec!["App2".to_string()]
    );
    assert!(!admin.remove_virtual_dir("app1").await.unwrap());
}

#[tokio::test]
async fn test_created_virtual_dir_carries_application_defaults() {
    let (store, admin) = fixture();

    admin.create_virtual_dir("App1", "C:\\inetpub\\app1").await.unwrap();

    let path = NodePath::site_root("WEB01", SiteId(3)).child("App1");
    let handle = store.connect(&path).await.unwrap();
    let get = |key| store.get_property(&handle, key);

    assert_eq!(
        get(PropertyKey::Path).await.unwrap(),
        Some(PropertyValue::Text("C:\\inetpub\\app1".to_string()))
    );
    assert_eq!(
        get(PropertyKey::AccessScript).await.unwrap(),
        Some(PropertyValue::Flag(true))
    );
    assert_eq!(
        get(PropertyKey::AppFriendlyName).await.unwrap(),
        Some(PropertyValue::Text("App1".to_string()))
    );
    assert_eq!(
        get(PropertyKey::AppIsolated).await.unwrap(),
        Some(PropertyValue::Text("1".to_string()))
    );
    assert_eq!(
        get(PropertyKey::AppRoot).await.unwrap(),
        Some(PropertyValue::Text("/LM/w3svc/3/root".to_string()))
    );
    store.release(&handle);
}

#[tokio::test]
async fn test_virtual_dir_create_rejects_blank_arguments() {
    let (store, admin) = fixture();

    let err = admin.create_virtual_dir("App1", "").await.unwrap_err();
    assert_eq!(err.kind(), "INVALID_ARGUMENT");
    let err = admin.create_virtual_dir("", "C:\\inetpub").await.unwrap_err();
    assert_eq!(err.kind(), "INVALID_ARGUMENT");

    assert!(admin.list_virtual_dirs().await.unwrap().is_empty());
    assert_eq!(store.open_handles(), 0);
}

#[tokio::test]
async fn test_virtual_dir_create_rejects_wrong_container_class() {
    let (store, admin) = fixture();
    store.set_site_root_class("WEB01", SiteId(3), SchemaClass::Other("IIsFilters".to_string()));

    let err = admin
        .create_virtual_dir("App1", "C:\\inetpub\\app1")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "SCHEMA_MISMATCH");
    assert_eq!(store.open_handles(), 0);
}

#[tokio::test]
async fn test_app_pool_lookup_is_trimmed_and_case_insensitive() {
    let (_store, admin) = fixture();

    assert!(admin.app_pool_exists("Pool1").await.unwrap());
    assert!(admin.app_pool_exists(" pool1 ").await.unwrap());
    assert!(admin.app_pool_exists("POOL1").await.unwrap());
    assert!(!admin.app_pool_exists("Pool2").await.unwrap());

    assert_eq!(
        admin.open_app_pool(" pool1 ").await.unwrap(),
        Some("Pool1".to_string())
    );
    assert_eq!(admin.open_app_pool("Pool2").await.unwrap(), None);
}

#[tokio::test]
async fn test_commit_failure_surfaces_store_write_error() {
    let (store, admin) = fixture();
    store.fail_commits(true);

    let err = admin.add_binding("contoso.com:80").await.unwrap_err();
    assert_eq!(err.kind(), "STORE_WRITE");

    // Handles opened along the failed path are still released.
    assert_eq!(store.open_handles(), 0);
}

#[tokio::test]
async fn test_every_operation_releases_its_handles() {
    let (store, admin) = fixture();

    admin.resolve_site_id().await.unwrap();
    admin.add_binding("contoso.com:80").await.unwrap();
    admin.binding_exists("contoso.com:80").await.unwrap();
    admin.list_bindings().await.unwrap();
    admin.remove_binding("contoso.com:80").await.unwrap();
    admin.create_virtual_dir("App1", "C:\\inetpub\\app1").await.unwrap();
    admin.list_virtual_dirs().await.unwrap();
    admin.remove_virtual_dir("App1").await.unwrap();
    admin.app_pool_exists("Pool1").await.unwrap();
    admin.open_app_pool("Pool1").await.unwrap();

    assert_eq!(store.open_handles(), 0);
}

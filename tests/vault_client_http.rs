mod common;

use std::time::Duration;

use common::fake_vault::{FakeVault, TOKEN};
use common::{bundle, test_value};
use vault_kv_mv::{
    Choice, MemoryStore, MoveError, SecretStore, StoreError, VaultClient, VaultSettings, relocate,
};

fn client(vault: &FakeVault, token: &str, namespace: Option<&str>) -> VaultClient {
    VaultClient::new(VaultSettings {
        address: vault.address.clone(),
        token: token.into(),
        namespace: namespace.map(str::to_string),
        timeout: Duration::from_secs(5),
        skip_verify: false,
    })
    .unwrap()
}

fn no_prompt(path: &str) -> Result<Choice, MoveError> {
    panic!("unexpected prompt for {path}");
}

#[test]
fn list_uses_get_with_list_query_and_reports_subdirectories() {
    let vault = FakeVault::start(MemoryStore::with_entries([
        ("secret/d/a", test_value()),
        ("secret/d/sub/b", test_value()),
    ]));
    let c = client(&vault, TOKEN, None);

    let keys = c.list("secret/d/").unwrap().unwrap();
    assert_eq!(keys, vec!["a".to_string(), "sub/".to_string()]);

    let seen = vault.seen();
    assert_eq!(seen[0].method, "GET");
    assert_eq!(seen[0].target, "/v1/secret/d/?list=true");
    assert_eq!(seen[0].token.as_deref(), Some(TOKEN));
}

#[test]
fn missing_paths_are_none_not_errors() {
    let vault = FakeVault::start(MemoryStore::new());
    let c = client(&vault, TOKEN, None);

    assert_eq!(c.list("secret/none/").unwrap(), None);
    assert_eq!(c.read("secret/none").unwrap(), None);
}

#[test]
fn read_write_delete_round_trip_values_verbatim() {
    let vault = FakeVault::start(MemoryStore::new());
    let c = client(&vault, TOKEN, None);
    let value = bundle(&[("user", "admin"), ("note", "a \"quoted\" value")]);

    c.write("secret/x", &value).unwrap();
    assert_eq!(vault.store.get("secret/x"), Some(value.clone()));
    assert_eq!(c.read("secret/x").unwrap(), Some(value));

    c.delete("secret/x").unwrap();
    assert!(!vault.store.contains("secret/x"));
    let methods: Vec<_> = vault.seen().into_iter().map(|s| s.method).collect();
    assert_eq!(methods, vec!["PUT", "GET", "DELETE"]);
}

#[test]
fn namespace_header_is_sent_when_configured() {
    let vault = FakeVault::start(MemoryStore::new());
    client(&vault, TOKEN, Some("team-a")).read("secret/x").unwrap();
    client(&vault, TOKEN, None).read("secret/x").unwrap();

    let seen = vault.seen();
    assert_eq!(seen[0].namespace.as_deref(), Some("team-a"));
    assert_eq!(seen[1].namespace, None);
}

#[test]
fn permission_denied_surfaces_vault_error_message() {
    let vault = FakeVault::start(MemoryStore::with_entries([("secret/x", test_value())]));
    let err = client(&vault, "wrong", None).read("secret/x").unwrap_err();

    match err {
        StoreError::Status { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "permission denied");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn unreachable_server_is_a_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let c = VaultClient::new(VaultSettings {
        address: format!("http://127.0.0.1:{port}"),
        token: TOKEN.into(),
        namespace: None,
        timeout: Duration::from_secs(2),
        skip_verify: false,
    })
    .unwrap();
    assert!(matches!(c.read("secret/x"), Err(StoreError::Transport { .. })));
}

#[test]
fn directory_move_over_http() {
    let vault = FakeVault::start(MemoryStore::with_entries([
        ("secret/old/foo/bar", test_value()),
        ("secret/old/baz", bundle(&[("k", "v")])),
    ]));
    let c = client(&vault, TOKEN, None);

    let report = relocate(&c, &mut no_prompt, "secret/old/", "secret/new").unwrap();
    assert_eq!(report.len(), 2);
    assert_eq!(
        vault.store.paths(),
        vec!["secret/new/baz".to_string(), "secret/new/foo/bar".to_string()]
    );
}

#[test]
fn moving_key_into_its_own_parent_is_refused() {
    let vault = FakeVault::start(MemoryStore::with_entries([("secret/old", test_value())]));
    let c = client(&vault, TOKEN, None);
    // `secret/` keeps the basename, so the destination is `secret/old` again
    let err = relocate(&c, &mut no_prompt, "secret/old", "secret/").unwrap_err();
    assert!(matches!(err, MoveError::IdenticalPaths(_)), "{err:?}");
    assert!(vault.store.contains("secret/old"));
    assert!(vault.seen().iter().all(|s| s.method == "GET"));
}

#[test]
fn keys_with_reserved_characters_move_as_themselves() {
    let names = ["a", "a#b", "a?b", "50%", "with space"];
    let vault = FakeVault::start(MemoryStore::with_entries(
        names
            .iter()
            .map(|n| (format!("secret/old/{n}"), bundle(&[("name", *n)]))),
    ));
    let c = client(&vault, TOKEN, None);

    let report = relocate(&c, &mut no_prompt, "secret/old/", "secret/new/").unwrap();
    assert_eq!(report.len(), names.len());

    let mut expected: Vec<String> = names.iter().map(|n| format!("secret/new/{n}")).collect();
    expected.sort();
    assert_eq!(vault.store.paths(), expected);
    for n in names {
        assert_eq!(
            vault.store.get(&format!("secret/new/{n}")),
            Some(bundle(&[("name", n)])),
            "value of {n} was not carried over"
        );
    }
    assert!(vault.seen().iter().all(|s| !s.target.contains('#')));
}

#[test]
fn reading_a_key_with_a_fragment_character_does_not_hit_its_prefix() {
    let vault = FakeVault::start(MemoryStore::with_entries([("secret/a", test_value())]));
    let c = client(&vault, TOKEN, None);

    assert_eq!(c.read("secret/a#b").unwrap(), None);
    c.delete("secret/a#b").unwrap();
    assert!(vault.store.contains("secret/a"));
}

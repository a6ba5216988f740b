//! Integration tests for alias association flows.

mod common;

use hearth_directory::{AppserviceIdentity, DirectoryError, Requester, ServerName};

#[tokio::test]
async fn test_create_and_get_round_trip() {
    let db = common::test_db().await;
    let dir = common::alias_directory(&db);

    let r = common::room("!abc:example.org");
    common::seed_room(&db, &r).await;

    let ada = Requester::user(common::user("@ada:example.org"));
    let a = common::alias("#lobby:example.org");
    let servers: Vec<ServerName> = vec![
        "one.example".parse().unwrap(),
        "two.example:8448".parse().unwrap(),
    ];

    dir.create_association(&ada, &a, &r, Some(&servers[..]))
        .await
        .expect("create should succeed");

    let record = dir.get_association(&a).await.expect("alias should resolve");
    assert_eq!(record.alias, a);
    assert_eq!(record.room_id, r);
    assert_eq!(record.creator, ada.user);
    assert_eq!(record.servers_hint.as_deref(), Some(&servers[..]));
}

#[tokio::test]
async fn test_create_for_unknown_room_is_bad_request() {
    let db = common::test_db().await;
    let dir = common::alias_directory(&db);

    let ada = Requester::user(common::user("@ada:example.org"));
    let err = dir
        .create_association(
            &ada,
            &common::alias("#lobby:example.org"),
            &common::room("!missing:example.org"),
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, DirectoryError::BadRequest(_)));
    // Nothing was written.
    assert!(matches!(
        dir.get_association(&common::alias("#lobby:example.org")).await,
        Err(DirectoryError::NotFound)
    ));
}

#[tokio::test]
async fn test_second_bind_conflicts_and_preserves_first() {
    let db = common::test_db().await;
    let dir = common::alias_directory(&db);

    let r1 = common::room("!r1:example.org");
    let r2 = common::room("!r2:example.org");
    common::seed_room(&db, &r1).await;
    common::seed_room(&db, &r2).await;

    let ada = Requester::user(common::user("@ada:example.org"));
    let a = common::alias("#lobby:example.org");

    dir.create_association(&ada, &a, &r1, None).await.unwrap();

    let err = dir.create_association(&ada, &a, &r2, None).await.unwrap_err();
    assert!(matches!(err, DirectoryError::Conflict));

    // The original mapping is untouched.
    let record = dir.get_association(&a).await.unwrap();
    assert_eq!(record.room_id, r1);
}

#[tokio::test]
async fn test_get_after_delete_is_not_found() {
    let db = common::test_db().await;
    let dir = common::alias_directory(&db);

    let r = common::room("!r:example.org");
    common::seed_room(&db, &r).await;

    let ada = Requester::user(common::user("@ada:example.org"));
    let a = common::alias("#lobby:example.org");

    dir.create_association(&ada, &a, &r, None).await.unwrap();
    dir.delete_association(&ada, &a).await.unwrap();

    assert!(matches!(
        dir.get_association(&a).await,
        Err(DirectoryError::NotFound)
    ));
    assert!(matches!(
        dir.delete_association(&ada, &a).await,
        Err(DirectoryError::NotFound)
    ));
}

#[tokio::test]
async fn test_delete_requires_creator_or_admin() {
    let db = common::test_db().await;
    let dir = common::alias_directory(&db);

    let r = common::room("!r:example.org");
    common::seed_room(&db, &r).await;

    let ada = Requester::user(common::user("@ada:example.org"));
    let a = common::alias("#lobby:example.org");
    dir.create_association(&ada, &a, &r, None).await.unwrap();

    // A stranger is denied and the record survives.
    let bob = Requester::user(common::user("@bob:example.org"));
    let err = dir.delete_association(&bob, &a).await.unwrap_err();
    assert!(matches!(err, DirectoryError::Forbidden(_)));
    assert!(dir.get_association(&a).await.is_ok());

    // A server admin may delete any alias.
    let admin = Requester::admin(common::user("@root:example.org"));
    dir.delete_association(&admin, &a).await.unwrap();
    assert!(matches!(
        dir.get_association(&a).await,
        Err(DirectoryError::NotFound)
    ));
}

#[tokio::test]
async fn test_appservice_namespace_gates_create() {
    let db = common::test_db().await;
    let dir = common::alias_directory(&db);

    let r = common::room("!r:example.org");
    common::seed_room(&db, &r).await;

    let bridge = AppserviceIdentity::new("bridge")
        .with_alias_namespace(r"^#bridge_.*:example\.org$")
        .unwrap();
    let requester = Requester::appservice(common::user("@bridgebot:example.org"), bridge);

    // Outside the reserved namespace.
    let err = dir
        .create_association(&requester, &common::alias("#lobby:example.org"), &r, None)
        .await
        .unwrap_err();
    assert!(matches!(err, DirectoryError::BadRequest(_)));

    // Inside it.
    dir.create_association(
        &requester,
        &common::alias("#bridge_general:example.org"),
        &r,
        None,
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_appservice_delete_path() {
    let db = common::test_db().await;
    let dir = common::alias_directory(&db);

    let r = common::room("!r:example.org");
    common::seed_room(&db, &r).await;

    let bridge = AppserviceIdentity::new("bridge")
        .with_alias_namespace(r"^#bridge_.*:example\.org$")
        .unwrap();
    let requester = Requester::appservice(common::user("@bridgebot:example.org"), bridge.clone());

    let reserved = common::alias("#bridge_general:example.org");
    dir.create_association(&requester, &reserved, &r, None)
        .await
        .unwrap();

    // An unreserved alias is rejected before any lookup.
    let err = dir
        .delete_appservice_association(&bridge, &common::alias("#lobby:example.org"))
        .await
        .unwrap_err();
    assert!(matches!(err, DirectoryError::BadRequest(_)));

    // The appservice path has no creator check: the namespace is the authority.
    dir.delete_appservice_association(&bridge, &reserved)
        .await
        .unwrap();
    assert!(matches!(
        dir.get_association(&reserved).await,
        Err(DirectoryError::NotFound)
    ));

    // Deleting again reports the missing record.
    let err = dir
        .delete_appservice_association(&bridge, &reserved)
        .await
        .unwrap_err();
    assert!(matches!(err, DirectoryError::NotFound));
}

#[tokio::test]
async fn test_list_room_aliases() {
    let db = common::test_db().await;
    let dir = common::alias_directory(&db);

    let r = common::room("!r:example.org");
    common::seed_room(&db, &r).await;
    let ada = Requester::user(common::user("@ada:example.org"));

    for name in ["#a:example.org", "#b:example.org", "#c:example.org"] {
        dir.create_association(&ada, &common::alias(name), &r, None)
            .await
            .unwrap();
    }
    dir.delete_association(&ada, &common::alias("#b:example.org"))
        .await
        .unwrap();

    let listed = dir.list_room_aliases(&r).await.unwrap();
    assert_eq!(
        listed,
        vec![
            common::alias("#a:example.org"),
            common::alias("#c:example.org")
        ]
    );
}

#[tokio::test]
async fn test_concurrent_creates_have_a_single_winner() {
    let db = common::test_db().await;
    let dir = common::alias_directory(&db);
    let contested = common::alias("#contested:example.org");

    let mut rooms = Vec::new();
    for i in 0..8 {
        let r = common::room(&format!("!r{}:example.org", i));
        common::seed_room(&db, &r).await;
        rooms.push(r);
    }

    let mut handles = Vec::new();
    for (i, r) in rooms.iter().cloned().enumerate() {
        let dir = dir.clone();
        let contested = contested.clone();
        let requester = Requester::user(common::user(&format!("@user{}:example.org", i)));
        handles.push(tokio::spawn(async move {
            dir.create_association(&requester, &contested, &r, None).await
        }));
    }

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(()) => successes += 1,
            Err(DirectoryError::Conflict) => conflicts += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(conflicts, rooms.len() - 1);

    // The alias resolves to whichever racer won.
    let record = dir.get_association(&contested).await.unwrap();
    assert!(rooms.contains(&record.room_id));
}

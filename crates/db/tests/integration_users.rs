//! Integration-Tests fuer UserRepository (In-Memory SQLite)

use vorlage_core::UserId;
use vorlage_db::{
    models::{BenutzerUpdate, NeuerBenutzer},
    SqliteDb, UserRepository,
};

async fn db() -> SqliteDb {
    SqliteDb::in_memory()
        .await
        .expect("In-Memory DB konnte nicht erstellt werden")
}

fn neuer_benutzer(email: &str, hash: &str) -> NeuerBenutzer {
    NeuerBenutzer {
        email: email.into(),
        password_hash: hash.into(),
        ..Default::default()
    }
}

#[tokio::test]
async fn benutzer_erstellen_und_laden() {
    let db = db().await;

    let user = UserRepository::create(
        &db,
        NeuerBenutzer {
            email: "alice@example.com".into(),
            password_hash: "hash_alice".into(),
            name: Some("Alice".into()),
            title: Some("Dr.".into()),
            is_admin: false,
        },
    )
    .await
    .expect("Benutzer erstellen fehlgeschlagen");

    assert_eq!(user.email, "alice@example.com");
    assert!(!user.is_admin);

    let geladen = UserRepository::get_by_id(&db, user.id)
        .await
        .expect("get_by_id fehlgeschlagen")
        .expect("Benutzer sollte gefunden werden");

    assert_eq!(geladen, user);
    assert_eq!(geladen.name.as_deref(), Some("Alice"));
    assert_eq!(geladen.title.as_deref(), Some("Dr."));
}

#[tokio::test]
async fn benutzer_nach_email_laden() {
    let db = db().await;

    UserRepository::create(&db, neuer_benutzer("bob@example.com", "hash_bob"))
        .await
        .unwrap();

    let gefunden = UserRepository::get_by_email(&db, "bob@example.com")
        .await
        .unwrap()
        .expect("Benutzer 'bob' sollte gefunden werden");
    assert_eq!(gefunden.email, "bob@example.com");

    let nicht_gefunden = UserRepository::get_by_email(&db, "unbekannt@example.com")
        .await
        .unwrap();
    assert!(nicht_gefunden.is_none());
}

#[tokio::test]
async fn email_vergleich_ist_exakt() {
    let db = db().await;

    UserRepository::create(&db, neuer_benutzer("Carol@Example.com", "hash"))
        .await
        .unwrap();

    let anders_geschrieben = UserRepository::get_by_email(&db, "carol@example.com")
        .await
        .unwrap();
    assert!(anders_geschrieben.is_none());
}

#[tokio::test]
async fn email_ist_eindeutig() {
    let db = db().await;

    UserRepository::create(&db, neuer_benutzer("dave@example.com", "hash1"))
        .await
        .unwrap();

    let err = UserRepository::create(&db, neuer_benutzer("dave@example.com", "hash2"))
        .await
        .expect_err("Doppelte E-Mail muss abgelehnt werden");
    assert!(err.ist_eindeutigkeit());

    // Der erste Datensatz bleibt unveraendert
    let vorhanden = UserRepository::get_by_email(&db, "dave@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(vorhanden.password_hash, "hash1");
}

#[tokio::test]
async fn benutzer_aktualisieren() {
    let db = db().await;

    let user = UserRepository::create(&db, neuer_benutzer("erin@example.com", "alt_hash"))
        .await
        .unwrap();

    let aktualisiert = UserRepository::update(
        &db,
        user.id,
        BenutzerUpdate {
            password_hash: Some("neuer_hash".into()),
            title: Some(Some("Prof.".into())),
            is_admin: Some(true),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(aktualisiert.password_hash, "neuer_hash");
    assert_eq!(aktualisiert.title.as_deref(), Some("Prof."));
    assert!(aktualisiert.is_admin);
    assert_eq!(aktualisiert.email, "erin@example.com");
    assert_eq!(aktualisiert.created_at, user.created_at);
}

#[tokio::test]
async fn leeres_update_aendert_nichts() {
    let db = db().await;

    let user = UserRepository::create(&db, neuer_benutzer("frank@example.com", "hash"))
        .await
        .unwrap();

    let unveraendert = UserRepository::update(&db, user.id, BenutzerUpdate::default())
        .await
        .unwrap();
    assert_eq!(unveraendert, user);
}

#[tokio::test]
async fn feld_loeschen_mit_some_none() {
    let db = db().await;

    let user = UserRepository::create(
        &db,
        NeuerBenutzer {
            email: "gina@example.com".into(),
            password_hash: "hash".into(),
            name: Some("Gina".into()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let aktualisiert = UserRepository::update(
        &db,
        user.id,
        BenutzerUpdate {
            name: Some(None),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(aktualisiert.name.is_none());
}

#[tokio::test]
async fn unbekannten_benutzer_aktualisieren_schlaegt_fehl() {
    let db = db().await;

    let ergebnis = UserRepository::update(
        &db,
        UserId::new(),
        BenutzerUpdate {
            is_admin: Some(true),
            ..Default::default()
        },
    )
    .await;

    assert!(matches!(ergebnis, Err(vorlage_db::DbError::NichtGefunden(_))));
}

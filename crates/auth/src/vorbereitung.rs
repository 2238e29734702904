//! Vorbereitung von Benutzer-Datensaetzen fuer die Persistenz
//!
//! Jeder Schreibpfad laeuft hier durch, bevor das Repository aufgerufen wird.
//! Dadurch erreicht nie ein Klartext-Passwort die Datenbank, und ein
//! bereits gespeicherter Hash wird nicht erneut gehasht (sonst wuerde jede
//! spaetere Verifikation fehlschlagen).

use vorlage_db::models::{BenutzerRecord, BenutzerUpdate, NeuerBenutzer};

use crate::error::{AuthError, AuthResult};
use crate::password::PasswortHasher;

/// Eingabe einer Registrierung (Klartext-Passwort)
#[derive(Debug, Clone, Default)]
pub struct Registrierung {
    pub email: String,
    pub passwort: String,
    pub name: Option<String>,
    pub title: Option<String>,
}

impl Registrierung {
    /// Prueft Pflichtfelder und grobe E-Mail-Form
    pub fn validieren(&self) -> AuthResult<()> {
        email_validieren(&self.email)?;
        if self.passwort.is_empty() {
            return Err(AuthError::ungueltige_eingabe("Passwort fehlt"));
        }
        Ok(())
    }
}

/// Aenderung an einem gespeicherten Benutzer
///
/// `passwort` ist der Wert des Passwortfelds nach der Aenderung. Ist er
/// gleich dem gespeicherten Hash, gilt das Feld als unveraendert.
#[derive(Debug, Clone, Default)]
pub struct BenutzerAenderung {
    pub passwort: Option<String>,
    pub name: Option<Option<String>>,
    pub title: Option<Option<String>>,
    pub is_admin: Option<bool>,
}

fn email_validieren(email: &str) -> AuthResult<()> {
    if email.trim().is_empty() {
        return Err(AuthError::ungueltige_eingabe("E-Mail fehlt"));
    }
    match email.split_once('@') {
        Some((lokal, domain)) if !lokal.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(AuthError::ungueltige_eingabe(format!(
            "'{email}' ist keine gueltige E-Mail-Adresse"
        ))),
    }
}

/// Bereitet einen neuen Benutzer vor: validieren und Passwort hashen
pub async fn neuen_benutzer_vorbereiten(
    hasher: &PasswortHasher,
    registrierung: Registrierung,
    is_admin: bool,
) -> AuthResult<NeuerBenutzer> {
    registrierung.validieren()?;

    let password_hash = hasher.hashen_async(registrierung.passwort).await?;

    Ok(NeuerBenutzer {
        email: registrierung.email,
        password_hash,
        name: registrierung.name,
        title: registrierung.title,
        is_admin,
    })
}

/// Bereitet eine Aenderung vor
///
/// Das Passwort wird nur gehasht, wenn es gesetzt ist und sich vom
/// gespeicherten Hash unterscheidet.
pub async fn aenderung_vorbereiten(
    hasher: &PasswortHasher,
    gespeichert: &BenutzerRecord,
    aenderung: BenutzerAenderung,
) -> AuthResult<BenutzerUpdate> {
    let password_hash = match aenderung.passwort {
        Some(p) if p == gespeichert.password_hash => None,
        Some(p) if p.is_empty() => {
            return Err(AuthError::ungueltige_eingabe("Passwort darf nicht leer sein"));
        }
        Some(p) => Some(hasher.hashen_async(p).await?),
        None => None,
    };

    Ok(BenutzerUpdate {
        password_hash,
        name: aenderung.name,
        title: aenderung.title,
        is_admin: aenderung.is_admin,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::test_hasher;
    use chrono::Utc;
    use vorlage_core::UserId;

    fn gespeichert(hash: &str) -> BenutzerRecord {
        BenutzerRecord {
            id: UserId::new(),
            email: "a@b.com".into(),
            password_hash: hash.into(),
            name: None,
            title: None,
            is_admin: false,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn neuer_benutzer_bekommt_hash() {
        let hasher = test_hasher();
        let neu = neuen_benutzer_vorbereiten(
            &hasher,
            Registrierung {
                email: "a@b.com".into(),
                passwort: "secret123".into(),
                ..Default::default()
            },
            false,
        )
        .await
        .unwrap();

        assert_ne!(neu.password_hash, "secret123");
        assert!(hasher.verifizieren("secret123", &neu.password_hash).unwrap());
        assert!(!neu.is_admin);
    }

    #[tokio::test]
    async fn leere_registrierung_wird_abgelehnt() {
        let ergebnis =
            neuen_benutzer_vorbereiten(&test_hasher(), Registrierung::default(), false).await;
        assert!(matches!(ergebnis, Err(AuthError::UngueltigeEingabe(_))));
    }

    #[test]
    fn email_form_pruefen() {
        assert!(email_validieren("a@b.com").is_ok());
        assert!(email_validieren("").is_err());
        assert!(email_validieren("   ").is_err());
        assert!(email_validieren("ohne-at").is_err());
        assert!(email_validieren("@b.com").is_err());
        assert!(email_validieren("a@").is_err());
    }

    #[test]
    fn fehlendes_passwort() {
        let r = Registrierung {
            email: "a@b.com".into(),
            ..Default::default()
        };
        assert!(matches!(r.validieren(), Err(AuthError::UngueltigeEingabe(_))));
    }

    #[tokio::test]
    async fn ohne_passwort_kein_neuer_hash() {
        let record = gespeichert("$argon2id$alt");
        let update = aenderung_vorbereiten(
            &test_hasher(),
            &record,
            BenutzerAenderung {
                name: Some(Some("Neu".into())),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(update.password_hash.is_none());
        assert_eq!(update.name, Some(Some("Neu".into())));
    }

    #[tokio::test]
    async fn gespeicherter_hash_wird_nicht_erneut_gehasht() {
        let record = gespeichert("$argon2id$alt");
        let update = aenderung_vorbereiten(
            &test_hasher(),
            &record,
            BenutzerAenderung {
                passwort: Some(record.password_hash.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert!(update.password_hash.is_none());
        assert!(update.ist_leer());
    }

    #[tokio::test]
    async fn geaendertes_passwort_wird_gehasht() {
        let hasher = test_hasher();
        let record = gespeichert("$argon2id$alt");
        let update = aenderung_vorbereiten(
            &hasher,
            &record,
            BenutzerAenderung {
                passwort: Some("neu123".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let hash = update.password_hash.expect("Hash muss gesetzt sein");
        assert_ne!(hash, "neu123");
        assert!(hasher.verifizieren("neu123", &hash).unwrap());
    }

    #[tokio::test]
    async fn leeres_neues_passwort_wird_abgelehnt() {
        let record = gespeichert("$argon2id$alt");
        let ergebnis = aenderung_vorbereiten(
            &test_hasher(),
            &record,
            BenutzerAenderung {
                passwort: Some(String::new()),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(ergebnis, Err(AuthError::UngueltigeEingabe(_))));
    }
}

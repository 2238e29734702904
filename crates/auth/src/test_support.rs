//! Test-Doubles fuer den Credential Store

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use vorlage_core::UserId;
use vorlage_db::{
    models::{BenutzerRecord, BenutzerUpdate, NeuerBenutzer},
    DbError, DbResult, UserRepository,
};

/// Minimaler In-Memory UserRepository mit eindeutiger E-Mail
#[derive(Default)]
pub(crate) struct SpeicherRepo {
    benutzer: Mutex<Vec<BenutzerRecord>>,
}

impl SpeicherRepo {
    pub(crate) fn anzahl(&self) -> usize {
        self.benutzer.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for SpeicherRepo {
    async fn create(&self, data: NeuerBenutzer) -> DbResult<BenutzerRecord> {
        let mut benutzer = self.benutzer.lock().unwrap();
        if benutzer.iter().any(|u| u.email == data.email) {
            return Err(DbError::Eindeutigkeit(data.email));
        }
        let record = BenutzerRecord {
            id: UserId::new(),
            email: data.email,
            password_hash: data.password_hash,
            name: data.name,
            title: data.title,
            is_admin: data.is_admin,
            created_at: Utc::now(),
        };
        benutzer.push(record.clone());
        Ok(record)
    }

    async fn get_by_id(&self, id: UserId) -> DbResult<Option<BenutzerRecord>> {
        Ok(self.benutzer.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>> {
        Ok(self
            .benutzer
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update(&self, id: UserId, data: BenutzerUpdate) -> DbResult<BenutzerRecord> {
        let mut benutzer = self.benutzer.lock().unwrap();
        let user = benutzer
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| DbError::nicht_gefunden(id.to_string()))?;
        if let Some(hash) = data.password_hash {
            user.password_hash = hash;
        }
        if let Some(name) = data.name {
            user.name = name;
        }
        if let Some(title) = data.title {
            user.title = title;
        }
        if let Some(is_admin) = data.is_admin {
            user.is_admin = is_admin;
        }
        Ok(user.clone())
    }
}

/// Repository dessen Verbindung immer fehlschlaegt
pub(crate) struct DefektesRepo;

#[async_trait]
impl UserRepository for DefektesRepo {
    async fn create(&self, _data: NeuerBenutzer) -> DbResult<BenutzerRecord> {
        Err(DbError::intern("Verbindung verloren"))
    }

    async fn get_by_id(&self, _id: UserId) -> DbResult<Option<BenutzerRecord>> {
        Err(DbError::intern("Verbindung verloren"))
    }

    async fn get_by_email(&self, _email: &str) -> DbResult<Option<BenutzerRecord>> {
        Err(DbError::intern("Verbindung verloren"))
    }

    async fn update(&self, _id: UserId, _data: BenutzerUpdate) -> DbResult<BenutzerRecord> {
        Err(DbError::intern("Verbindung verloren"))
    }
}

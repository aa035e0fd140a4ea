use std::{
    collections::{BTreeMap, HashMap},
    io::ErrorKind,
    path::PathBuf,
    sync::Arc,
};

use botkit::{html, html::HtmlString};
use serde::{Deserialize, Serialize};
use teloxide::types::ChatId;
use tokio::{fs, sync::Mutex};

use crate::{
    application::{Application, ApplicationUpdate},
    conversation::State,
};

/// Everything the bot remembers about one chat
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    #[serde(default)]
    pub state: Option<State>,
    #[serde(default)]
    pub data: Application,
}

impl Applicant {
    /// Applicants who gave at least their name get the main menu on /start
    pub fn registered_name(&self) -> Option<&str> {
        self.data.name.as_deref()
    }
}

/// Trait for applicant storage operations
#[async_trait::async_trait]
pub trait ApplicantStorageTrait: Send + Sync {
    /// Get the applicant for a specific chat
    async fn get_applicant(&self, chat_id: ChatId) -> Result<Option<Applicant>, HtmlString>;

    /// Get all applicants
    async fn list_applicants(&self) -> Result<HashMap<ChatId, Applicant>, HtmlString>;

    /// Set the conversation state, creating the applicant if needed
    async fn set_state(&self, chat_id: ChatId, state: State) -> Result<(), HtmlString>;

    /// Change one field of the application, creating the applicant if needed
    async fn update_application(
        &self,
        chat_id: ChatId,
        update: ApplicationUpdate,
    ) -> Result<(), HtmlString>;

    /// Replace all applicants
    async fn replace_applicants(
        &self,
        applicants: HashMap<ChatId, Applicant>,
    ) -> Result<(), HtmlString>;
}

type ApplicantStorageData = Arc<Mutex<HashMap<ChatId, Applicant>>>;

/// In-memory applicant storage
#[derive(Clone, Default)]
pub struct ApplicantStorage {
    data: ApplicantStorageData,
}

impl ApplicantStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ApplicantStorageTrait for ApplicantStorage {
    async fn get_applicant(&self, chat_id: ChatId) -> Result<Option<Applicant>, HtmlString> {
        let storage_guard = self.data.lock().await;
        Ok(storage_guard.get(&chat_id).cloned())
    }

    async fn list_applicants(&self) -> Result<HashMap<ChatId, Applicant>, HtmlString> {
        let storage_guard = self.data.lock().await;
        Ok(storage_guard.clone())
    }

    async fn set_state(&self, chat_id: ChatId, state: State) -> Result<(), HtmlString> {
        let mut storage_guard = self.data.lock().await;
        storage_guard.entry(chat_id).or_default().state = Some(state);
        Ok(())
    }

    async fn update_application(
        &self,
        chat_id: ChatId,
        update: ApplicationUpdate,
    ) -> Result<(), HtmlString> {
        let mut storage_guard = self.data.lock().await;
        storage_guard.entry(chat_id).or_default().data.apply(update);
        Ok(())
    }

    async fn replace_applicants(
        &self,
        applicants: HashMap<ChatId, Applicant>,
    ) -> Result<(), HtmlString> {
        let mut storage_guard = self.data.lock().await;
        *storage_guard = applicants;
        Ok(())
    }
}

/// Layout of the users file: applicants keyed by chat id
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(transparent)]
pub struct ApplicantsData {
    pub applicants: BTreeMap<i64, Applicant>,
}

impl ApplicantsData {
    pub fn from_hashmap(applicants: HashMap<ChatId, Applicant>) -> Self {
        Self {
            applicants: applicants
                .into_iter()
                .map(|(chat_id, applicant)| (chat_id.0, applicant))
                .collect(),
        }
    }

    pub fn into_hashmap(self) -> HashMap<ChatId, Applicant> {
        self.applicants
            .into_iter()
            .map(|(chat_id, applicant)| (ChatId(chat_id), applicant))
            .collect()
    }
}

/// Persistent applicant storage keeping all applicants in a single JSON file.
/// The file is read on first access and rewritten after every change.
#[derive(Clone)]
pub struct PersistentApplicantStorage {
    file_path: PathBuf,
    memory_storage: ApplicantStorage,
    loaded: Arc<Mutex<bool>>,
    // held from the snapshot until the file is replaced
    write_lock: Arc<Mutex<()>>,
}

impl PersistentApplicantStorage {
    pub fn new(file_path: PathBuf) -> Self {
        Self {
            file_path,
            memory_storage: ApplicantStorage::new(),
            loaded: Arc::new(Mutex::new(false)),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    async fn load_applicants(&self) -> Result<HashMap<ChatId, Applicant>, HtmlString> {
        let content = match fs::read_to_string(&self.file_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("Users file {:?} not found, starting empty", self.file_path);
                return Ok(HashMap::new());
            }
            Err(e) => {
                log::error!("Failed to read users file {:?}: {}", self.file_path, e);
                return Err(html!("Failed to read the users file: {}", e.to_string()));
            }
        };
        match serde_json::from_str::<ApplicantsData>(&content) {
            Ok(data) => Ok(data.into_hashmap()),
            Err(e) => {
                log::warn!(
                    "Failed to parse users file {:?}: {}, starting empty",
                    self.file_path,
                    e
                );
                Ok(HashMap::new())
            }
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .file_path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.file_path.with_file_name(name)
    }

    async fn save_applicants(
        &self,
        applicants: HashMap<ChatId, Applicant>,
    ) -> Result<(), std::io::Error> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(&ApplicantsData::from_hashmap(applicants))
            .map_err(|e| {
                std::io::Error::new(
                    ErrorKind::InvalidData,
                    format!("Failed to serialize applicants to JSON: {}", e),
                )
            })?;
        // readers never see a half written file
        let temp_path = self.temp_path();
        fs::write(&temp_path, content).await?;
        fs::rename(&temp_path, &self.file_path).await
    }

    /// Load the file once; the flag stays locked during the load so two updates
    /// arriving together do not both read it. A failed load is retried on the
    /// next access.
    async fn ensure_loaded(&self) -> Result<(), HtmlString> {
        let mut loaded_guard = self.loaded.lock().await;
        if *loaded_guard {
            return Ok(());
        }
        let applicants = self.load_applicants().await?;
        self.memory_storage.replace_applicants(applicants).await?;
        *loaded_guard = true;
        Ok(())
    }

    async fn persist(&self) -> Result<(), HtmlString> {
        let _write_guard = self.write_lock.lock().await;
        let applicants = self.memory_storage.list_applicants().await?;
        self.save_applicants(applicants).await.map_err(|e| {
            log::error!("Failed to write users file {:?}: {}", self.file_path, e);
            html!("Failed to save your data: {}", e.to_string())
        })
    }
}

#[async_trait::async_trait]
impl ApplicantStorageTrait for PersistentApplicantStorage {
    async fn get_applicant(&self, chat_id: ChatId) -> Result<Option<Applicant>, HtmlString> {
        self.ensure_loaded().await?;
        self.memory_storage.get_applicant(chat_id).await
    }

    async fn list_applicants(&self) -> Result<HashMap<ChatId, Applicant>, HtmlString> {
        self.ensure_loaded().await?;
        self.memory_storage.list_applicants().await
    }

    async fn set_state(&self, chat_id: ChatId, state: State) -> Result<(), HtmlString> {
        self.ensure_loaded().await?;
        self.memory_storage.set_state(chat_id, state).await?;
        self.persist().await
    }

    async fn update_application(
        &self,
        chat_id: ChatId,
        update: ApplicationUpdate,
    ) -> Result<(), HtmlString> {
        self.ensure_loaded().await?;
        self.memory_storage
            .update_application(chat_id, update)
            .await?;
        self.persist().await
    }

    async fn replace_applicants(
        &self,
        applicants: HashMap<ChatId, Applicant>,
    ) -> Result<(), HtmlString> {
        // no need to load, everything is replaced anyway
        self.memory_storage.replace_applicants(applicants).await?;
        *self.loaded.lock().await = true;
        self.persist().await
    }
}

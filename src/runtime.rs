use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::api::{ApiClient, ApiError};
use crate::cache::TaskCache;
use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::message::{Effect, Message};

/// Executes the effects the task list asks for and feeds completions back
/// through the message channel.
///
/// Network and keyring work is spawned onto the tokio runtime so the loop
/// that owns the list state keeps draining messages; local file work is
/// quick and runs inline, the same split the display loop expects.
pub struct Runtime {
    api: ApiClient,
    cache: TaskCache,
    credentials: Arc<dyn CredentialStore>,
    username: String,
    password: String,
    tx: UnboundedSender<Message>,
}

/// The message channel the runtime and the list loop share.
pub fn channel() -> (UnboundedSender<Message>, UnboundedReceiver<Message>) {
    mpsc::unbounded_channel()
}

impl Runtime {
    pub fn new(
        config: &Config,
        credentials: Arc<dyn CredentialStore>,
        tx: UnboundedSender<Message>,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            api: ApiClient::new(config)?,
            cache: TaskCache::new(config.cache_path()),
            credentials,
            username: config.username.clone(),
            password: config.password.clone(),
            tx,
        })
    }

    pub fn perform(&self, effect: Effect) {
        match effect {
            Effect::LoadCache => {
                let _ = self.tx.send(Message::CacheLoaded(self.cache.load()));
            }

            Effect::SaveCache(tasks) => self.cache.save(&tasks),

            Effect::Login => {
                let api = self.api.clone();
                let username = self.username.clone();
                let password = self.password.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = api.login(&username, &password).await;
                    let _ = tx.send(Message::LoginCompleted(result));
                });
            }

            Effect::StoreToken(token) => {
                let credentials = self.credentials.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    // A store failure is not fatal here: the fetch reads
                    // the token back and surfaces the missing credential.
                    if let Err(e) = credentials.set(&token).await {
                        log::error!("Failed to store access token: {}", e);
                    }
                    let _ = tx.send(Message::TokenStored);
                });
            }

            Effect::FetchTasks => {
                let api = self.api.clone();
                let credentials = self.credentials.clone();
                let tx = self.tx.clone();
                tokio::spawn(async move {
                    let result = match credentials.get().await {
                        Ok(Some(token)) => api.list_tasks(&token).await,
                        Ok(None) => Err(ApiError::Auth),
                        Err(e) => {
                            log::error!("Keyring error: {}", e);
                            Err(ApiError::Auth)
                        }
                    };
                    let _ = tx.send(Message::TasksFetched(result));
                });
            }
        }
    }
}

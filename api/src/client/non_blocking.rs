use reqwest::{IntoUrl, Response, Url};
use serde::de::DeserializeOwned;

use crate::{
    client::Result,
    model::{Settings, SettingsUpdated, UpdateSettings},
    ApiError,
};

const SETTINGS_PATH: &str = "v1/settings";

#[derive(Clone, Debug)]
pub struct Client {
    client: reqwest::Client,
    url: Url,
}

impl Client {
    /// Creates new client instance. `url` is the server root, e.g. `http://127.0.0.1:8000/`.
    ///
    /// # Errors
    /// Fails on invalid URL.
    pub fn new(url: impl IntoUrl) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::new(),
            url: url.into_url()?.join(SETTINGS_PATH)?,
        })
    }

    /// Fetch the settings, which the server creates on first access.
    ///
    /// # Errors
    /// Fails on network issue, bad response or an error returned by the server.
    pub async fn get_settings(&self) -> Result<Settings> {
        let resp = self.client.get(self.url.clone()).send().await?;
        decode(resp).await
    }

    /// Send a partial update. Each branch present in `update` replaces the stored one.
    ///
    /// # Errors
    /// Fails on network issue, bad response or an error returned by the server.
    pub async fn update_settings(&self, update: &UpdateSettings) -> Result<SettingsUpdated> {
        let resp = self
            .client
            .put(self.url.clone())
            .json(update)
            .send()
            .await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp.json().await?)
    } else {
        let err = resp.json::<ApiError>().await?.with_status(status);
        Err(err.into())
    }
}

//! Retrieval of remote tiles into files.

use std::fs::{self, File};
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::error::FetchError;

/// Default per-request timeout for tile downloads.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

static USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Downloads a URL into a file.
///
/// On error, `dest` must not be left holding a partial response.
pub trait TileFetcher: Send + Sync {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError>;
}

/// Blocking HTTP fetcher. Only a 2xx status counts as success.
pub struct HttpTileFetcher {
    client: Client,
}

impl HttpTileFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(30)))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

impl TileFetcher for HttpTileFetcher {
    fn fetch(&self, url: &str, dest: &Path) -> Result<(), FetchError> {
        let mut response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let mut file = File::create(dest)?;
        match response.copy_to(&mut file) {
            Ok(bytes) => {
                debug!(url, bytes, path = %dest.display(), "Tile downloaded");
                Ok(())
            }
            Err(e) => {
                drop(file);
                let _ = fs::remove_file(dest);
                Err(e.into())
            }
        }
    }
}

// Keyring-backed credential store
//
// One keychain entry per profile (`unigate` / `<profile>/session-token`).
// The platform APIs block, so every access runs on the blocking pool.

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use unigate_api::{CredentialStore, Error, SessionToken, TokenChannel, TokenStream};

const SERVICE: &str = "unigate";

/// Durable store in the platform keychain.
#[derive(Debug)]
pub struct KeyringCredentialStore {
    account: String,
    channel: TokenChannel,
    write_lock: Mutex<()>,
}

impl KeyringCredentialStore {
    /// Read the profile's entry once; the channel is authoritative afterwards.
    pub async fn open(profile_name: &str) -> Result<Self, Error> {
        let account = format!("{profile_name}/session-token");
        let initial = {
            let account = account.clone();
            blocking(move || match entry(&account)?.get_password() {
                Ok(raw) if !raw.trim().is_empty() => Ok(Some(SessionToken::new(raw))),
                Ok(_) | Err(keyring::Error::NoEntry) => Ok(None),
                Err(e) => Err(keyring_err(&e)),
            })
            .await?
        };
        debug!(%account, present = initial.is_some(), "opened keyring entry");

        Ok(Self {
            account,
            channel: TokenChannel::new(initial),
            write_lock: Mutex::new(()),
        })
    }
}

fn entry(account: &str) -> Result<keyring::Entry, Error> {
    keyring::Entry::new(SERVICE, account).map_err(|e| keyring_err(&e))
}

fn keyring_err(e: &keyring::Error) -> Error {
    Error::CredentialStorage(format!("keyring: {e}"))
}

async fn blocking<T, F>(f: F) -> Result<T, Error>
where
    F: FnOnce() -> Result<T, Error> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::CredentialStorage(format!("keyring task failed: {e}")))?
}

#[async_trait]
impl CredentialStore for KeyringCredentialStore {
    fn observe(&self) -> TokenStream {
        self.channel.stream()
    }

    async fn save(&self, token: SessionToken) -> Result<(), Error> {
        let _guard = self.write_lock.lock().await;
        if self.channel.value().as_ref() == Some(&token) {
            return Ok(());
        }

        let account = self.account.clone();
        let raw = token.clone();
        blocking(move || {
            entry(&account)?
                .set_password(raw.expose())
                .map_err(|e| keyring_err(&e))
        })
        .await?;
        debug!(account = %self.account, "session token saved to keyring");
        self.channel.publish(Some(token));
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        let _guard = self.write_lock.lock().await;
        let account = self.account.clone();
        blocking(move || match entry(&account)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(keyring_err(&e)),
        })
        .await?;
        self.channel.publish(None);
        Ok(())
    }

    async fn current(&self) -> Option<SessionToken> {
        self.channel.value()
    }
}

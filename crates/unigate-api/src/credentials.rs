// Credential store
//
// Durable, observable storage of zero-or-one session token. Every store
// keeps a `watch` channel next to its medium, so `observe()` hands each
// subscriber the current value first and every later change after it.

use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use secrecy::{ExposeSecret, SecretString};
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, watch};
use tokio_stream::wrappers::WatchStream;
use tracing::debug;

use crate::error::Error;

/// Stream of token-or-absent values produced by [`CredentialStore::observe`].
pub type TokenStream = BoxStream<'static, Option<SessionToken>>;

// ── SessionToken ────────────────────────────────────────────────────

/// Opaque bearer credential issued by the API at login.
///
/// Wraps a [`SecretString`] so the raw value never shows up in `Debug`
/// output or log lines.
#[derive(Clone)]
pub struct SessionToken(SecretString);

impl SessionToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(SecretString::from(raw.into()))
    }

    /// The raw token, for building the `Authorization` header.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Whitespace-only tokens are never sent.
    pub fn is_blank(&self) -> bool {
        self.expose().trim().is_empty()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(****)")
    }
}

impl PartialEq for SessionToken {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for SessionToken {}

impl From<String> for SessionToken {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl From<&str> for SessionToken {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

// ── CredentialStore ─────────────────────────────────────────────────

/// Durable holder of the current session token (or its absence).
///
/// Only the login, logout, and unauthorized-response flows write to it;
/// the last writer wins.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Subscribe to the stored value: emits the current value immediately,
    /// then once per change, for as long as the subscriber keeps polling.
    fn observe(&self) -> TokenStream;

    /// Persist `token`, replacing any previous value. Saving the value
    /// already stored is a no-op.
    async fn save(&self, token: SessionToken) -> Result<(), Error>;

    /// Remove the stored token. Clearing an empty store is a no-op.
    async fn clear(&self) -> Result<(), Error>;

    /// The value a fresh subscriber would see first.
    async fn current(&self) -> Option<SessionToken> {
        self.observe().next().await.flatten()
    }
}

/// The change-notification half shared by every store implementation,
/// including ones defined outside this crate.
#[derive(Debug)]
pub struct TokenChannel {
    tx: watch::Sender<Option<SessionToken>>,
}

impl TokenChannel {
    pub fn new(initial: Option<SessionToken>) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { tx }
    }

    /// Replace the published value; subscribers are only woken on change.
    pub fn publish(&self, value: Option<SessionToken>) {
        // `send_if_modified` updates unconditionally, even with zero receivers.
        self.tx.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
    }

    pub fn stream(&self) -> TokenStream {
        WatchStream::new(self.tx.subscribe()).boxed()
    }

    pub fn value(&self) -> Option<SessionToken> {
        self.tx.borrow().clone()
    }
}

// ── MemoryCredentialStore ───────────────────────────────────────────

/// Volatile, per-process store. Matches the web portal's per-session
/// storage: nothing survives a restart.
#[derive(Debug)]
pub struct MemoryCredentialStore {
    channel: TokenChannel,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            channel: TokenChannel::new(None),
        }
    }

    /// Start with a token already stored.
    pub fn with_token(token: SessionToken) -> Self {
        Self {
            channel: TokenChannel::new(Some(token)),
        }
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    fn observe(&self) -> TokenStream {
        self.channel.stream()
    }

    async fn save(&self, token: SessionToken) -> Result<(), Error> {
        self.channel.publish(Some(token));
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        self.channel.publish(None);
        Ok(())
    }

    async fn current(&self) -> Option<SessionToken> {
        self.channel.value()
    }
}

// ── FileCredentialStore ─────────────────────────────────────────────

/// Durable store backed by a single file holding the raw token.
///
/// The file is read once on [`open`](Self::open); afterwards the in-memory
/// channel is authoritative for readers and every mutation is written
/// through before subscribers are notified.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    channel: TokenChannel,
    write_lock: Mutex<()>,
}

impl FileCredentialStore {
    /// Open (or lazily create) the store at `path`.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let initial = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => {
                let raw = raw.trim();
                (!raw.is_empty()).then(|| SessionToken::new(raw))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                return Err(Error::CredentialStorage(format!(
                    "failed to read {}: {e}",
                    path.display()
                )));
            }
        };
        debug!(path = %path.display(), present = initial.is_some(), "opened token file");
        Ok(Self {
            path,
            channel: TokenChannel::new(initial),
            write_lock: Mutex::new(()),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn write_file(&self, token: &SessionToken) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| storage_err(&self.path, &e))?;
        }

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        // Owner-only from creation.
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options
            .open(&self.path)
            .await
            .map_err(|e| storage_err(&self.path, &e))?;

        // A file left over from an older run keeps its old mode on open.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))
                .await
                .map_err(|e| storage_err(&self.path, &e))?;
        }

        file.write_all(token.expose().as_bytes())
            .await
            .map_err(|e| storage_err(&self.path, &e))?;
        file.flush()
            .await
            .map_err(|e| storage_err(&self.path, &e))?;
        Ok(())
    }
}

fn storage_err(path: &Path, e: &std::io::Error) -> Error {
    Error::CredentialStorage(format!("{}: {e}", path.display()))
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    fn observe(&self) -> TokenStream {
        self.channel.stream()
    }

    async fn save(&self, token: SessionToken) -> Result<(), Error> {
        let _guard = self.write_lock.lock().await;
        if self.channel.value().as_ref() == Some(&token) {
            return Ok(());
        }
        self.write_file(&token).await?;
        debug!(path = %self.path.display(), "session token saved");
        self.channel.publish(Some(token));
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        let _guard = self.write_lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => debug!(path = %self.path.display(), "session token removed"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(storage_err(&self.path, &e)),
        }
        self.channel.publish(None);
        Ok(())
    }

    async fn current(&self) -> Option<SessionToken> {
        self.channel.value()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    async fn next_within(stream: &mut TokenStream, ms: u64) -> Option<Option<SessionToken>> {
        tokio::time::timeout(Duration::from_millis(ms), stream.next())
            .await
            .ok()
            .flatten()
    }

    #[test]
    fn debug_output_is_redacted() {
        let token = SessionToken::new("eyJhbGciOi.secret");
        assert_eq!(format!("{token:?}"), "SessionToken(****)");
    }

    #[test]
    fn blank_tokens_are_detected() {
        assert!(SessionToken::new("   ").is_blank());
        assert!(!SessionToken::new("abc").is_blank());
    }

    #[tokio::test]
    async fn first_emission_after_save_is_the_saved_token() {
        let store = MemoryCredentialStore::new();
        store.save(SessionToken::new("t1")).await.unwrap();

        let mut stream = store.observe();
        assert_eq!(stream.next().await, Some(Some(SessionToken::new("t1"))));
    }

    #[tokio::test]
    async fn clear_emits_absent_until_next_save() {
        let store = MemoryCredentialStore::with_token(SessionToken::new("t1"));
        let mut stream = store.observe();
        assert_eq!(stream.next().await, Some(Some(SessionToken::new("t1"))));

        store.clear().await.unwrap();
        assert_eq!(next_within(&mut stream, 200).await, Some(None));

        let mut late = store.observe();
        assert_eq!(late.next().await, Some(None));

        store.save(SessionToken::new("t2")).await.unwrap();
        assert_eq!(
            next_within(&mut stream, 200).await,
            Some(Some(SessionToken::new("t2")))
        );
    }

    #[tokio::test]
    async fn saving_the_same_token_does_not_emit() {
        let store = MemoryCredentialStore::new();
        let mut stream = store.observe();
        assert_eq!(stream.next().await, Some(None));

        store.save(SessionToken::new("same")).await.unwrap();
        assert_eq!(
            next_within(&mut stream, 200).await,
            Some(Some(SessionToken::new("same")))
        );

        store.save(SessionToken::new("same")).await.unwrap();
        assert_eq!(next_within(&mut stream, 50).await, None);
    }

    #[tokio::test]
    async fn clearing_an_empty_store_is_a_no_op() {
        let store = MemoryCredentialStore::new();
        store.clear().await.unwrap();
        store.clear().await.unwrap();
        assert_eq!(store.current().await, None);
    }

    #[tokio::test]
    async fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("token");

        let store = FileCredentialStore::open(&path).await.unwrap();
        assert_eq!(store.current().await, None);
        store.save(SessionToken::new("durable")).await.unwrap();
        drop(store);

        let reopened = FileCredentialStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.current().await,
            Some(SessionToken::new("durable"))
        );
    }

    #[tokio::test]
    async fn file_store_clear_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");

        let store = FileCredentialStore::open(&path).await.unwrap();
        store.save(SessionToken::new("gone-soon")).await.unwrap();
        assert!(path.exists());

        store.clear().await.unwrap();
        assert!(!path.exists());
        assert_eq!(store.observe().next().await, Some(None));

        // Second clear with no file is still fine.
        store.clear().await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "stale").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let fresh_path = dir.path().join("fresh");
        for p in [&path, &fresh_path] {
            let store = FileCredentialStore::open(p).await.unwrap();
            store.save(SessionToken::new("private")).await.unwrap();

            let mode = std::fs::metadata(p).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600, "{}", p.display());
            assert_eq!(std::fs::read_to_string(p).unwrap(), "private");
        }
    }

    #[tokio::test]
    async fn empty_token_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "\n").unwrap();

        let store = FileCredentialStore::open(&path).await.unwrap();
        assert_eq!(store.current().await, None);
    }
}

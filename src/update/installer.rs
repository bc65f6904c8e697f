//! Download, extract, and replace-in-place installation.
//!
//! The installed bundle is only touched after the archive has been
//! downloaded and extracted in full. The swap itself renames the old
//! bundle aside, moves the new one in, and restores the old one if the
//! second rename fails.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::fs;
use tokio::process::Command;

use super::error::{Result, UpdateError};
use super::manifest::Manifest;

const ARCHIVE_NAME: &str = "update.zip";
const EXTRACT_DIR: &str = "extracted";

// ============================================================================
// Installer trait
// ============================================================================

/// Installs a release described by a manifest.
#[async_trait]
pub trait Installer: Send + Sync {
    /// Downloads and installs the release. Returns the installed bundle path.
    async fn install(&self, manifest: &Manifest) -> Result<PathBuf>;

    /// Starts the freshly installed bundle.
    fn relaunch(&self, bundle: &Path) -> Result<()>;
}

// ============================================================================
// BundleInstaller
// ============================================================================

/// Builds the HTTP client for archive downloads.
///
/// `connect_timeout` bounds reaching the server; `download_timeout` bounds
/// the whole transfer, which can take far longer than a manifest request.
pub fn download_client(connect_timeout: Duration, download_timeout: Duration) -> Result<Client> {
    Ok(Client::builder()
        .connect_timeout(connect_timeout)
        .timeout(download_timeout)
        .user_agent(concat!("standup/", env!("CARGO_PKG_VERSION")))
        .build()?)
}

/// Replaces a macOS `.app` bundle with the one from a downloaded zip.
#[derive(Debug, Clone)]
pub struct BundleInstaller {
    client: Client,
    bundle_path: Option<PathBuf>,
    scratch_dir: PathBuf,
}

impl BundleInstaller {
    /// Creates an installer that replaces `bundle_path`.
    pub fn new(client: Client, bundle_path: impl Into<PathBuf>, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            bundle_path: Some(bundle_path.into()),
            scratch_dir: scratch_dir.into(),
        }
    }

    /// Creates an installer for the bundle containing the running binary.
    ///
    /// Outside a bundle (e.g. `cargo run`) every install fails with
    /// [`UpdateError::NotInstalled`] before anything is downloaded.
    pub fn for_current_exe(client: Client, scratch_dir: impl Into<PathBuf>) -> Self {
        let bundle_path = std::env::current_exe()
            .ok()
            .and_then(|exe| enclosing_bundle(&exe));
        if bundle_path.is_none() {
            tracing::debug!("Not running from an application bundle");
        }
        Self {
            client,
            bundle_path,
            scratch_dir: scratch_dir.into(),
        }
    }

    pub fn bundle_path(&self) -> Option<&Path> {
        self.bundle_path.as_deref()
    }

    /// Downloads the archive into `dir`.
    async fn download(&self, url: &str, dir: &Path) -> Result<PathBuf> {
        tracing::info!(url = %url, "Downloading update");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpdateError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let bytes = response.bytes().await?;

        let archive = dir.join(ARCHIVE_NAME);
        fs::write(&archive, &bytes)
            .await
            .map_err(|e| UpdateError::io("Failed to write update archive", e))?;
        Ok(archive)
    }

    async fn stage(&self, manifest: &Manifest, dir: &Path) -> Result<PathBuf> {
        let archive = self.download(&manifest.download_url, dir).await?;
        let extract_dir = dir.join(EXTRACT_DIR);
        extract(&archive, &extract_dir).await?;
        find_bundle(&extract_dir).await
    }
}

#[async_trait]
impl Installer for BundleInstaller {
    async fn install(&self, manifest: &Manifest) -> Result<PathBuf> {
        let target = self.bundle_path.as_deref().ok_or(UpdateError::NotInstalled)?;
        let work_dir = self
            .scratch_dir
            .join(format!("standup-update-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&work_dir)
            .await
            .map_err(|e| UpdateError::io("Failed to create scratch directory", e))?;

        let result = match self.stage(manifest, &work_dir).await {
            Ok(new_bundle) => replace_bundle(&new_bundle, target)
                .await
                .map(|()| target.to_path_buf()),
            Err(e) => Err(e),
        };

        if let Err(e) = fs::remove_dir_all(&work_dir).await {
            tracing::warn!(path = %work_dir.display(), error = %e, "Failed to clean scratch directory");
        }

        if result.is_ok() {
            tracing::info!(version = %manifest.version, "Update installed");
        }
        result
    }

    fn relaunch(&self, bundle: &Path) -> Result<()> {
        if !cfg!(target_os = "macos") {
            return Err(UpdateError::Relaunch("relaunch requires macOS".to_string()));
        }
        std::process::Command::new("/usr/bin/open")
            .arg("-n")
            .arg(bundle)
            .spawn()
            .map(|_| ())
            .map_err(|e| UpdateError::Relaunch(e.to_string()))
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Returns the nearest ancestor of `path` ending in `.app`.
pub fn enclosing_bundle(path: &Path) -> Option<PathBuf> {
    path.ancestors()
        .find(|p| is_bundle(p))
        .map(Path::to_path_buf)
}

fn is_bundle(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "app")
}

/// Extracts a zip archive with the platform tool.
async fn extract(archive: &Path, dest: &Path) -> Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        let mut c = Command::new("/usr/bin/ditto");
        c.arg("-x").arg("-k").arg(archive).arg(dest);
        c
    } else {
        let mut c = Command::new("unzip");
        c.arg("-q").arg(archive).arg("-d").arg(dest);
        c
    };

    let output = command
        .output()
        .await
        .map_err(|e| UpdateError::Extraction(e.to_string()))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(UpdateError::Extraction(stderr.trim().to_string()));
    }
    Ok(())
}

/// Finds the first `.app` bundle at the top of `dir` or one level below.
async fn find_bundle(dir: &Path) -> Result<PathBuf> {
    let mut pending = vec![(dir.to_path_buf(), 0)];
    while let Some((current, depth)) = pending.pop() {
        let mut entries = fs::read_dir(&current)
            .await
            .map_err(|e| UpdateError::io("Failed to read extracted files", e))?;
        let mut subdirs = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| UpdateError::io("Failed to read extracted files", e))?
        {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            if is_bundle(&path) {
                return Ok(path);
            }
            // Skip the resource fork directory some zips carry.
            if depth == 0 && entry.file_name() != "__MACOSX" {
                subdirs.push((path, depth + 1));
            }
        }
        pending.extend(subdirs);
    }
    Err(UpdateError::BundleNotFound(dir.to_path_buf()))
}

fn backup_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".old");
    target.with_file_name(name)
}

/// Swaps `new_bundle` into `target`, keeping the old bundle until the
/// new one is in place.
async fn replace_bundle(new_bundle: &Path, target: &Path) -> Result<()> {
    let backup = backup_path(target);
    if fs::try_exists(&backup).await.unwrap_or(false) {
        fs::remove_dir_all(&backup)
            .await
            .map_err(|e| UpdateError::io("Failed to remove stale backup", e))?;
    }

    let had_target = fs::try_exists(target).await.unwrap_or(false);
    if had_target {
        fs::rename(target, &backup)
            .await
            .map_err(|e| UpdateError::io("Failed to move installed bundle aside", e))?;
    }

    if let Err(e) = fs::rename(new_bundle, target).await {
        if had_target {
            if let Err(restore) = fs::rename(&backup, target).await {
                tracing::error!(error = %restore, "Failed to restore previous bundle");
            }
        }
        return Err(UpdateError::io("Failed to install new bundle", e));
    }

    if had_target {
        if let Err(e) = fs::remove_dir_all(&backup).await {
            tracing::warn!(path = %backup.display(), error = %e, "Failed to remove old bundle");
        }
    }
    Ok(())
}

// ============================================================================
// MockInstaller
// ============================================================================

/// Installer that records requests instead of touching the disk.
#[derive(Debug, Default)]
pub struct MockInstaller {
    installed: Mutex<Vec<String>>,
    relaunched: AtomicBool,
    should_fail: AtomicBool,
}

impl MockInstaller {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, fail: bool) {
        self.should_fail.store(fail, Ordering::SeqCst);
    }

    /// Versions passed to `install`, in order.
    pub fn installed_versions(&self) -> Vec<String> {
        self.installed.lock().unwrap().clone()
    }

    pub fn was_relaunched(&self) -> bool {
        self.relaunched.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Installer for MockInstaller {
    async fn install(&self, manifest: &Manifest) -> Result<PathBuf> {
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(UpdateError::Extraction("mock failure".to_string()));
        }
        self.installed.lock().unwrap().push(manifest.version.clone());
        Ok(PathBuf::from("/Applications/Standup.app"))
    }

    fn relaunch(&self, _bundle: &Path) -> Result<()> {
        self.relaunched.store(true, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

use std::os::unix::fs::{FileTypeExt, MetadataExt, PermissionsExt};
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use msgslot_core::SlotRegistry;
use tracing::{debug, info};

use crate::error::{Result, ServiceError};
use crate::session::Session;

/// The service endpoint: owns the process-wide slot registry and the
/// Unix domain socket clients connect to.
///
/// The registry lives exactly as long as the listener; dropping the
/// last reference tears down every slot and channel, which is the only
/// point at which stored messages are discarded.
pub struct SlotListener {
    listener: UnixListener,
    path: PathBuf,
    created_inode: Option<(u64, u64)>,
    registry: Arc<SlotRegistry>,
    next_session_id: AtomicU64,
}

impl SlotListener {
    /// Permission mode for the created socket path.
    const SOCKET_MODE: u32 = 0o600;
    /// `sockaddr_un.sun_path` is 108 bytes on Linux, 104 on macOS.
    #[cfg(target_os = "linux")]
    const MAX_PATH_LEN: usize = 108;
    #[cfg(not(target_os = "linux"))]
    const MAX_PATH_LEN: usize = 104;

    /// Bind the service socket and create an empty registry.
    ///
    /// A stale socket file left by a previous run is removed first;
    /// anything at the path that is not a socket is refused.
    pub fn bind(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let path_bytes = path.as_os_str().len();
        if path_bytes >= Self::MAX_PATH_LEN {
            return Err(ServiceError::PathTooLong {
                path,
                len: path_bytes,
                max: Self::MAX_PATH_LEN,
            });
        }

        if path.exists() {
            let metadata = std::fs::symlink_metadata(&path).map_err(|e| ServiceError::Bind {
                path: path.clone(),
                source: e,
            })?;
            if metadata.file_type().is_socket() {
                debug!(?path, "removing stale socket");
                std::fs::remove_file(&path).map_err(|e| ServiceError::Bind {
                    path: path.clone(),
                    source: e,
                })?;
            } else {
                return Err(ServiceError::Bind {
                    path: path.clone(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::AlreadyExists,
                        "existing path is not a unix socket",
                    ),
                });
            }
        }

        let listener = UnixListener::bind(&path).map_err(|e| ServiceError::Bind {
            path: path.clone(),
            source: e,
        })?;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(Self::SOCKET_MODE))
            .map_err(|e| ServiceError::Bind {
                path: path.clone(),
                source: e,
            })?;
        let metadata = std::fs::symlink_metadata(&path).map_err(|e| ServiceError::Bind {
            path: path.clone(),
            source: e,
        })?;

        info!(?path, "slot service listening");

        Ok(Self {
            listener,
            path,
            created_inode: Some((metadata.dev(), metadata.ino())),
            registry: Arc::new(SlotRegistry::new()),
            next_session_id: AtomicU64::new(1),
        })
    }

    /// Accept the next connection (blocking) as a new session.
    pub fn accept(&self) -> Result<Session> {
        let (stream, _addr) = self.listener.accept().map_err(ServiceError::Accept)?;
        let id = self.next_session_id.fetch_add(1, Ordering::Relaxed);
        debug!(session = id, "accepted connection");
        Ok(Session::new(stream, Arc::clone(&self.registry), id))
    }

    /// The registry hosted by this listener.
    pub fn registry(&self) -> &Arc<SlotRegistry> {
        &self.registry
    }

    /// The path this service is bound to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SlotListener {
    fn drop(&mut self) {
        // Remove the socket file only if it is still the one we created.
        if let Some((dev, ino)) = self.created_inode {
            if let Ok(metadata) = std::fs::symlink_metadata(&self.path) {
                if metadata.file_type().is_socket()
                    && metadata.dev() == dev
                    && metadata.ino() == ino
                {
                    debug!(path = ?self.path, "removing socket file");
                    let _ = std::fs::remove_file(&self.path);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "msgslot-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time should be after epoch")
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
        dir
    }

    #[test]
    fn bind_creates_hardened_socket() {
        let dir = temp_dir("bind");
        let sock = dir.join("svc.sock");

        let listener = SlotListener::bind(&sock).expect("bind should succeed");
        assert!(sock.exists());
        let mode = std::fs::metadata(&sock).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
        assert_eq!(listener.registry().slot_count(), 0);

        drop(listener);
        assert!(!sock.exists(), "socket file should be removed on drop");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn bind_rejects_overlong_path() {
        let long = format!("/tmp/{}.sock", "m".repeat(200));
        assert!(matches!(
            SlotListener::bind(&long),
            Err(ServiceError::PathTooLong { .. })
        ));
    }

    #[test]
    fn bind_refuses_existing_regular_file() {
        let dir = temp_dir("regular");
        let sock = dir.join("not-a-socket");
        std::fs::write(&sock, b"plain file").unwrap();

        assert!(matches!(
            SlotListener::bind(&sock),
            Err(ServiceError::Bind { .. })
        ));
        assert!(sock.exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn rebind_replaces_stale_socket() {
        let dir = temp_dir("stale");
        let sock = dir.join("svc.sock");

        let first = SlotListener::bind(&sock).expect("first bind should succeed");
        // Simulate a crashed service: forget the listener so drop never
        // removes the file.
        std::mem::forget(first);
        assert!(sock.exists());

        let second = SlotListener::bind(&sock).expect("rebind over stale socket should succeed");
        drop(second);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn drop_leaves_replaced_path_alone() {
        let dir = temp_dir("replaced");
        let sock = dir.join("svc.sock");

        let listener = SlotListener::bind(&sock).expect("bind should succeed");
        std::fs::remove_file(&sock).unwrap();
        std::fs::write(&sock, b"replacement").unwrap();

        drop(listener);
        assert!(sock.exists(), "drop must not remove a replaced path");
        let _ = std::fs::remove_dir_all(&dir);
    }
}

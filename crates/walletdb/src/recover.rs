//! Salvage, scheduled flushing, and timestamped backups.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use sigmad_log::{log_info, log_warn};
use sigmad_primitives::encoding::Decoder;
use sigmad_storage::{Column, KeyValueStore};

use crate::codec::read_key_prefix;
use crate::error::WalletDbError;
use crate::load::{handler_for, Wallet};
use crate::walletdb::FORMAT_CURRENT;

pub const DEFAULT_FLUSH_WALLET: bool = true;

/// Prefixes that carry key material or the state needed to use it. A
/// keys-only salvage keeps exactly these.
const KEY_MATERIAL_PREFIXES: &[&str] = &[
    "key",
    "ckey",
    "keymeta",
    "mkey",
    "defaultkey",
    "pool",
    "cscript",
    "watchs",
    "hdchain",
    "minversion",
    "version",
];

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct RecoverStats {
    pub salvaged: usize,
    pub skipped: usize,
}

/// Copy every record that still round-trips through its decoder from a
/// damaged store into a fresh one. Records that fail to decode are dropped,
/// not repaired; with `keys_only` everything outside the key-material
/// prefixes is dropped too.
pub fn recover<S: KeyValueStore, D: KeyValueStore>(
    damaged: &S,
    fresh: &D,
    keys_only: bool,
) -> Result<RecoverStats, WalletDbError> {
    let mut stats = RecoverStats::default();
    let mut scratch = Wallet::new();

    for (key, value) in damaged.scan_prefix(Column::Wallet, &[])? {
        let mut key_decoder = Decoder::new(&key);
        let prefix = match read_key_prefix(&mut key_decoder) {
            Ok(prefix) => prefix,
            Err(_) => {
                stats.skipped += 1;
                continue;
            }
        };
        if keys_only && !KEY_MATERIAL_PREFIXES.contains(&prefix.as_str()) {
            continue;
        }
        let Some(handler) = handler_for(&prefix) else {
            stats.skipped += 1;
            continue;
        };
        match handler(&mut scratch, &mut key_decoder, &value) {
            Ok(()) => {
                fresh.put(Column::Wallet, &key, &value)?;
                stats.salvaged += 1;
            }
            Err(_) => stats.skipped += 1,
        }
    }

    fresh.put(Column::Meta, b"format", &[FORMAT_CURRENT])?;
    log_info!(
        "wallet salvage: {} records recovered, {} unreadable",
        stats.salvaged,
        stats.skipped
    );
    Ok(stats)
}

#[derive(Clone, Debug)]
pub struct FlushConfig {
    pub enabled: bool,
    pub interval: Duration,
}

impl Default for FlushConfig {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_FLUSH_WALLET,
            interval: Duration::from_secs(2),
        }
    }
}

pub struct FlushHandle {
    stop: Sender<()>,
    join: Option<JoinHandle<()>>,
}

impl FlushHandle {
    /// Stop the flush thread after one final flush.
    pub fn shutdown(mut self) {
        let _ = self.stop.send(());
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// Periodically flush buffered writes to durable storage. Returns `None`
/// when flushing is disabled. Flush failures are logged and retried on the
/// next tick rather than tearing the thread down.
pub fn spawn_flush_thread<S>(store: Arc<S>, config: FlushConfig) -> Option<FlushHandle>
where
    S: KeyValueStore + 'static,
{
    if !config.enabled {
        return None;
    }
    let (stop, ticks) = bounded::<()>(1);
    let interval = config.interval;
    let join = thread::spawn(move || loop {
        match ticks.recv_timeout(interval) {
            Err(RecvTimeoutError::Timeout) => {
                if let Err(err) = store.persist() {
                    log_warn!("periodic wallet flush failed: {err}");
                }
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if let Err(err) = store.persist() {
                    log_warn!("final wallet flush failed: {err}");
                }
                return;
            }
        }
    });
    Some(FlushHandle {
        stop,
        join: Some(join),
    })
}

fn copy_dir(src: &Path, dst: &Path) -> Result<(), std::io::Error> {
    fs::create_dir_all(dst)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Copy the wallet store directory into `backup_dir` under a timestamped
/// name, then prune the oldest backups beyond `retain`. Returns the path of
/// the new backup.
pub fn auto_backup_wallet(
    source_dir: &Path,
    backup_dir: &Path,
    retain: usize,
) -> Result<PathBuf, WalletDbError> {
    fs::create_dir_all(backup_dir)?;
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let mut target = backup_dir.join(format!("wallet-{stamp}.bak"));
    let mut suffix = 1u32;
    while target.exists() {
        target = backup_dir.join(format!("wallet-{stamp}-{suffix}.bak"));
        suffix += 1;
    }
    copy_dir(source_dir, &target)?;
    log_info!("wallet backup written to {}", target.display());

    let mut backups: Vec<(SystemTime, PathBuf)> = fs::read_dir(backup_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("wallet-") && name.ends_with(".bak"))
        })
        .map(|path| {
            let modified = fs::metadata(&path)
                .and_then(|meta| meta.modified())
                .unwrap_or(UNIX_EPOCH);
            (modified, path)
        })
        .collect();
    backups.sort();
    while backups.len() > retain {
        let (_, oldest) = backups.remove(0);
        if let Err(err) = fs::remove_dir_all(&oldest) {
            log_warn!("failed to prune old backup {}: {err}", oldest.display());
        }
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sigmad_storage::memory::MemoryStore;

    #[test]
    fn flush_thread_shuts_down() {
        let store = Arc::new(MemoryStore::new());
        let handle = spawn_flush_thread(
            store,
            FlushConfig {
                enabled: true,
                interval: Duration::from_millis(10),
            },
        )
        .unwrap();
        thread::sleep(Duration::from_millis(30));
        handle.shutdown();
    }

    #[test]
    fn disabled_flush_spawns_nothing() {
        let store = Arc::new(MemoryStore::new());
        assert!(spawn_flush_thread(
            store,
            FlushConfig {
                enabled: false,
                interval: Duration::from_secs(2),
            },
        )
        .is_none());
    }
}

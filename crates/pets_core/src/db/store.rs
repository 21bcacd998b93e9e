//! Process-lifetime store handle.
//!
//! # Responsibility
//! - Open the SQLite connections lazily on first use.
//! - Hand out a write path and a separate read path over the same engine.
//!
//! # Invariants
//! - Connections are opened (and the schema created) at most once per handle.
//! - The handle is never closed explicitly; it lives until dropped.
//! - File stores keep one writer plus a pool of query-only readers; a held
//!   read guard never blocks other readers or the writer.
//! - Memory stores have a single connection, so both paths share one guard.

use super::open::{open_db_with_timeout, open_reader, DEFAULT_BUSY_TIMEOUT};
use super::{DbError, DbResult};
use log::debug;
use once_cell::sync::OnceCell;
use rusqlite::Connection;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, TryLockError};
use std::time::Duration;

/// Reader connections opened for a file store unless configured otherwise.
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

/// Where the store lives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "path")]
pub enum StoreLocation {
    /// SQLite database file, created on first use.
    File(PathBuf),
    /// Private in-memory database, discarded with the handle.
    Memory,
}

#[derive(Debug)]
struct Connections {
    writer: Mutex<Connection>,
    readers: Vec<Mutex<Connection>>,
    read_cursor: AtomicUsize,
}

/// Lazily opened SQLite connections shared by all provider calls.
#[derive(Debug)]
pub struct StoreHandle {
    location: StoreLocation,
    busy_timeout: Duration,
    read_pool_size: usize,
    conns: OnceCell<Connections>,
}

impl StoreHandle {
    pub fn new(location: StoreLocation) -> Self {
        Self::with_busy_timeout(location, DEFAULT_BUSY_TIMEOUT)
    }

    pub fn with_busy_timeout(location: StoreLocation, busy_timeout: Duration) -> Self {
        Self {
            location,
            busy_timeout,
            read_pool_size: DEFAULT_READ_POOL_SIZE,
            conns: OnceCell::new(),
        }
    }

    /// Sets how many reader connections a file store opens. Zero routes
    /// reads through the writer.
    pub fn with_read_pool_size(mut self, read_pool_size: usize) -> Self {
        self.read_pool_size = read_pool_size;
        self
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Returns whether the connections have been opened yet.
    pub fn is_open(&self) -> bool {
        self.conns.get().is_some()
    }

    /// Access path for queries.
    ///
    /// Prefers an idle reader; waits on the next reader in turn when all are
    /// busy.
    pub fn readable(&self) -> DbResult<MutexGuard<'_, Connection>> {
        let conns = self.connections()?;
        if conns.readers.is_empty() {
            return conns.writer.lock().map_err(|_| DbError::LockPoisoned);
        }

        let len = conns.readers.len();
        let start = conns.read_cursor.fetch_add(1, Ordering::Relaxed) % len;
        for offset in 0..len {
            match conns.readers[(start + offset) % len].try_lock() {
                Ok(guard) => return Ok(guard),
                Err(TryLockError::WouldBlock) => continue,
                Err(TryLockError::Poisoned(_)) => return Err(DbError::LockPoisoned),
            }
        }
        conns.readers[start]
            .lock()
            .map_err(|_| DbError::LockPoisoned)
    }

    /// Access path for insert/update/delete.
    pub fn writable(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.connections()?
            .writer
            .lock()
            .map_err(|_| DbError::LockPoisoned)
    }

    fn connections(&self) -> DbResult<&Connections> {
        self.conns.get_or_try_init(|| {
            debug!(
                "event=store_open module=db status=start location={}",
                self.location_label()
            );
            match &self.location {
                StoreLocation::File(path) => {
                    let writer = open_db_with_timeout(Some(path.as_path()), self.busy_timeout)?;
                    let readers = (0..self.read_pool_size)
                        .map(|_| open_reader(path, self.busy_timeout).map(Mutex::new))
                        .collect::<DbResult<Vec<_>>>()?;
                    debug!(
                        "event=store_open module=db status=ok location={} readers={}",
                        self.location_label(),
                        readers.len()
                    );
                    Ok(Connections {
                        writer: Mutex::new(writer),
                        readers,
                        read_cursor: AtomicUsize::new(0),
                    })
                }
                StoreLocation::Memory => {
                    let writer = open_db_with_timeout(None, self.busy_timeout)?;
                    Ok(Connections {
                        writer: Mutex::new(writer),
                        readers: Vec::new(),
                        read_cursor: AtomicUsize::new(0),
                    })
                }
            }
        })
    }

    fn location_label(&self) -> String {
        match &self.location {
            StoreLocation::File(path) => path.display().to_string(),
            StoreLocation::Memory => ":memory:".to_string(),
        }
    }
}

// src/writer/file.rs

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::JoinHandle;

use anyhow::{Context, anyhow};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::{FileHandle, OutputWriter};
use crate::errors::Result;

#[derive(Debug)]
enum WriterMessage {
    Open { handle: FileHandle, path: PathBuf },
    Write { handle: FileHandle, data: Vec<u8> },
    Close { handle: FileHandle },
    Shutdown,
}

/// Writes each target's stdout to `outdir/<name>` and stderr to
/// `errdir/<name>`.
///
/// Requests are queued to a dedicated thread; errors there are logged, not
/// reported back, since there is nobody left to hand them to.
#[derive(Debug)]
pub struct FileWriter {
    outdir: Option<PathBuf>,
    errdir: Option<PathBuf>,
    next_handle: AtomicU64,
    tx: mpsc::UnboundedSender<WriterMessage>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl FileWriter {
    /// Create the output directories and start the writer thread.
    pub fn spawn(outdir: Option<PathBuf>, errdir: Option<PathBuf>) -> Result<Self> {
        for dir in outdir.iter().chain(errdir.iter()) {
            fs::create_dir_all(dir).with_context(|| format!("creating dir {:?}", dir))?;
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let thread = std::thread::Builder::new()
            .name("pssh-writer".to_string())
            .spawn(move || writer_loop(rx))
            .context("starting writer thread")?;

        Ok(Self {
            outdir,
            errdir,
            next_handle: AtomicU64::new(1),
            tx,
            thread: Mutex::new(Some(thread)),
        })
    }

    /// Flush everything queued so far and stop the writer thread.
    pub fn shutdown(&self) -> Result<()> {
        let _ = self.tx.send(WriterMessage::Shutdown);
        let handle = self
            .thread
            .lock()
            .map_err(|_| anyhow!("writer thread handle poisoned"))?
            .take();
        if let Some(handle) = handle {
            handle
                .join()
                .map_err(|_| anyhow!("writer thread panicked"))?;
        }
        Ok(())
    }

    fn open_in(&self, dir: Option<&Path>, name: &str) -> Option<FileHandle> {
        let dir = dir?;
        let handle = FileHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        self.send(WriterMessage::Open {
            handle,
            path: dir.join(name),
        });
        Some(handle)
    }

    fn send(&self, msg: WriterMessage) {
        if self.tx.send(msg).is_err() {
            warn!("output writer already stopped; dropping request");
        }
    }
}

impl OutputWriter for FileWriter {
    fn open_files(&self, name: &str) -> (Option<FileHandle>, Option<FileHandle>) {
        (
            self.open_in(self.outdir.as_deref(), name),
            self.open_in(self.errdir.as_deref(), name),
        )
    }

    fn write(&self, handle: FileHandle, data: &[u8]) {
        self.send(WriterMessage::Write {
            handle,
            data: data.to_vec(),
        });
    }

    fn close(&self, handle: FileHandle) {
        self.send(WriterMessage::Close { handle });
    }
}

fn writer_loop(mut rx: mpsc::UnboundedReceiver<WriterMessage>) {
    let mut files: HashMap<FileHandle, fs::File> = HashMap::new();

    while let Some(msg) = rx.blocking_recv() {
        match msg {
            WriterMessage::Open { handle, path } => match fs::File::create(&path) {
                Ok(file) => {
                    debug!(?path, "opened output file");
                    files.insert(handle, file);
                }
                Err(e) => warn!(?path, error = %e, "cannot create output file"),
            },
            WriterMessage::Write { handle, data } => {
                if let Some(file) = files.get_mut(&handle) {
                    if let Err(e) = file.write_all(&data) {
                        warn!(handle = handle.0, error = %e, "writing output file failed");
                    }
                }
            }
            WriterMessage::Close { handle } => {
                if let Some(mut file) = files.remove(&handle) {
                    if let Err(e) = file.flush() {
                        warn!(handle = handle.0, error = %e, "flushing output file failed");
                    }
                }
            }
            WriterMessage::Shutdown => break,
        }
    }

    debug!(open = files.len(), "writer loop finished");
}

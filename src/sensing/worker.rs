//! Capture thread shared by the device-backed sources.
//!
//! Camera handles and decoder contexts are not `Sync`, so they are created and
//! driven on a dedicated thread. The resource side only sees the newest frame.
use anyhow::{anyhow, bail, Result};
use bevy::log::warn;
use image::RgbaImage;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::Duration;

const OPEN_TIMEOUT: Duration = Duration::from_secs(10);
const IDLE_WAIT: Duration = Duration::from_millis(5);

pub(crate) struct FrameWorker {
    slot: Arc<Mutex<Option<RgbaImage>>>,
    stop: Arc<AtomicBool>,
}

impl FrameWorker {
    /// Run `open` on a new thread and wait for its verdict. On success the
    /// thread keeps calling `capture`, publishing every frame it returns.
    pub(crate) fn spawn<S, O, C>(name: &str, open: O, mut capture: C) -> Result<Self>
    where
        O: FnOnce() -> Result<S> + Send + 'static,
        C: FnMut(&mut S) -> Result<Option<RgbaImage>> + Send + 'static,
    {
        let slot: Arc<Mutex<Option<RgbaImage>>> = Arc::default();
        let stop = Arc::new(AtomicBool::new(false));
        let (ready_tx, ready_rx) = mpsc::channel::<Result<()>>();
        let (thread_slot, thread_stop) = (slot.clone(), stop.clone());
        let label = name.to_string();
        thread::Builder::new()
            .name(format!("{name}-capture"))
            .spawn(move || {
                let mut state = match open() {
                    Ok(state) => {
                        let _ = ready_tx.send(Ok(()));
                        state
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                while !thread_stop.load(Ordering::Relaxed) {
                    match capture(&mut state) {
                        Ok(Some(frame)) => {
                            if let Ok(mut latest) = thread_slot.lock() {
                                *latest = Some(frame);
                            }
                        }
                        Ok(None) => thread::sleep(IDLE_WAIT),
                        Err(e) => {
                            warn!(target: "sensing", "{label} stopped: {e:#}");
                            break;
                        }
                    }
                }
            })?;
        match ready_rx.recv_timeout(OPEN_TIMEOUT) {
            Ok(Ok(())) => Ok(Self { slot, stop }),
            Ok(Err(e)) => Err(e),
            Err(mpsc::RecvTimeoutError::Timeout) => {
                stop.store(true, Ordering::Relaxed);
                bail!("{name} did not start within {}s", OPEN_TIMEOUT.as_secs())
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(anyhow!("{name} thread exited during open")),
        }
    }

    /// Newest unread frame, if the thread produced one since the last call.
    pub(crate) fn take(&self) -> Option<RgbaImage> {
        self.slot.lock().ok()?.take()
    }
}

impl Drop for FrameWorker {
    fn drop(&mut self) {
        // A blocked capture call finishes before the thread sees the flag.
        self.stop.store(true, Ordering::Relaxed);
    }
}

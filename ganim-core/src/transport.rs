//! Play/pause, live WPM and cancellation for a running playback.
//!
//! The UI holds a [`Controller`]; the driver holds a [`Pacer`] built on the
//! receiving half of the same `watch` channel. Every suspension point in the
//! driver goes through the pacer, which is where cancellation and pausing
//! are observed.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::config::{char_interval, PlaybackConfig};
use crate::error::Error;

/// Live playback controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transport {
    pub paused: bool,
    pub words_per_minute: u32,
    pub cancelled: bool,
}

/// Why the driver stopped before finishing.
#[derive(Debug)]
pub(crate) enum Halt {
    Cancelled,
    Failed(Error),
}

impl From<Error> for Halt {
    fn from(e: Error) -> Self {
        Halt::Failed(e)
    }
}

/// Creates a linked controller / pacer pair seeded from `config`.
pub fn transport(config: &PlaybackConfig) -> (Controller, Pacer) {
    let (tx, rx) = watch::channel(Transport {
        paused: false,
        words_per_minute: config.words_per_minute.max(1),
        cancelled: false,
    });
    (Controller { tx }, Pacer { rx })
}

/// UI-side handle.
#[derive(Debug)]
pub struct Controller {
    tx: watch::Sender<Transport>,
}

impl Controller {
    pub fn current(&self) -> Transport {
        *self.tx.borrow()
    }

    /// Flips between playing and paused; returns the new `paused` value.
    pub fn toggle_pause(&self) -> bool {
        self.tx.send_modify(|t| t.paused = !t.paused);
        self.current().paused
    }

    pub fn set_words_per_minute(&self, wpm: u32) {
        self.tx.send_modify(|t| t.words_per_minute = wpm.max(1));
    }

    /// Requests cancellation. Takes effect at the driver's next suspension
    /// point, or immediately if it is already suspended.
    pub fn cancel(&self) {
        self.tx.send_modify(|t| t.cancelled = true);
    }
}

/// Driver-side handle.
#[derive(Debug, Clone)]
pub struct Pacer {
    rx: watch::Receiver<Transport>,
}

impl Pacer {
    pub fn is_cancelled(&self) -> bool {
        self.rx.borrow().cancelled
    }

    pub(crate) fn check(&self) -> Result<(), Halt> {
        if self.is_cancelled() {
            Err(Halt::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Parks while paused. A pacer whose controller is gone can never be
    /// resumed, so a pause at that point counts as cancellation.
    async fn hold(&mut self) -> Result<(), Halt> {
        loop {
            let t = *self.rx.borrow_and_update();
            if t.cancelled {
                return Err(Halt::Cancelled);
            }
            if !t.paused {
                return Ok(());
            }
            if self.rx.changed().await.is_err() {
                return Err(Halt::Cancelled);
            }
        }
    }

    /// One character interval at the current WPM.
    pub(crate) async fn tick(&mut self) -> Result<(), Halt> {
        let wpm = self.rx.borrow().words_per_minute;
        self.sleep(char_interval(wpm)).await
    }

    /// Sleeps for `duration` of unpaused time, waking early on cancellation.
    ///
    /// Any transport change re-arms the timer with whatever was left, so a
    /// pause suspends the countdown rather than eating into it.
    pub(crate) async fn sleep(&mut self, duration: Duration) -> Result<(), Halt> {
        let mut remaining = duration;
        loop {
            self.hold().await?;
            let armed = Instant::now();
            let deadline = armed + remaining;
            tokio::select! {
                () = tokio::time::sleep_until(deadline) => return Ok(()),
                changed = self.rx.changed() => {
                    if changed.is_err() {
                        tokio::time::sleep_until(deadline).await;
                        return Ok(());
                    }
                    remaining = remaining.saturating_sub(armed.elapsed());
                }
            }
        }
    }

    /// Awaits `fut` unless cancellation arrives first.
    pub(crate) async fn guard<F: Future>(&mut self, fut: F) -> Result<F::Output, Halt> {
        self.check()?;
        let mut rx = self.rx.clone();
        tokio::select! {
            out = fut => Ok(out),
            () = wait_cancelled(&mut rx) => Err(Halt::Cancelled),
        }
    }
}

async fn wait_cancelled(rx: &mut watch::Receiver<Transport>) {
    let closed = rx.wait_for(|t| t.cancelled).await.is_err();
    if closed {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn tick_waits_one_char_interval() {
        let (_ctl, mut pacer) = transport(&PlaybackConfig::default());
        let start = Instant::now();
        pacer.tick().await.unwrap();
        let elapsed = start.elapsed();
        // Paused-clock timers fire on millisecond boundaries.
        assert!(elapsed >= char_interval(500));
        assert!(elapsed <= char_interval(500) + Duration::from_millis(1));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_interrupts_sleep() {
        let (ctl, mut pacer) = transport(&PlaybackConfig::default());
        let task = tokio::spawn(async move { pacer.sleep(Duration::from_secs(60)).await });
        tokio::time::sleep(Duration::from_secs(1)).await;
        ctl.cancel();
        assert!(matches!(task.await.unwrap(), Err(Halt::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn pause_extends_sleep() {
        let (ctl, mut pacer) = transport(&PlaybackConfig::default());
        assert!(ctl.toggle_pause());
        let start = Instant::now();
        let task = tokio::spawn(async move { pacer.sleep(Duration::from_secs(1)).await });
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!ctl.toggle_pause());
        task.await.unwrap().unwrap();
        assert!(start.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn paused_time_does_not_count_against_the_sleep() {
        let (ctl, mut pacer) = transport(&PlaybackConfig::default());
        let start = Instant::now();
        let task = tokio::spawn(async move { pacer.sleep(Duration::from_secs(2)).await });
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(ctl.toggle_pause());
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(!ctl.toggle_pause());
        task.await.unwrap().unwrap();

        // 1s before the pause, 5s paused, the remaining 1s after.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(7), "woke after {elapsed:?}");
        assert!(elapsed <= Duration::from_secs(7) + Duration::from_millis(3));
    }

    #[tokio::test]
    async fn dropped_controller_while_paused_cancels() {
        let (ctl, mut pacer) = transport(&PlaybackConfig::default());
        ctl.toggle_pause();
        drop(ctl);
        assert!(matches!(pacer.sleep(Duration::from_millis(1)).await, Err(Halt::Cancelled)));
    }
}

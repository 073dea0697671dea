//! The terminal's side of the playback contract.
//!
//! [`TuiStage`] lives inside the playback task and forwards everything the
//! driver reports to the main loop as owned [`PlaybackEvent`]s. Scrolling is
//! eased by the UI on its own render clock, so `request_scroll` resolves as
//! soon as the request is queued.

use std::future::Future;

use ganim_core::{File, PlaybackState, Stage, Tab};
use tokio::sync::mpsc::UnboundedSender;

use crate::event::{AppEvent, PlaybackEvent, ViewSnapshot};

pub struct TuiStage {
    tx: UnboundedSender<AppEvent>,
}

impl TuiStage {
    pub fn new(tx: UnboundedSender<AppEvent>) -> Self {
        Self { tx }
    }

    /// A closed channel means the UI is shutting down; the driver will be
    /// cancelled shortly, so the update is dropped.
    fn publish(&self, event: PlaybackEvent) {
        let _ = self.tx.send(AppEvent::Playback(event));
    }
}

impl Stage for TuiStage {
    fn set_label(&mut self, label: &str) {
        self.publish(PlaybackEvent::Label(label.to_owned()));
    }

    fn files_changed(&mut self, tabs: Vec<Tab>) {
        self.publish(PlaybackEvent::Tabs(tabs));
    }

    fn request_scroll(&mut self, line: usize) -> impl Future<Output = ()> + Send {
        self.publish(PlaybackEvent::Scroll(line));
        std::future::ready(())
    }

    fn request_refresh(&mut self, file: &File) {
        self.publish(PlaybackEvent::Snapshot(Box::new(ViewSnapshot {
            path: file.path().to_path_buf(),
            content: file.content.clone(),
            cursor_line: file.cursor_line,
        })));
    }

    fn notice(&mut self, message: &str) {
        self.publish(PlaybackEvent::Notice(message.to_owned()));
    }

    fn state_changed(&mut self, state: PlaybackState) {
        self.publish(PlaybackEvent::State(state));
    }

    fn request_quit(&mut self) {
        self.publish(PlaybackEvent::QuitRequested);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ganim_core::{line_map, transport, Commit, Modification, Playback, PlaybackConfig};
    use tokio::sync::mpsc;

    fn drain(rx: &mut mpsc::UnboundedReceiver<AppEvent>) -> Vec<PlaybackEvent> {
        let mut out = Vec::new();
        while let Ok(AppEvent::Playback(e)) = rx.try_recv() {
            out.push(e);
        }
        out
    }

    #[tokio::test]
    async fn forwards_driver_calls_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut stage = TuiStage::new(tx);
        stage.set_label("mark: init");
        stage.request_scroll(3).await;
        let mut file = File::new("a.rs");
        file.content = vec!["fn".into()];
        stage.request_refresh(&file);

        let events = drain(&mut rx);
        assert!(matches!(&events[0], PlaybackEvent::Label(l) if l == "mark: init"));
        assert!(matches!(events[1], PlaybackEvent::Scroll(3)));
        match &events[2] {
            PlaybackEvent::Snapshot(s) => {
                assert_eq!(s.path, std::path::PathBuf::from("a.rs"));
                assert_eq!(s.content, vec!["fn"]);
            }
            other => panic!("expected snapshot, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn closed_ui_does_not_stall_the_driver() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let config = PlaybackConfig::default();
        let (_ctl, pacer) = transport(&config);
        let mut pb = Playback::new(config, TuiStage::new(tx), pacer);
        let commits = vec![Commit {
            author: "mark".into(),
            message: "init".into(),
            modifications: vec![Modification::add("f", line_map([(1, "x")]))],
        }];
        assert!(pb.run(&commits).await.is_ok());
    }
}

use std::collections::BTreeMap;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::util::task::TaskManager;

use super::{
    error::PlaybackError,
    progress::progress_percent,
    resource::{AudioResource, PlayerEvent},
    widget::{PlayerWidget, WidgetId},
};

/// Registry of live preview players that allows at most one of them to be
/// unpaused at any time.
///
/// Every mutation runs on the UI task, so a play-start always completes
/// before the next event is looked at.
#[derive(Default)]
pub struct PlaybackCoordinator {
    widgets: BTreeMap<WidgetId, PlayerWidget>,
    tickers: TaskManager<WidgetId>,
    next_id: u64,
}

impl PlaybackCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, track_id: u64, resource: Box<dyn AudioResource>) -> WidgetId {
        self.register_with(track_id, |_| resource)
    }

    /// Registers a widget whose resource needs to know its own id, e.g. to
    /// address the events it raises.
    pub fn register_with<F>(&mut self, track_id: u64, make: F) -> WidgetId
    where
        F: FnOnce(WidgetId) -> Box<dyn AudioResource>,
    {
        let id = WidgetId(self.next_id);
        self.next_id += 1;
        self.widgets.insert(id, PlayerWidget::new(track_id, make(id)));
        id
    }

    /// Ties a periodic tick task to a widget. The task is aborted straight
    /// away if the widget is already gone.
    pub fn attach_ticker(&mut self, id: WidgetId, task: JoinHandle<()>) {
        if self.widgets.contains_key(&id) {
            self.tickers.spawn(id, task);
        } else {
            task.abort();
        }
    }

    /// Stops the widget's ticker and drops its resource.
    pub fn dispose(&mut self, id: WidgetId) -> bool {
        self.tickers.abort(&id);
        self.widgets.remove(&id).is_some()
    }

    pub fn dispose_all(&mut self) {
        self.tickers.abort_all();
        self.widgets.clear();
    }

    pub fn get(&self, id: WidgetId) -> Option<&PlayerWidget> {
        self.widgets.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (WidgetId, &PlayerWidget)> {
        self.widgets.iter().map(|(id, w)| (*id, w))
    }

    pub fn active(&self) -> Option<WidgetId> {
        self.widgets
            .iter()
            .find(|(_, w)| !w.is_paused)
            .map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn has_ticker(&self, id: WidgetId) -> bool {
        self.tickers.contains(&id)
    }

    /// Pauses every other widget, then starts `id`. A no-op when `id` is
    /// already the one playing.
    pub fn play_started(&mut self, id: WidgetId) -> Result<(), PlaybackError> {
        let target = self
            .widgets
            .get(&id)
            .ok_or(PlaybackError::UnknownWidget(id))?;
        if !target.is_paused {
            return Ok(());
        }

        for (other_id, widget) in self.widgets.iter_mut() {
            if *other_id != id && !widget.is_paused {
                widget.resource.pause();
                widget.is_paused = true;
                debug!(widget = %other_id, "player_preempted");
            }
        }

        let target = self
            .widgets
            .get_mut(&id)
            .ok_or(PlaybackError::UnknownWidget(id))?;
        target.resource.play()?;
        target.is_paused = false;
        debug!(widget = %id, track = target.track_id(), "player_started");
        Ok(())
    }

    pub fn paused(&mut self, id: WidgetId) {
        if let Some(widget) = self.widgets.get_mut(&id) {
            if !widget.is_paused {
                widget.resource.pause();
                widget.is_paused = true;
            }
        }
    }

    pub fn pause_all(&mut self) {
        for widget in self.widgets.values_mut().filter(|w| !w.is_paused) {
            widget.resource.pause();
            widget.is_paused = true;
        }
    }

    /// Play button behaviour: start when paused, pause when playing.
    pub fn toggle(&mut self, id: WidgetId) -> Result<(), PlaybackError> {
        match self.widgets.get(&id) {
            Some(widget) if widget.is_paused => self.play_started(id),
            Some(_) => {
                self.paused(id);
                Ok(())
            }
            None => Err(PlaybackError::UnknownWidget(id)),
        }
    }

    pub fn buffering_started(&mut self, id: WidgetId) {
        if let Some(widget) = self.widgets.get_mut(&id) {
            widget.is_buffering = true;
        }
    }

    pub fn buffering_ended(&mut self, id: WidgetId) {
        if let Some(widget) = self.widgets.get_mut(&id) {
            widget.is_buffering = false;
        }
    }

    pub fn handle_event(&mut self, id: WidgetId, event: PlayerEvent) {
        match event {
            PlayerEvent::Waiting => self.buffering_started(id),
            PlayerEvent::CanPlay => self.buffering_ended(id),
            PlayerEvent::Failed(reason) => {
                warn!(widget = %id, "player_failed: {reason}");
                self.buffering_ended(id);
                self.paused(id);
            }
        }
    }

    /// Refreshes the widget's progress from its resource. Returns the
    /// current percentage, or `None` when the widget is gone or its clip has
    /// not loaded yet.
    pub fn tick(&mut self, id: WidgetId) -> Option<f64> {
        let widget = self.widgets.get_mut(&id)?;
        let position = widget.resource.current_time()?;

        if let Some(pct) = widget
            .resource
            .duration()
            .and_then(|duration| progress_percent(position, duration))
        {
            widget.progress_percent = pct;
        }

        if widget.resource.has_ended() && !widget.is_paused {
            widget.progress_percent = 100.0;
            widget.is_paused = true;
            debug!(widget = %id, "player_ended");
        }

        Some(widget.progress_percent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    #[derive(Debug, Default)]
    struct FakeState {
        playing: bool,
        plays: usize,
        pauses: usize,
        position: Option<Duration>,
        duration: Option<Duration>,
        ended: bool,
        no_preview: bool,
    }

    #[derive(Clone, Default)]
    struct FakeAudio(Arc<Mutex<FakeState>>);

    impl FakeAudio {
        fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
            self.0.lock().unwrap()
        }
    }

    impl AudioResource for FakeAudio {
        fn play(&mut self) -> Result<(), PlaybackError> {
            let mut state = self.state();
            if state.no_preview {
                return Err(PlaybackError::NoPreview);
            }
            state.playing = true;
            state.plays += 1;
            Ok(())
        }

        fn pause(&mut self) {
            let mut state = self.state();
            state.playing = false;
            state.pauses += 1;
        }

        fn current_time(&self) -> Option<Duration> {
            self.state().position
        }

        fn duration(&self) -> Option<Duration> {
            self.state().duration
        }

        fn has_ended(&self) -> bool {
            self.state().ended
        }
    }

    fn setup(count: u64) -> (PlaybackCoordinator, Vec<(WidgetId, FakeAudio)>) {
        let mut coordinator = PlaybackCoordinator::new();
        let widgets = (0..count)
            .map(|track| {
                let audio = FakeAudio::default();
                let id = coordinator.register(track, Box::new(audio.clone()));
                (id, audio)
            })
            .collect();
        (coordinator, widgets)
    }

    fn unpaused(coordinator: &PlaybackCoordinator) -> usize {
        coordinator.iter().filter(|(_, w)| !w.is_paused()).count()
    }

    #[test]
    fn new_widgets_start_paused() {
        let (coordinator, widgets) = setup(3);
        assert_eq!(coordinator.len(), 3);
        assert_eq!(unpaused(&coordinator), 0);
        assert_eq!(coordinator.get(widgets[1].0).unwrap().track_id(), 1);
        assert_eq!(coordinator.active(), None);
    }

    #[test]
    fn starting_b_pauses_a_only() {
        let (mut coordinator, widgets) = setup(3);
        let (a, audio_a) = &widgets[0];
        let (b, audio_b) = &widgets[1];
        let (c, audio_c) = &widgets[2];

        coordinator.play_started(*a).unwrap();
        coordinator.play_started(*b).unwrap();

        assert!(coordinator.get(*a).unwrap().is_paused());
        assert!(!coordinator.get(*b).unwrap().is_paused());
        assert!(coordinator.get(*c).unwrap().is_paused());
        assert!(!audio_a.state().playing);
        assert!(audio_b.state().playing);
        assert_eq!(audio_a.state().pauses, 1);
        assert_eq!(audio_c.state().pauses, 0);
        assert_eq!(coordinator.active(), Some(*b));
    }

    #[test]
    fn restarting_the_active_widget_is_idempotent() {
        let (mut coordinator, widgets) = setup(2);
        let (a, audio_a) = &widgets[0];

        coordinator.play_started(*a).unwrap();
        coordinator.play_started(*a).unwrap();

        assert_eq!(audio_a.state().plays, 1);
        assert_eq!(audio_a.state().pauses, 0);
        assert_eq!(coordinator.active(), Some(*a));
    }

    #[test]
    fn pausing_twice_is_idempotent() {
        let (mut coordinator, widgets) = setup(1);
        let (a, audio_a) = &widgets[0];

        coordinator.play_started(*a).unwrap();
        coordinator.paused(*a);
        coordinator.paused(*a);

        assert!(coordinator.get(*a).unwrap().is_paused());
        assert_eq!(audio_a.state().pauses, 1);
    }

    #[test]
    fn at_most_one_widget_plays_after_any_sequence() {
        let (mut coordinator, widgets) = setup(5);
        let ids: Vec<WidgetId> = widgets.iter().map(|(id, _)| *id).collect();
        let script = [0usize, 3, 3, 1, 4, 2, 0, 1, 4, 4, 3, 2];

        for (step, pick) in script.iter().enumerate() {
            let id = ids[*pick];
            match step % 3 {
                0 | 1 => coordinator.play_started(id).unwrap(),
                _ => coordinator.toggle(id).unwrap(),
            }
            assert!(unpaused(&coordinator) <= 1, "step {step}");

            let playing = widgets.iter().filter(|(_, a)| a.state().playing).count();
            assert!(playing <= 1, "step {step}");
        }
    }

    #[test]
    fn failed_start_keeps_widget_paused() {
        let (mut coordinator, widgets) = setup(2);
        let (a, _) = &widgets[0];
        let (b, audio_b) = &widgets[1];
        audio_b.state().no_preview = true;

        coordinator.play_started(*a).unwrap();
        assert_eq!(coordinator.play_started(*b), Err(PlaybackError::NoPreview));

        assert!(coordinator.get(*b).unwrap().is_paused());
        assert_eq!(unpaused(&coordinator), 0);
    }

    #[test]
    fn unknown_widget_is_reported() {
        let (mut coordinator, _) = setup(1);
        assert_eq!(
            coordinator.play_started(WidgetId(99)),
            Err(PlaybackError::UnknownWidget(WidgetId(99)))
        );
    }

    #[test]
    fn tick_computes_progress() {
        let (mut coordinator, widgets) = setup(1);
        let (a, audio) = &widgets[0];
        {
            let mut state = audio.state();
            state.position = Some(Duration::from_secs(50));
            state.duration = Some(Duration::from_secs(200));
        }

        assert_eq!(coordinator.tick(*a), Some(25.0));
        assert_eq!(coordinator.get(*a).unwrap().progress_percent(), 25.0);
    }

    #[test]
    fn tick_keeps_last_value_without_duration() {
        let (mut coordinator, widgets) = setup(1);
        let (a, audio) = &widgets[0];
        {
            let mut state = audio.state();
            state.position = Some(Duration::from_secs(50));
            state.duration = Some(Duration::from_secs(200));
        }
        coordinator.tick(*a);

        audio.state().duration = Some(Duration::ZERO);
        assert_eq!(coordinator.tick(*a), Some(25.0));

        audio.state().duration = None;
        assert_eq!(coordinator.tick(*a), Some(25.0));
    }

    #[test]
    fn tick_is_skipped_before_load() {
        let (mut coordinator, widgets) = setup(1);
        let (a, _) = &widgets[0];
        assert_eq!(coordinator.tick(*a), None);
        assert_eq!(coordinator.get(*a).unwrap().progress_percent(), 0.0);
    }

    #[test]
    fn tick_pauses_a_finished_clip() {
        let (mut coordinator, widgets) = setup(1);
        let (a, audio) = &widgets[0];
        coordinator.play_started(*a).unwrap();
        {
            let mut state = audio.state();
            state.position = Some(Duration::from_secs(29));
            state.duration = Some(Duration::from_secs(30));
            state.ended = true;
        }

        assert_eq!(coordinator.tick(*a), Some(100.0));
        assert!(coordinator.get(*a).unwrap().is_paused());
    }

    #[test]
    fn buffering_does_not_touch_pause_state() {
        let (mut coordinator, widgets) = setup(1);
        let (a, _) = &widgets[0];
        coordinator.play_started(*a).unwrap();

        coordinator.handle_event(*a, PlayerEvent::Waiting);
        let widget = coordinator.get(*a).unwrap();
        assert!(widget.is_buffering());
        assert!(!widget.is_paused());

        coordinator.handle_event(*a, PlayerEvent::CanPlay);
        assert!(!coordinator.get(*a).unwrap().is_buffering());
    }

    #[test]
    fn load_failure_pauses_the_widget() {
        let (mut coordinator, widgets) = setup(1);
        let (a, _) = &widgets[0];
        coordinator.play_started(*a).unwrap();
        coordinator.handle_event(*a, PlayerEvent::Waiting);

        coordinator.handle_event(*a, PlayerEvent::Failed("404".into()));

        let widget = coordinator.get(*a).unwrap();
        assert!(widget.is_paused());
        assert!(!widget.is_buffering());
    }

    #[test]
    fn pause_all_stops_the_active_widget() {
        let (mut coordinator, widgets) = setup(3);
        coordinator.play_started(widgets[2].0).unwrap();

        coordinator.pause_all();

        assert_eq!(unpaused(&coordinator), 0);
        assert!(!widgets[2].1.state().playing);
    }

    #[tokio::test]
    async fn disposing_aborts_the_ticker_and_ignores_late_ticks() {
        let (mut coordinator, widgets) = setup(2);
        let (a, _) = &widgets[0];
        let task = tokio::spawn(std::future::pending::<()>());
        let abort = task.abort_handle();
        coordinator.attach_ticker(*a, task);
        assert!(coordinator.has_ticker(*a));

        assert!(coordinator.dispose(*a));
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }

        assert!(abort.is_finished());
        assert!(!coordinator.has_ticker(*a));
        assert_eq!(coordinator.tick(*a), None);
        assert!(coordinator.get(*a).is_none());
        assert_eq!(coordinator.len(), 1);
    }

    #[tokio::test]
    async fn ticker_for_missing_widget_is_aborted() {
        let (mut coordinator, _) = setup(0);
        let task = tokio::spawn(std::future::pending::<()>());
        let abort = task.abort_handle();

        coordinator.attach_ticker(WidgetId(3), task);
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }

        assert!(abort.is_finished());
        assert!(!coordinator.has_ticker(WidgetId(3)));
    }

    #[tokio::test]
    async fn dispose_all_clears_every_ticker() {
        let (mut coordinator, widgets) = setup(3);
        let aborts: Vec<_> = widgets
            .iter()
            .map(|(id, _)| {
                let task = tokio::spawn(std::future::pending::<()>());
                let abort = task.abort_handle();
                coordinator.attach_ticker(*id, task);
                abort
            })
            .collect();

        coordinator.dispose_all();
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }

        assert!(coordinator.is_empty());
        assert!(aborts.iter().all(|a| a.is_finished()));
    }
}

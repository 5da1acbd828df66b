//! Application context object.
//!
//! `App` wires the session engine, distraction detector and store together
//! and is the single entry point hosts talk to. There are no ambient
//! singletons: the host constructs one `App`, injects its time source and
//! store, and owns the scheduling -- the core only expects `tick()` to be
//! called periodically and raw focus signals to be pushed into
//! `handle_focus_signal()`. Both are discrete atomic steps on one logical
//! thread; no mutation happens between them.
//!
//! Hosts observe the core through [`Observers`]: plain callbacks for timer
//! ticks, distraction state, threshold crossings and lifecycle changes.
//! Rendering, sound and system notifications all live behind those
//! callbacks, outside this crate.

use std::rc::Rc;

use crate::alerts::AlertGate;
use crate::clock::TimeSource;
use crate::detector::{DistractionDetector, DistractionEvent};
use crate::error::Result;
use crate::events::Event;
use crate::session::{HistoryRecord, SessionPhase, SessionState};
use crate::stats::FocusStats;
use crate::storage::{Config, Preferences, SessionRecord, SessionStore};

/// Host-registered observer callbacks.
#[derive(Default)]
pub struct Observers {
    /// Fires on every `tick()` with the current elapsed seconds.
    pub on_tick: Option<Box<dyn FnMut(u64)>>,
    /// Fires when the user becomes distracted (true) or refocuses (false).
    pub on_distraction_changed: Option<Box<dyn FnMut(bool)>>,
    /// Fires when the distraction count crosses the configured maximum,
    /// rate-limited by the alert gate.
    pub on_threshold_reached: Option<Box<dyn FnMut(u32)>>,
    /// Fires on every lifecycle transition with the new phase.
    pub on_state_changed: Option<Box<dyn FnMut(SessionPhase)>>,
}

/// Orchestrator owning the session engine, detector, preferences and store.
pub struct App<S: SessionStore> {
    session: SessionState,
    detector: DistractionDetector,
    alert_gate: AlertGate,
    prefs: Preferences,
    store: S,
    time: Rc<dyn TimeSource>,
    observers: Observers,
    distraction_cost_secs: u64,
}

impl<S: SessionStore> App<S> {
    /// Build the context from an injected store and time source.
    ///
    /// Preferences are loaded from the store (defaults if absent) and the
    /// component tunables come from `config`.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn new(store: S, time: Rc<dyn TimeSource>, config: &Config) -> Result<Self> {
        let prefs = store.load_preferences()?;
        let session = SessionState::new(prefs.max_distractions, config.stats.distraction_cost_secs);
        Ok(Self {
            session,
            detector: DistractionDetector::new(config.detector.cooldown_ms),
            alert_gate: AlertGate::new(config.alerts.cooldown_ms),
            prefs,
            store,
            time,
            observers: Observers::default(),
            distraction_cost_secs: config.stats.distraction_cost_secs,
        })
    }

    pub fn observers_mut(&mut self) -> &mut Observers {
        &mut self.observers
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> SessionPhase {
        self.session.phase()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.session.elapsed_secs(self.time.now_ms())
    }

    pub fn distraction_count(&self) -> u32 {
        self.session.distraction_count()
    }

    pub fn distraction_stamps(&self) -> &[crate::session::DistractionStamp] {
        self.session.distraction_stamps()
    }

    pub fn stats(&self) -> FocusStats {
        FocusStats::compute(
            self.elapsed_secs(),
            self.distraction_count(),
            self.distraction_cost_secs,
        )
    }

    pub fn snapshot(&self) -> Event {
        self.session.snapshot(self.time.now_ms())
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a fresh session. `currently_focused` seeds the detector with
    /// the host's real focus state. No-op unless Inactive.
    pub fn start(&mut self, currently_focused: bool) -> Result<Option<Event>> {
        let now = self.time.now_ms();
        let Some(event) = self.session.start(now) else {
            return Ok(None);
        };
        self.detector.start_tracking(currently_focused);
        self.persist_session()?;
        self.notify_state(SessionPhase::Active);
        Ok(Some(event))
    }

    /// Freeze the session. Distraction tracking stops with the clock.
    pub fn pause(&mut self) -> Result<Option<Event>> {
        let now = self.time.now_ms();
        let Some(event) = self.session.pause(now) else {
            return Ok(None);
        };
        self.detector.stop_tracking();
        self.persist_session()?;
        self.notify_state(SessionPhase::Paused);
        Ok(Some(event))
    }

    /// Resume from pause, restarting distraction tracking.
    pub fn resume(&mut self, currently_focused: bool) -> Result<Option<Event>> {
        let now = self.time.now_ms();
        let Some(event) = self.session.resume(now) else {
            return Ok(None);
        };
        self.detector.start_tracking(currently_focused);
        self.persist_session()?;
        self.notify_state(SessionPhase::Active);
        Ok(Some(event))
    }

    /// Discard the session without archiving.
    pub fn reset(&mut self) -> Result<Option<Event>> {
        let Some(event) = self.session.reset() else {
            return Ok(None);
        };
        self.detector.stop_tracking();
        self.store.clear_session()?;
        self.notify_state(SessionPhase::Inactive);
        Ok(Some(event))
    }

    /// Archive the session into history and return to Inactive.
    pub fn complete(&mut self) -> Result<Option<HistoryRecord>> {
        let now = self.time.now_ms();
        let Some(record) = self.session.complete(now) else {
            return Ok(None);
        };
        self.detector.stop_tracking();
        self.store.append_history(&record)?;
        self.store.clear_session()?;
        self.notify_state(SessionPhase::Inactive);
        Ok(Some(record))
    }

    /// Feed one raw focus signal from the host.
    ///
    /// Signals are ignored outside an Active session (the detector only
    /// tracks while the clock runs).
    pub fn handle_focus_signal(&mut self, is_focused: bool) -> Result<()> {
        let now = self.time.now_ms();
        match self.detector.on_focus_change(now, is_focused) {
            Some(DistractionEvent::Started) => {
                let Some(event) = self.session.record_distraction(now) else {
                    return Ok(());
                };
                self.persist_session()?;
                if let Some(cb) = self.observers.on_distraction_changed.as_mut() {
                    cb(true);
                }
                if let Event::DistractionRecorded {
                    count,
                    threshold_reached: true,
                    ..
                } = event
                {
                    if self.alert_gate.try_fire(now) {
                        if let Some(cb) = self.observers.on_threshold_reached.as_mut() {
                            cb(count);
                        }
                    }
                }
            }
            Some(DistractionEvent::Ended) => {
                if let Some(cb) = self.observers.on_distraction_changed.as_mut() {
                    cb(false);
                }
            }
            None => {}
        }
        Ok(())
    }

    /// One cooperative timer step: refresh elapsed time, notify the tick
    /// observer and checkpoint the session record. The host schedules this.
    pub fn tick(&mut self) -> Result<u64> {
        let elapsed = self.elapsed_secs();
        if let Some(cb) = self.observers.on_tick.as_mut() {
            cb(elapsed);
        }
        if self.session.phase() != SessionPhase::Inactive {
            self.persist_session()?;
        }
        Ok(elapsed)
    }

    /// Re-hydrate a persisted session at startup. Returns the phase the
    /// app landed in.
    pub fn restore(&mut self, currently_focused: bool) -> Result<SessionPhase> {
        let Some(record) = self.store.load_session()? else {
            return Ok(SessionPhase::Inactive);
        };
        if !record.is_active {
            return Ok(SessionPhase::Inactive);
        }
        let phase = if record.is_paused {
            SessionPhase::Paused
        } else {
            SessionPhase::Active
        };
        let now = self.time.now_ms();
        // An Active record carries its virtual start epoch; preferring it
        // over the checkpointed elapsed keeps the clock continuous across
        // process restarts.
        let elapsed_secs = match (phase, record.start_epoch_ms) {
            (SessionPhase::Active, Some(epoch)) => now.saturating_sub(epoch) / 1000,
            _ => record.elapsed_secs,
        };
        self.session
            .restore(now, phase, elapsed_secs, record.distraction_stamps);
        if phase == SessionPhase::Active {
            self.detector.start_tracking(currently_focused);
        }
        self.notify_state(phase);
        Ok(phase)
    }

    /// Update one preference, persisting the merged record. Changes to
    /// `max_distractions` apply to the running session immediately.
    pub fn set_preference(&mut self, key: &str, value: &str) -> Result<Preferences> {
        let prefs = self.store.save_preference(key, value)?;
        self.session.set_max_distractions(prefs.max_distractions);
        self.prefs = prefs.clone();
        Ok(prefs)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn persist_session(&mut self) -> Result<()> {
        let phase = self.session.phase();
        if phase == SessionPhase::Inactive {
            return Ok(());
        }
        let now = self.time.now_ms();
        let record = SessionRecord::in_progress(
            phase == SessionPhase::Paused,
            self.session.start_epoch_ms(),
            self.session.elapsed_secs(now),
            self.session.distraction_count(),
            self.session.distraction_stamps().to_vec(),
        );
        self.store.save_session(&record)?;
        Ok(())
    }

    fn notify_state(&mut self, phase: SessionPhase) {
        if let Some(cb) = self.observers.on_state_changed.as_mut() {
            cb(phase);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualTimeSource;
    use crate::storage::MemoryStore;
    use std::cell::RefCell;

    fn test_app(time: Rc<ManualTimeSource>) -> App<MemoryStore> {
        App::new(MemoryStore::new(), time, &Config::default()).unwrap()
    }

    #[test]
    fn full_session_flow() {
        let time = Rc::new(ManualTimeSource::new(0));
        let mut app = test_app(time.clone());

        assert!(app.start(true).unwrap().is_some());
        assert_eq!(app.phase(), SessionPhase::Active);

        time.advance(30_000);
        app.handle_focus_signal(false).unwrap();
        time.advance(5_000);
        app.handle_focus_signal(true).unwrap();
        assert_eq!(app.distraction_count(), 1);

        time.advance(65_000);
        assert_eq!(app.elapsed_secs(), 100);

        let record = app.complete().unwrap().unwrap();
        assert_eq!(record.duration_secs, 100);
        assert_eq!(record.distraction_count, 1);
        assert_eq!(record.estimated_focus_secs, 85);

        assert_eq!(app.phase(), SessionPhase::Inactive);
        assert_eq!(app.elapsed_secs(), 0);

        let history = app.store().load_history().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].estimated_focus_secs, 85);
    }

    #[test]
    fn signals_while_paused_do_not_count() {
        let time = Rc::new(ManualTimeSource::new(0));
        let mut app = test_app(time.clone());

        app.start(true).unwrap();
        time.advance(10_000);
        app.pause().unwrap();

        time.advance(5_000);
        app.handle_focus_signal(false).unwrap();
        app.handle_focus_signal(true).unwrap();
        assert_eq!(app.distraction_count(), 0);

        // Paused time never accrues.
        time.advance(60_000);
        assert_eq!(app.elapsed_secs(), 10);

        app.resume(true).unwrap();
        time.advance(2_000);
        app.handle_focus_signal(false).unwrap();
        assert_eq!(app.distraction_count(), 1);
    }

    #[test]
    fn threshold_observer_fires_once() {
        let time = Rc::new(ManualTimeSource::new(0));
        let mut app = test_app(time.clone());
        let fired: Rc<RefCell<Vec<u32>>> = Rc::default();

        let sink = fired.clone();
        app.observers_mut().on_threshold_reached = Some(Box::new(move |count| {
            sink.borrow_mut().push(count);
        }));

        app.start(true).unwrap();
        for _ in 0..5 {
            app.handle_focus_signal(false).unwrap();
            time.advance(2_000);
            app.handle_focus_signal(true).unwrap();
            time.advance(2_000);
        }

        assert_eq!(app.distraction_count(), 5);
        // Default max_distractions is 3; only the crossing fires.
        assert_eq!(fired.borrow().as_slice(), &[3]);
    }

    #[test]
    fn distraction_observer_sees_both_edges() {
        let time = Rc::new(ManualTimeSource::new(0));
        let mut app = test_app(time.clone());
        let seen: Rc<RefCell<Vec<bool>>> = Rc::default();

        let sink = seen.clone();
        app.observers_mut().on_distraction_changed = Some(Box::new(move |distracted| {
            sink.borrow_mut().push(distracted);
        }));

        app.start(true).unwrap();
        app.handle_focus_signal(false).unwrap();
        time.advance(2_000);
        app.handle_focus_signal(true).unwrap();

        assert_eq!(seen.borrow().as_slice(), &[true, false]);
    }

    #[test]
    fn tick_checkpoints_the_session() {
        let time = Rc::new(ManualTimeSource::new(0));
        let mut app = test_app(time.clone());

        app.start(true).unwrap();
        time.advance(42_000);
        assert_eq!(app.tick().unwrap(), 42);

        let saved = app.store().load_session().unwrap().unwrap();
        assert!(saved.is_active);
        assert!(!saved.is_paused);
        assert_eq!(saved.elapsed_secs, 42);
    }

    #[test]
    fn restore_resumes_active_session() {
        let time = Rc::new(ManualTimeSource::new(100_000));
        let mut store = MemoryStore::new();
        store
            .save_session(&SessionRecord::in_progress(false, Some(40_000), 60, 0, Vec::new()))
            .unwrap();

        let mut app = App::new(store, time.clone(), &Config::default()).unwrap();
        assert_eq!(app.restore(true).unwrap(), SessionPhase::Active);
        assert_eq!(app.elapsed_secs(), 60);

        time.advance(5_000);
        assert_eq!(app.elapsed_secs(), 65);
    }

    #[test]
    fn restore_keeps_paused_session_frozen() {
        let time = Rc::new(ManualTimeSource::new(100_000));
        let mut store = MemoryStore::new();
        store
            .save_session(&SessionRecord::in_progress(true, None, 30, 2, Vec::new()))
            .unwrap();

        let mut app = App::new(store, time.clone(), &Config::default()).unwrap();
        assert_eq!(app.restore(true).unwrap(), SessionPhase::Paused);

        time.advance(600_000);
        assert_eq!(app.elapsed_secs(), 30);
    }

    #[test]
    fn restore_without_session_stays_inactive() {
        let time = Rc::new(ManualTimeSource::new(0));
        let mut app = test_app(time);
        assert_eq!(app.restore(true).unwrap(), SessionPhase::Inactive);
    }

    #[test]
    fn invalid_commands_do_not_write() {
        let time = Rc::new(ManualTimeSource::new(0));
        let mut app = test_app(time);

        assert!(app.pause().unwrap().is_none());
        assert!(app.resume(true).unwrap().is_none());
        assert!(app.complete().unwrap().is_none());
        assert!(app.store().load_session().unwrap().is_none());
        assert!(app.store().load_history().unwrap().is_empty());
    }

    #[test]
    fn preference_change_applies_mid_session() {
        let time = Rc::new(ManualTimeSource::new(0));
        let mut app = test_app(time.clone());
        let fired: Rc<RefCell<Vec<u32>>> = Rc::default();

        let sink = fired.clone();
        app.observers_mut().on_threshold_reached = Some(Box::new(move |count| {
            sink.borrow_mut().push(count);
        }));

        app.start(true).unwrap();
        app.set_preference("max_distractions", "2").unwrap();

        app.handle_focus_signal(false).unwrap();
        time.advance(2_000);
        app.handle_focus_signal(true).unwrap();
        time.advance(2_000);
        app.handle_focus_signal(false).unwrap();

        assert_eq!(fired.borrow().as_slice(), &[2]);
        assert_eq!(app.store().load_preferences().unwrap().max_distractions, 2);
    }
}

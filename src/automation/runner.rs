//! Outer reforge loop
//!
//! One attempt clicks the item, captures the modifier region with Alt held
//! and runs the matching pipeline. Stop commands are only honoured between
//! attempts.

use super::cache::ResultCache;
use super::report::AttemptReport;
use super::types::{AutomationCommand, AutomationEvent, RunOutcome, RunState, RunSummary};
use crate::config::{ReforgeConfig, RunTimings};
use crate::desktop::{InputInjector, InputKey, ScreenCapture, ScreenPoint, ScreenRect, ensure_capture_size};
use crate::error::{ReforgeError, ReforgeResult};
use crate::template_matching::{TemplateMatcher, Verdict};
use image::RgbImage;
use rand::Rng;
use std::time::Duration;
use tokio::sync::mpsc;

pub struct ReforgeRunner<C: ScreenCapture, I: InputInjector> {
    matcher: TemplateMatcher,
    capture: C,
    input: I,
    commands: mpsc::Receiver<AutomationCommand>,
    events: Option<mpsc::UnboundedSender<AutomationEvent>>,
    cache: Option<ResultCache>,
    orb_pos: ScreenPoint,
    equip_pos: ScreenPoint,
    region: ScreenRect,
    max_attempts: u32,
    timings: RunTimings,
}

impl<C: ScreenCapture, I: InputInjector> ReforgeRunner<C, I> {
    /// Validate the configuration and load every template
    pub fn new(
        config: &ReforgeConfig,
        capture: C,
        input: I,
        commands: mpsc::Receiver<AutomationCommand>,
    ) -> ReforgeResult<Self> {
        config.validate()?;
        let tier_path = config
            .tier_template_path
            .as_ref()
            .ok_or_else(|| ReforgeError::invalid_config("tier template has not been selected"))?;
        let matcher =
            TemplateMatcher::from_paths(&config.main_template_paths, tier_path, config.thresholds())?;
        Self::with_matcher(config, matcher, capture, input, commands)
    }

    /// Use an already built matcher
    pub fn with_matcher(
        config: &ReforgeConfig,
        matcher: TemplateMatcher,
        capture: C,
        input: I,
        commands: mpsc::Receiver<AutomationCommand>,
    ) -> ReforgeResult<Self> {
        config.validate_run_settings()?;
        let missing = |name: &str| ReforgeError::invalid_config(format!("{name} has not been selected"));
        let region = config.mod_region.ok_or_else(|| missing("mod_region"))?;
        let orb_pos = config.orb_pos.ok_or_else(|| missing("orb_pos"))?;
        let equip_pos = config.equip_pos.ok_or_else(|| missing("equip_pos"))?;
        matcher.validate_for_capture(region.width, region.height)?;

        let cache = config
            .cache_results
            .then(|| ResultCache::new(config.cache_dir.clone(), config.cache_size));

        Ok(Self {
            matcher,
            capture,
            input,
            commands,
            events: None,
            cache,
            orb_pos,
            equip_pos,
            region,
            max_attempts: config.max_attempts,
            timings: config.timings(),
        })
    }

    /// Publish progress on `events`
    pub fn with_events(mut self, events: mpsc::UnboundedSender<AutomationEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn capture(&self) -> &C {
        &self.capture
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    fn emit(&self, event: AutomationEvent) {
        if let Some(tx) = &self.events {
            // The UI may already be gone; the run continues regardless
            let _ = tx.send(event);
        }
    }

    fn set_state(&self, state: RunState) {
        log::debug!("Run state: {:?}", state);
        self.emit(AutomationEvent::StateChanged(state));
    }

    fn stop_requested(&mut self) -> bool {
        let mut stop = false;
        while let Ok(command) = self.commands.try_recv() {
            match command {
                AutomationCommand::Stop => stop = true,
            }
        }
        stop
    }

    fn pause(duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }

    fn jitter(&self) {
        let max = self.timings.jitter_max.as_secs_f64();
        if max <= 0.0 {
            return;
        }
        let secs = rand::thread_rng().gen_range(0.0..=max);
        Self::pause(Duration::from_secs_f64(secs));
    }

    /// Run until success, the attempt cap or a stop command
    ///
    /// Errors are only returned when the orb could not be applied before the
    /// first attempt. Shift is released on every path.
    pub fn run(&mut self) -> ReforgeResult<RunSummary> {
        self.set_state(RunState::Preparing);
        log::info!(
            "Starting reforge: up to {} attempt(s) on region {}",
            self.max_attempts,
            self.region
        );

        let prepared = self.prepare();
        let result = match prepared {
            Ok(()) => Ok(self.attempt_loop()),
            Err(e) => Err(e),
        };

        if let Err(e) = self.input.key_up(InputKey::Shift) {
            log::warn!("Failed to release shift: {}", e);
        }
        self.set_state(RunState::Finished);

        match &result {
            Ok(summary) => {
                log::info!("{}", summary);
                self.emit(AutomationEvent::Finished(summary.clone()));
            }
            Err(e) => {
                log::error!("Reforge could not start: {}", e);
                self.emit(AutomationEvent::Error(e.to_string()));
            }
        }
        result
    }

    fn prepare(&mut self) -> ReforgeResult<()> {
        self.input.move_to(self.orb_pos)?;
        self.input.right_click()?;
        Self::pause(self.timings.orb_delay);
        self.input.key_down(InputKey::Shift)
    }

    fn attempt_loop(&mut self) -> RunSummary {
        let mut attempts = 0;
        let mut last_verdict: Option<Verdict> = None;

        let outcome = loop {
            if attempts >= self.max_attempts {
                break RunOutcome::AttemptCapReached;
            }
            if self.stop_requested() {
                log::info!("Stop requested after {} attempt(s)", attempts);
                break RunOutcome::Cancelled;
            }

            attempts += 1;
            self.set_state(RunState::Attempting(attempts));

            match self.attempt() {
                Ok((verdict, capture)) => {
                    let report = AttemptReport::new(attempts, verdict.clone());
                    log::info!("{}", report);
                    self.emit(AutomationEvent::Attempt(report));
                    self.cache_attempt(&capture, &verdict);

                    let success = verdict.success;
                    last_verdict = Some(verdict);
                    if success {
                        break RunOutcome::Success;
                    }
                }
                Err(e) => {
                    log::warn!("Attempt {} failed: {}", attempts, e);
                    self.emit(AutomationEvent::Error(format!("attempt {attempts}: {e}")));
                    last_verdict = None;
                }
            }

            if attempts < self.max_attempts {
                self.jitter();
            }
        };

        RunSummary {
            outcome,
            attempts,
            last_verdict,
        }
    }

    fn attempt(&mut self) -> ReforgeResult<(Verdict, RgbImage)> {
        self.input.move_to(self.equip_pos)?;
        self.input.left_click()?;
        Self::pause(self.timings.equip_click_delay);

        self.input.key_down(InputKey::Alt)?;
        Self::pause(self.timings.alt_screenshot_delay);
        let captured = self.capture.capture(&self.region);
        let released = self.input.key_up(InputKey::Alt);
        let capture = captured?;
        released?;

        ensure_capture_size(&self.region, &capture)?;
        let verdict = self.matcher.evaluate_capture(&capture)?;
        Ok((verdict, capture))
    }

    fn cache_attempt(&self, capture: &RgbImage, verdict: &Verdict) {
        let Some(cache) = &self.cache else {
            return;
        };
        match cache.store(capture, verdict) {
            Ok(path) => self.emit(AutomationEvent::CacheSaved(path)),
            Err(e) => log::warn!("Could not cache attempt image: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::create_automation_channels;
    use crate::template_matching::fixtures::{color_template, scene, DARK};
    use crate::template_matching::MatchThresholds;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    #[derive(Debug, Clone, PartialEq)]
    enum Action {
        Move(ScreenPoint),
        Left,
        Right,
        Down(InputKey),
        Up(InputKey),
    }

    #[derive(Default)]
    struct RecordingInput {
        actions: Vec<Action>,
        fail_clicks: bool,
    }

    impl InputInjector for RecordingInput {
        fn move_to(&mut self, point: ScreenPoint) -> ReforgeResult<()> {
            self.actions.push(Action::Move(point));
            Ok(())
        }
        fn left_click(&mut self) -> ReforgeResult<()> {
            if self.fail_clicks {
                return Err(ReforgeError::input("click rejected"));
            }
            self.actions.push(Action::Left);
            Ok(())
        }
        fn right_click(&mut self) -> ReforgeResult<()> {
            self.actions.push(Action::Right);
            Ok(())
        }
        fn key_down(&mut self, key: InputKey) -> ReforgeResult<()> {
            self.actions.push(Action::Down(key));
            Ok(())
        }
        fn key_up(&mut self, key: InputKey) -> ReforgeResult<()> {
            self.actions.push(Action::Up(key));
            Ok(())
        }
    }

    /// Serves queued frames, repeating the last one
    struct FrameQueue {
        frames: RefCell<VecDeque<ReforgeResult<RgbImage>>>,
        last: RgbImage,
    }

    impl FrameQueue {
        fn new(frames: Vec<ReforgeResult<RgbImage>>, last: RgbImage) -> Self {
            Self {
                frames: RefCell::new(frames.into()),
                last,
            }
        }
    }

    impl ScreenCapture for FrameQueue {
        fn capture(&self, _rect: &ScreenRect) -> ReforgeResult<RgbImage> {
            match self.frames.borrow_mut().pop_front() {
                Some(frame) => frame,
                None => Ok(self.last.clone()),
            }
        }
    }

    fn config(max_attempts: u32) -> ReforgeConfig {
        ReforgeConfig {
            orb_pos: Some(ScreenPoint::new(50, 60)),
            equip_pos: Some(ScreenPoint::new(500, 600)),
            mod_region: Some(ScreenRect::new(1000, 200, 300, 80)),
            max_attempts,
            orb_delay: 0.0,
            equip_click_delay: 0.0,
            alt_screenshot_delay: 0.0,
            loop_random_max: 0.0,
            cache_results: false,
            ..ReforgeConfig::default()
        }
    }

    fn matcher() -> TemplateMatcher {
        let scene = scene();
        TemplateMatcher::new(
            vec![color_template("modifier_a", &scene.modifier_a)],
            color_template("tier", &scene.tier_icon),
            MatchThresholds::default(),
        )
        .unwrap()
    }

    fn blank() -> RgbImage {
        RgbImage::from_pixel(300, 80, DARK)
    }

    #[test]
    fn test_success_on_third_attempt() {
        let (_tx, rx, event_tx, mut event_rx) = create_automation_channels();
        let capture = FrameQueue::new(vec![Ok(blank()), Ok(blank())], scene().capture);
        let mut runner = ReforgeRunner::with_matcher(
            &config(10),
            matcher(),
            capture,
            RecordingInput::default(),
            rx,
        )
        .unwrap()
        .with_events(event_tx);

        let summary = runner.run().unwrap();
        assert_eq!(summary.outcome, RunOutcome::Success);
        assert_eq!(summary.attempts, 3);
        assert!(summary.last_verdict.unwrap().success);

        let mut reports = 0;
        let mut finished = false;
        while let Ok(event) = event_rx.try_recv() {
            match event {
                AutomationEvent::Attempt(_) => reports += 1,
                AutomationEvent::Finished(s) => finished = s.outcome == RunOutcome::Success,
                _ => {}
            }
        }
        assert_eq!(reports, 3);
        assert!(finished);
    }

    #[test]
    fn test_input_sequence() {
        let (_tx, rx, _, _) = create_automation_channels();
        let capture = FrameQueue::new(vec![], scene().capture);
        let mut runner =
            ReforgeRunner::with_matcher(&config(5), matcher(), capture, RecordingInput::default(), rx)
                .unwrap();
        runner.run().unwrap();

        let expected = vec![
            Action::Move(ScreenPoint::new(50, 60)),
            Action::Right,
            Action::Down(InputKey::Shift),
            Action::Move(ScreenPoint::new(500, 600)),
            Action::Left,
            Action::Down(InputKey::Alt),
            Action::Up(InputKey::Alt),
            Action::Up(InputKey::Shift),
        ];
        assert_eq!(runner.input().actions, expected);
    }

    #[test]
    fn test_attempt_cap() {
        let (_tx, rx, _, _) = create_automation_channels();
        let capture = FrameQueue::new(vec![], blank());
        let mut runner =
            ReforgeRunner::with_matcher(&config(4), matcher(), capture, RecordingInput::default(), rx)
                .unwrap();
        let summary = runner.run().unwrap();
        assert_eq!(summary.outcome, RunOutcome::AttemptCapReached);
        assert_eq!(summary.attempts, 4);
        assert!(!summary.last_verdict.unwrap().success);
        assert_eq!(runner.input().actions.last(), Some(&Action::Up(InputKey::Shift)));
    }

    #[test]
    fn test_stop_before_first_attempt() {
        let (tx, rx, _, _) = create_automation_channels();
        tx.try_send(AutomationCommand::Stop).unwrap();
        let capture = FrameQueue::new(vec![], blank());
        let mut runner =
            ReforgeRunner::with_matcher(&config(50), matcher(), capture, RecordingInput::default(), rx)
                .unwrap();
        let summary = runner.run().unwrap();
        assert_eq!(summary.outcome, RunOutcome::Cancelled);
        assert_eq!(summary.attempts, 0);
        assert!(summary.last_verdict.is_none());
        assert_eq!(runner.input().actions.last(), Some(&Action::Up(InputKey::Shift)));
    }

    /// Blank frames; sends a stop command while serving capture `stop_at`
    struct StopDuringCapture {
        commands: mpsc::Sender<AutomationCommand>,
        stop_at: u32,
        served: Cell<u32>,
    }

    impl ScreenCapture for StopDuringCapture {
        fn capture(&self, _rect: &ScreenRect) -> ReforgeResult<RgbImage> {
            let served = self.served.get() + 1;
            self.served.set(served);
            if served == self.stop_at {
                self.commands
                    .try_send(AutomationCommand::Stop)
                    .map_err(|_| ReforgeError::ChannelClosed)?;
            }
            Ok(blank())
        }
    }

    #[test]
    fn test_stop_during_attempt_finishes_that_attempt() {
        let (tx, rx, _, _) = create_automation_channels();
        let capture = StopDuringCapture {
            commands: tx,
            stop_at: 3,
            served: Cell::new(0),
        };
        let mut runner =
            ReforgeRunner::with_matcher(&config(50), matcher(), capture, RecordingInput::default(), rx)
                .unwrap();
        let summary = runner.run().unwrap();
        assert_eq!(summary.outcome, RunOutcome::Cancelled);
        assert_eq!(summary.attempts, 3);
        assert!(!summary.last_verdict.unwrap().success);
        assert_eq!(runner.capture().served.get(), 3);
        assert_eq!(runner.input().actions.last(), Some(&Action::Up(InputKey::Shift)));
    }

    #[test]
    fn test_transient_failures_count_as_attempts() {
        let (_tx, rx, _, _) = create_automation_channels();
        let outside = ReforgeError::Capture {
            region: "(1000, 200, 300, 80)".to_string(),
            reason: "outside display".to_string(),
        };
        let capture = FrameQueue::new(
            vec![Err(outside), Ok(RgbImage::new(299, 80))],
            scene().capture,
        );
        let mut runner =
            ReforgeRunner::with_matcher(&config(10), matcher(), capture, RecordingInput::default(), rx)
                .unwrap();
        let summary = runner.run().unwrap();
        assert_eq!(summary.outcome, RunOutcome::Success);
        assert_eq!(summary.attempts, 3);

        // Alt is released even when the capture fails
        let alt_downs = runner
            .input()
            .actions
            .iter()
            .filter(|a| **a == Action::Down(InputKey::Alt))
            .count();
        let alt_ups = runner
            .input()
            .actions
            .iter()
            .filter(|a| **a == Action::Up(InputKey::Alt))
            .count();
        assert_eq!(alt_downs, 3);
        assert_eq!(alt_ups, 3);
    }

    #[test]
    fn test_input_failures_exhaust_cap() {
        let (_tx, rx, _, _) = create_automation_channels();
        let input = RecordingInput {
            fail_clicks: true,
            ..RecordingInput::default()
        };
        let capture = FrameQueue::new(vec![], scene().capture);
        let mut runner = ReforgeRunner::with_matcher(&config(3), matcher(), capture, input, rx).unwrap();
        let summary = runner.run().unwrap();
        assert_eq!(summary.outcome, RunOutcome::AttemptCapReached);
        assert_eq!(summary.attempts, 3);
        assert!(summary.last_verdict.is_none());
    }

    #[test]
    fn test_setup_errors_are_fatal() {
        let (_tx, rx, _, _) = create_automation_channels();
        let mut bad = config(3);
        bad.mod_region = Some(ScreenRect::new(0, 0, 40, 10));
        let err = ReforgeRunner::with_matcher(
            &bad,
            matcher(),
            FrameQueue::new(vec![], blank()),
            RecordingInput::default(),
            rx,
        )
        .err()
        .unwrap();
        assert!(matches!(err, ReforgeError::NoUsableTemplates { .. }));

        let (_tx, rx, _, _) = create_automation_channels();
        let mut bad = config(3);
        bad.main_template_paths = vec!["missing/primary.png".into()];
        bad.tier_template_path = Some("missing/tier.png".into());
        let err = ReforgeRunner::new(&bad, FrameQueue::new(vec![], blank()), RecordingInput::default(), rx)
            .err()
            .unwrap();
        assert!(matches!(err, ReforgeError::TemplateNotFound { .. }));
    }

    #[test]
    fn test_results_are_cached() {
        let dir = tempfile::tempdir().unwrap();
        let (_tx, rx, _, _) = create_automation_channels();
        let mut cfg = config(2);
        cfg.cache_results = true;
        cfg.cache_dir = dir.path().to_path_buf();
        cfg.cache_size = 10;
        let capture = FrameQueue::new(vec![Ok(blank())], scene().capture);
        let mut runner =
            ReforgeRunner::with_matcher(&cfg, matcher(), capture, RecordingInput::default(), rx).unwrap();
        runner.run().unwrap();
        let cache = ResultCache::new(dir.path(), 10);
        assert_eq!(cache.entries().unwrap().len(), 2);
    }
}

//! Property-based tests for the turntable widget
//!
//! Uses proptest to drive the widget with random operation sequences and
//! check invariants that must hold after every step.

#![cfg(not(target_arch = "wasm32"))]

mod common;

use common::*;
use proptest::prelude::*;
use std::collections::HashSet;
use turntable_core::{
    ErrorKind, LoadEpoch, PointerInput, RateLimiter, Rect, TransportEvent,
};

// ===== Helpers =====

#[derive(Debug, Clone)]
enum Op {
    Toggle,
    Next,
    Prev,
    Load(isize),
    AddLocal,
    Ready,
    StaleReady,
    MediaError(u16),
    Ended,
    Waiting,
    Click(f64),
    Scrub(f64, f64),
    Tick(f64),
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Toggle),
        Just(Op::Next),
        Just(Op::Prev),
        (-5isize..10).prop_map(Op::Load),
        Just(Op::AddLocal),
        Just(Op::Ready),
        Just(Op::StaleReady),
        (1u16..6).prop_map(Op::MediaError),
        Just(Op::Ended),
        Just(Op::Waiting),
        (-50.0f64..450.0).prop_map(Op::Click),
        ((-50.0f64..450.0), (-50.0f64..450.0)).prop_map(|(a, b)| Op::Scrub(a, b)),
        (0.0f64..200.0).prop_map(Op::Tick),
    ]
}

fn apply(tt: &mut TestTurntable, op: &Op, clock: &mut f64) {
    let bar = Rect::new(0.0, 0.0, 400.0, 10.0);
    match op {
        Op::Toggle => tt.toggle_play_pause(),
        Op::Next => tt.play_next(),
        Op::Prev => tt.play_prev(),
        Op::Load(index) => tt.load_track(*index, false),
        Op::AddLocal => {
            let _ = tt.add_local_track(local_file("random.mp3"));
        }
        Op::Ready => {
            let epoch = tt.current_epoch();
            tt.handle_transport_event(TransportEvent::Ready(epoch));
        }
        Op::StaleReady => {
            let stale = LoadEpoch::new(tt.current_epoch().value().saturating_sub(1));
            tt.handle_transport_event(TransportEvent::Ready(stale));
        }
        Op::MediaError(code) => {
            let epoch = tt.current_epoch();
            tt.handle_transport_event(TransportEvent::Error {
                epoch,
                kind: ErrorKind::from_media_error_code(*code),
            });
        }
        Op::Ended => tt.handle_transport_event(TransportEvent::Ended),
        Op::Waiting => tt.handle_transport_event(TransportEvent::Waiting),
        Op::Click(x) => {
            tt.progress_click(&PointerInput::mouse(*x, 5.0), bar);
        }
        Op::Scrub(from, to) => {
            tt.progress_pointer_down(&PointerInput::mouse(*from, 5.0), bar, *clock);
            *clock += 5.0;
            tt.pointer_move(&PointerInput::mouse(*to, 5.0), *clock);
            *clock += 5.0;
            tt.pointer_up(&PointerInput::mouse(*to, 5.0), *clock);
        }
        Op::Tick(delta) => {
            *clock += delta;
            tt.tick(*clock);
        }
    }
    pump(tt);
}

// ===== Property Tests =====

proptest! {
    /// Property: Status flags never contradict each other
    #[test]
    fn status_flags_stay_consistent(
        tracks in 0usize..4,
        ops in prop::collection::vec(arbitrary_op(), 1..60)
    ) {
        let mut tt = turntable(tracks);
        let mut clock = 0.0;

        for op in &ops {
            apply(&mut tt, op, &mut clock);
            let state = tt.state();

            prop_assert!(!(state.has_error() && state.is_loading()), "error and loading after {:?}", op);
            prop_assert!(!(state.is_empty() && state.is_playing()), "empty and playing after {:?}", op);
            prop_assert_eq!(state.is_empty(), tt.playlist().is_empty());
            prop_assert!(!state.is_dragging(), "gesture left active after {:?}", op);
            if !tt.playlist().is_empty() {
                prop_assert!(state.current_track_index < tt.playlist().len());
            }

            let controls = tt.controls();
            prop_assert_eq!(controls.tonearm, state.is_action_allowed());
            prop_assert_eq!(controls.progress, state.is_action_allowed());
            if state.is_loading() {
                prop_assert!(!controls.play_pause);
            }
            if state.is_loading() || state.is_empty() {
                prop_assert!(!controls.next && !controls.prev);
            }

            let view = tt.view();
            prop_assert_eq!(view.status, state.snapshot());
            prop_assert!((0.0..=100.0).contains(&view.progress.percent));
            prop_assert_eq!(view.message.is_some(), state.has_error() || state.is_empty());
        }
    }

    /// Property: Every acquired handle is released exactly once by teardown
    #[test]
    fn handles_released_exactly_once(
        adds in 1usize..8,
        loads in prop::collection::vec(-3isize..12, 0..10)
    ) {
        let mut tt = ready_turntable(1);

        for i in 0..adds {
            tt.add_local_track(local_file(&format!("track{i}.mp3"))).unwrap();
        }
        let reloads = loads.len();
        for index in loads {
            tt.load_track(index, false);
        }
        tt.cleanup_resources();

        let provider = tt.provider();
        let acquired: HashSet<_> = provider.acquired.iter().collect();
        let released: HashSet<_> = provider.released.iter().collect();

        prop_assert!(provider.acquired.len() >= adds);
        if reloads == 0 {
            prop_assert_eq!(provider.released.len(), adds);
        }
        prop_assert_eq!(provider.released.len(), released.len(), "handle released twice");
        prop_assert_eq!(acquired, released);
        prop_assert_eq!(tt.live_handle_count(), 0);
    }

    /// Property: At most one handle is live once the loaded slot changes
    #[test]
    fn only_loaded_local_track_holds_a_handle(
        adds in 1usize..6,
        loads in prop::collection::vec(0isize..8, 1..10)
    ) {
        let mut tt = ready_turntable(1);
        for i in 0..adds {
            tt.add_local_track(local_file(&format!("track{i}.mp3"))).unwrap();
        }
        for index in loads {
            tt.load_track(index, false);
            prop_assert!(tt.live_handle_count() <= 1);
            prop_assert_eq!(tt.provider().live(), tt.live_handle_count());
        }
    }

    /// Property: A stale ready never ends the current load
    #[test]
    fn stale_ready_never_clears_loading(switches in 1usize..6) {
        let mut tt = turntable(4);
        let mut epochs = vec![tt.current_epoch()];
        for i in 0..switches {
            tt.load_track(i as isize + 1, false);
            epochs.push(tt.current_epoch());
        }

        for epoch in &epochs[..epochs.len() - 1] {
            tt.handle_transport_event(TransportEvent::Ready(*epoch));
            prop_assert!(tt.state().is_loading());
        }
    }

    /// Property: Rate limiter applies at most one value per window
    #[test]
    fn rate_limiter_respects_interval(
        gaps in prop::collection::vec(0.0f64..40.0, 1..100)
    ) {
        let mut limiter = RateLimiter::new(30.0);
        let mut now = 0.0;
        let mut applied: Vec<f64> = Vec::new();

        for (i, gap) in gaps.iter().enumerate() {
            now += gap;
            if limiter.offer(now, i).is_some() {
                applied.push(now);
            }
            if limiter.take_due(now).is_some() {
                applied.push(now);
            }
        }

        for pair in applied.windows(2) {
            prop_assert!(pair[1] - pair[0] >= 30.0);
        }
    }

    /// Property: The latest offered value is never lost
    #[test]
    fn rate_limiter_keeps_latest(values in prop::collection::vec(any::<u32>(), 1..20)) {
        let mut limiter = RateLimiter::new(1000.0);
        let mut last_applied = None;

        for value in &values {
            if let Some(v) = limiter.offer(0.0, *value) {
                last_applied = Some(v);
            }
        }

        let last = limiter.flush().or(last_applied);
        prop_assert_eq!(last, values.last().copied());
    }
}

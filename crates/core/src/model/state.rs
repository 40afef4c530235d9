use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::flow::{FlowPhase, Mode, Outcome, Question};
use crate::model::intent::{Effect, FlowEvent, Intent};
use crate::model::progress::Progress;
use crate::settings::TickSettings;

//
// ─── STATE BUNDLE ──────────────────────────────────────────────────────────────
//

/// All transient state of one viewing session.
///
/// Only [`FlowState::apply`] produces new values, so every reachable bundle is one of
/// the composite phases described by [`FlowPhase`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlowState {
    mode: Mode,
    question: Option<Question>,
    progress: Progress,
    outcome: Option<Outcome>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

/// Result of applying one event: the next state and at most one side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: FlowState,
    pub effect: Option<Effect>,
}

impl Transition {
    fn unchanged(state: &FlowState) -> Self {
        Self {
            state: state.clone(),
            effect: None,
        }
    }

    /// True when the event moved the session to a different state.
    #[must_use]
    pub fn changed_from(&self, previous: &FlowState) -> bool {
        self.state != *previous
    }
}

impl FlowState {
    /// Neutral state at session start and after every restart.
    #[must_use]
    pub fn initial() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn question(&self) -> Option<Question> {
        self.question
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        self.progress
    }

    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn phase(&self) -> FlowPhase {
        FlowPhase::of(self.mode, self.question, self.outcome)
    }

    /// Pure transition function.
    ///
    /// Total over every state and event: an event with no meaning in the current
    /// phase returns the state unchanged with no effect. `now` stamps the session
    /// start and completion times.
    #[must_use]
    pub fn apply(&self, event: FlowEvent, settings: &TickSettings, now: DateTime<Utc>) -> Transition {
        let phase = self.phase();
        match (phase, event) {
            (_, FlowEvent::Intent(Intent::Restart)) => Transition {
                state: Self::initial(),
                effect: Some(Effect::StopTicker),
            },

            (FlowPhase::Select, FlowEvent::Intent(Intent::SelectTraditional)) => Transition {
                state: Self {
                    mode: Mode::Traditional,
                    progress: Progress::ZERO,
                    started_at: Some(now),
                    ..Self::initial()
                },
                effect: Some(Effect::StartTicker),
            },

            (FlowPhase::Select, FlowEvent::Intent(Intent::SelectAdaptive)) => Transition {
                state: Self {
                    mode: Mode::Adaptive,
                    question: Some(Question::PreTest),
                    started_at: Some(now),
                    ..Self::initial()
                },
                effect: None,
            },

            (FlowPhase::TraditionalLoading, FlowEvent::Tick) => {
                let progress = self.progress.advance(settings.step_percent());
                if progress.is_complete() {
                    Transition {
                        state: Self {
                            progress,
                            question: Some(Question::TraditionalCheck),
                            ..self.clone()
                        },
                        effect: Some(Effect::TickerFinished),
                    }
                } else {
                    Transition {
                        state: Self {
                            progress,
                            ..self.clone()
                        },
                        effect: None,
                    }
                }
            }

            (FlowPhase::TraditionalCheck, FlowEvent::Intent(Intent::Answer { correct })) => {
                let outcome = if correct { Outcome::Pass } else { Outcome::Fail };
                Transition {
                    state: self.finish(outcome, now),
                    effect: None,
                }
            }

            (FlowPhase::AdaptivePreTest, FlowEvent::Intent(Intent::Answer { correct: true })) => {
                Transition {
                    state: self.finish(Outcome::Pass, now),
                    effect: None,
                }
            }

            // A missed pre-test routes to remediation, never to a failure.
            (FlowPhase::AdaptivePreTest, FlowEvent::Intent(Intent::Answer { correct: false })) => {
                Transition {
                    state: Self {
                        question: Some(Question::LearningModule),
                        ..self.clone()
                    },
                    effect: None,
                }
            }

            (FlowPhase::AdaptiveLearning, FlowEvent::Intent(Intent::CompleteLearning)) => {
                Transition {
                    state: self.finish(Outcome::Pass, now),
                    effect: None,
                }
            }

            _ => Transition::unchanged(self),
        }
    }

    fn finish(&self, outcome: Outcome, now: DateTime<Utc>) -> Self {
        Self {
            outcome: Some(outcome),
            completed_at: Some(now),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> FlowSnapshot {
        FlowSnapshot {
            mode: self.mode,
            question: self.question,
            progress: self.progress,
            outcome: self.outcome,
            started_at: self.started_at,
            completed_at: self.completed_at,
        }
    }
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Read-only copy of the state bundle handed to the renderer after every transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlowSnapshot {
    pub mode: Mode,
    pub question: Option<Question>,
    pub progress: Progress,
    pub outcome: Option<Outcome>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl FlowSnapshot {
    #[must_use]
    pub fn phase(&self) -> FlowPhase {
        FlowPhase::of(self.mode, self.question, self.outcome)
    }

    #[must_use]
    pub fn is_initial(&self) -> bool {
        *self == FlowState::initial().snapshot()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    const ALL_EVENTS: [FlowEvent; 7] = [
        FlowEvent::Intent(Intent::SelectTraditional),
        FlowEvent::Intent(Intent::SelectAdaptive),
        FlowEvent::Intent(Intent::Answer { correct: true }),
        FlowEvent::Intent(Intent::Answer { correct: false }),
        FlowEvent::Intent(Intent::CompleteLearning),
        FlowEvent::Intent(Intent::Restart),
        FlowEvent::Tick,
    ];

    fn run(state: &FlowState, events: &[FlowEvent]) -> FlowState {
        let settings = TickSettings::default();
        events.iter().fold(state.clone(), |current, event| {
            current.apply(*event, &settings, fixed_now()).state
        })
    }

    fn ticks(n: usize) -> Vec<FlowEvent> {
        std::iter::repeat_n(FlowEvent::Tick, n).collect()
    }

    fn traditional_check() -> FlowState {
        let mut events: Vec<FlowEvent> = vec![Intent::SelectTraditional.into()];
        events.extend(ticks(5));
        run(&FlowState::initial(), &events)
    }

    fn adaptive_pretest() -> FlowState {
        run(&FlowState::initial(), &[Intent::SelectAdaptive.into()])
    }

    fn adaptive_learning() -> FlowState {
        run(
            &adaptive_pretest(),
            &[Intent::Answer { correct: false }.into()],
        )
    }

    /// One representative state per phase.
    fn every_phase() -> Vec<FlowState> {
        let loading = run(
            &FlowState::initial(),
            &[Intent::SelectTraditional.into(), FlowEvent::Tick],
        );
        vec![
            FlowState::initial(),
            loading,
            traditional_check(),
            adaptive_pretest(),
            adaptive_learning(),
            run(&traditional_check(), &[Intent::Answer { correct: true }.into()]),
            run(&traditional_check(), &[Intent::Answer { correct: false }.into()]),
        ]
    }

    #[test]
    fn initial_state_is_neutral() {
        let state = FlowState::initial();
        assert_eq!(state.mode(), Mode::Select);
        assert_eq!(state.question(), None);
        assert_eq!(state.progress(), Progress::ZERO);
        assert_eq!(state.outcome(), None);
        assert_eq!(state.phase(), FlowPhase::Select);
    }

    #[test]
    fn selecting_traditional_requests_the_ticker() {
        let transition = FlowState::initial().apply(
            Intent::SelectTraditional.into(),
            &TickSettings::default(),
            fixed_now(),
        );
        assert_eq!(transition.state.phase(), FlowPhase::TraditionalLoading);
        assert_eq!(transition.state.started_at(), Some(fixed_now()));
        assert_eq!(transition.effect, Some(Effect::StartTicker));
    }

    #[test]
    fn ticks_advance_by_twenty_and_finish_at_one_hundred() {
        let settings = TickSettings::default();
        let mut state = run(&FlowState::initial(), &[Intent::SelectTraditional.into()]);
        for expected in [20, 40, 60, 80] {
            let transition = state.apply(FlowEvent::Tick, &settings, fixed_now());
            assert_eq!(transition.state.progress().percent(), expected);
            assert_eq!(transition.state.phase(), FlowPhase::TraditionalLoading);
            assert_eq!(transition.effect, None);
            state = transition.state;
        }

        let last = state.apply(FlowEvent::Tick, &settings, fixed_now());
        assert_eq!(last.state.progress(), Progress::COMPLETE);
        assert_eq!(last.state.phase(), FlowPhase::TraditionalCheck);
        assert_eq!(last.effect, Some(Effect::TickerFinished));
    }

    #[test]
    fn uneven_step_never_overshoots() {
        let settings = TickSettings::new(30, 1_000).unwrap();
        let mut state = FlowState::initial()
            .apply(Intent::SelectTraditional.into(), &settings, fixed_now())
            .state;
        for _ in 0..settings.ticks_to_complete() {
            state = state.apply(FlowEvent::Tick, &settings, fixed_now()).state;
            assert!(state.progress().percent() <= 100);
        }
        assert_eq!(state.progress(), Progress::COMPLETE);
        assert_eq!(state.phase(), FlowPhase::TraditionalCheck);
    }

    #[test]
    fn ticks_outside_loading_are_ignored() {
        for state in every_phase() {
            if state.phase() == FlowPhase::TraditionalLoading {
                continue;
            }
            let transition = state.apply(FlowEvent::Tick, &TickSettings::default(), fixed_now());
            assert_eq!(transition.state, state);
            assert_eq!(transition.effect, None);
        }
    }

    #[test]
    fn correct_answers_pass_from_either_question() {
        for state in [traditional_check(), adaptive_pretest()] {
            let next = run(&state, &[Intent::Answer { correct: true }.into()]);
            assert_eq!(next.outcome(), Some(Outcome::Pass));
            assert_eq!(next.completed_at(), Some(fixed_now()));
        }
    }

    #[test]
    fn wrong_traditional_answer_fails() {
        let next = run(&traditional_check(), &[Intent::Answer { correct: false }.into()]);
        assert_eq!(next.phase(), FlowPhase::Failed);
    }

    #[test]
    fn wrong_pretest_answer_goes_to_learning_not_failure() {
        let next = adaptive_learning();
        assert_eq!(next.phase(), FlowPhase::AdaptiveLearning);
        assert_eq!(next.outcome(), None);
        assert_eq!(next.completed_at(), None);
    }

    #[test]
    fn learning_only_completes_and_always_passes() {
        let learning = adaptive_learning();
        for answer in [true, false] {
            let next = run(&learning, &[Intent::Answer { correct: answer }.into()]);
            assert_eq!(next, learning);
        }
        let done = run(&learning, &[Intent::CompleteLearning.into()]);
        assert_eq!(done.phase(), FlowPhase::Passed);
    }

    #[test]
    fn answering_while_loading_is_a_noop() {
        let loading = run(&FlowState::initial(), &[Intent::SelectTraditional.into()]);
        let next = run(&loading, &[Intent::Answer { correct: true }.into()]);
        assert_eq!(next, loading);
    }

    #[test]
    fn terminal_states_ignore_everything_but_restart() {
        for state in every_phase().into_iter().filter(|s| s.phase().is_terminal()) {
            for event in ALL_EVENTS {
                let transition = state.apply(event, &TickSettings::default(), fixed_now());
                if event == FlowEvent::Intent(Intent::Restart) {
                    assert_eq!(transition.state, FlowState::initial());
                } else {
                    assert_eq!(transition.state, state);
                    assert_eq!(transition.effect, None);
                }
            }
        }
    }

    #[test]
    fn restart_from_any_phase_resets_and_stops_ticker() {
        for state in every_phase() {
            let transition = state.apply(
                Intent::Restart.into(),
                &TickSettings::default(),
                fixed_now(),
            );
            assert_eq!(transition.state, FlowState::initial());
            assert!(transition.state.snapshot().is_initial());
            assert_eq!(transition.effect, Some(Effect::StopTicker));
        }
    }

    #[test]
    fn only_select_traditional_starts_a_ticker() {
        for state in every_phase() {
            for event in ALL_EVENTS {
                let transition = state.apply(event, &TickSettings::default(), fixed_now());
                if transition.effect == Some(Effect::StartTicker) {
                    assert_eq!(state.phase(), FlowPhase::Select);
                    assert_eq!(event, FlowEvent::Intent(Intent::SelectTraditional));
                }
            }
        }
    }

    #[test]
    fn mode_is_chosen_once_per_session() {
        let adaptive = adaptive_pretest();
        let next = run(&adaptive, &[Intent::SelectTraditional.into()]);
        assert_eq!(next, adaptive);
    }

    #[test]
    fn snapshot_serializes_with_snake_case_fields() {
        let snapshot = traditional_check().snapshot();
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["mode"], "traditional");
        assert_eq!(json["question"], "traditional_check");
        assert_eq!(json["progress"], 100);
        assert!(json["outcome"].is_null());
    }
}

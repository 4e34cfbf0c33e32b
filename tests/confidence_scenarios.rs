// tests/confidence_scenarios.rs
//
// Confidence scorer: documented scenarios plus monotonicity and bounds.

use atendos_engine::knowledge::TrainingEntry;
use atendos_engine::scoring::{score, score_with_matches};

/// 10-word question; `MESSAGE` shares 9 of its words -> similarity 0.9.
const QUESTION: &str = "como faço para alterar a data do meu agendamento amanhã";
const MESSAGE: &str = "como faço para alterar a data do meu agendamento";

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn no_entries_short_reply_is_base() {
    assert_eq!(score("Olá!", &[], "oi"), 0.5);
}

#[test]
fn no_entries_length_bonuses_only() {
    let reply_60 = "x".repeat(60);
    let reply_120 = "x".repeat(120);
    assert!(approx(score(&reply_60, &[], "oi"), 0.7));
    assert!(approx(score(&reply_120, &[], "oi"), 0.8));
}

#[test]
fn three_strong_matches_and_long_reply_caps_at_one() {
    let entries = vec![
        TrainingEntry::new("Agenda", QUESTION, "Pelo app."),
        TrainingEntry::new("Agenda", QUESTION, "Pelo site."),
        TrainingEntry::new("Agenda", QUESTION, "Pelo WhatsApp."),
    ];
    assert!(approx(
        atendos_engine::similarity(MESSAGE, QUESTION),
        0.9
    ));
    let reply = "y".repeat(120);
    assert_eq!(score(&reply, &entries, MESSAGE), 1.0);
}

#[test]
fn single_match_adds_point_two() {
    let entries = vec![
        TrainingEntry::new("Agenda", QUESTION, "Pelo app."),
        TrainingEntry::new("Pagamento", "aceitam pix", "Sim."),
    ];
    assert!(approx(score("ok", &entries, MESSAGE), 0.7));
}

#[test]
fn monotone_in_length_and_matches() {
    let mut prev = 0.0;
    for len in 0..=200 {
        let c = score_with_matches(&"z".repeat(len), 0);
        assert!(c >= prev, "decreased at len {len}");
        assert!((0.5..=1.0).contains(&c));
        prev = c;
    }
    let mut prev = 0.0;
    for n in 0..=10 {
        let c = score_with_matches("resposta curta", n);
        assert!(c >= prev, "decreased at {n} matches");
        assert!((0.5..=1.0).contains(&c));
        prev = c;
    }
}

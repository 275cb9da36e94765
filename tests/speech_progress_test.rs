/// Integration tests for the speech progress matcher, driven through the public API
/// the way a recognizer callback would drive it.

#[cfg(test)]
mod speech_progress_tests {
    use affirm::{
        HypothesisKind, MatcherConfig, SpeechProgressMatcher, StemmerKind, TranscriptMode,
    };
    use rand::prelude::SliceRandom;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn matcher_for(phrase: &str) -> SpeechProgressMatcher {
        let mut m = SpeechProgressMatcher::default();
        m.reset_for_text(phrase);
        m
    }

    const VOCAB: [&str; 10] = [
        "i", "am", "enough", "um", "and", "calm", "grounded", "so", "enuf", "really",
    ];

    #[test]
    fn tail_window_keeps_target_plus_two() {
        let m = matcher_for("I am enough");
        let window = m.tokenize_for_current_window("alpha beta gamma delta epsilon zeta eta theta");
        assert_eq!(window, vec!["delta", "epsilon", "zeta", "eta", "theta"]);

        let short = m.tokenize_for_current_window("I am");
        assert_eq!(short, vec!["i", "am"]);
    }

    #[test]
    fn extra_words_after_phrase_are_ignored() {
        let mut m = matcher_for("I am enough");
        let tokens = m.tokenize_for_current_window("I am enough right now");
        m.feed(&tokens);
        assert_eq!(m.active_token_index(), 3);
        assert!(m.is_complete());
    }

    #[test]
    fn growing_partials_confirm_one_word_each() {
        let mut m = matcher_for("I am enough");
        let mut seen = Vec::new();
        for partial in ["I", "I am", "I am enough"] {
            m.feed_hypothesis(HypothesisKind::Partial, partial);
            seen.push(m.active_token_index());
        }
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn random_streams_never_regress_or_overrun() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let mut m = matcher_for("I am calm and grounded");
            let total = m.target_tokens().len();
            let mut hypothesis: Vec<&str> = Vec::new();
            let mut last_active = 0;
            let mut was_complete = false;

            for _ in 0..30 {
                // grow, shrink or replace the running hypothesis
                let word = *VOCAB.choose(&mut rng).unwrap();
                match rng.gen_range(0..4) {
                    0 if !hypothesis.is_empty() => {
                        let keep = rng.gen_range(0..hypothesis.len());
                        hypothesis.truncate(keep);
                    }
                    1 => hypothesis = vec![word],
                    _ => hypothesis.push(word),
                }
                let kind = if rng.gen_range(0..5) == 0 {
                    HypothesisKind::Final
                } else {
                    HypothesisKind::Partial
                };
                m.feed_hypothesis(kind, &hypothesis.join(" "));

                let active = m.active_token_index();
                assert!(active >= last_active);
                assert!(active <= total);
                if was_complete {
                    assert!(m.is_complete());
                    assert_eq!(active, total);
                }
                last_active = active;
                was_complete = m.is_complete();
            }
        }
    }

    #[test]
    fn feeding_unrelated_words_changes_nothing() {
        let mut m = matcher_for("I am enough");
        let first = m.tokenize_for_matching("I");
        m.feed(&first);
        let before = (m.active_token_index(), m.heard_cursor());
        let tokens = m.tokenize_for_matching("pizza tomorrow maybe");
        assert!(!m.feed(&tokens));
        assert_eq!((m.active_token_index(), m.heard_cursor()), before);
    }

    #[test]
    fn single_edit_on_long_words_is_tolerated() {
        let mut m = matcher_for("I am grateful");
        m.feed_hypothesis(HypothesisKind::Final, "I am gratefull");
        assert!(m.is_complete());

        let mut m = matcher_for("I am grateful");
        m.feed_hypothesis(HypothesisKind::Final, "I am greatful");
        assert_eq!(m.active_token_index(), 2);
    }

    #[test]
    fn configured_matcher_without_stemming() {
        let config = MatcherConfig {
            stemmer: StemmerKind::None,
            transcript_mode: TranscriptMode::Utterance,
            ..MatcherConfig::default()
        };
        let mut m = SpeechProgressMatcher::new(&config);
        m.reset_for_text("I keep going");
        m.feed_hypothesis(HypothesisKind::Final, "I kept go");
        assert_eq!(m.active_token_index(), 1);
    }

    #[test]
    fn display_tokens_follow_target_index() {
        let mut m = matcher_for("i don't give up!");
        assert_eq!(m.target_tokens(), ["i", "dont", "give", "up"]);
        assert_eq!(m.display_tokens(), ["I", "dont", "give", "up"]);
        m.feed_hypothesis(HypothesisKind::Partial, "I don't");
        let p = m.progress();
        assert_eq!(p.spoken, vec!["I", "dont"]);
        assert_eq!(p.pending, vec!["give", "up"]);
    }
}

use worksafe_core::{
    assemble, change_summary, format_as_email, mask_zones, segment_sentences, tokenize,
    transform_text, transform_text_with, Category, Config, DetectOptions, Engine, SentenceSpan,
};

#[test]
fn rewrites_end_to_end() {
    let result = transform_text("fucking bullshit asshole");
    assert_eq!(result.transformed, "freaking nonsense jerk");
    assert_eq!(result.change_count, 3);
    assert_eq!(
        change_summary(&result.changes),
        "Transformed 3 profanity"
    );
}

#[test]
fn clause_group_is_replaced_once() {
    let result = transform_text("You are an idiot. You are so stupid.\nSee you tomorrow.");
    assert_eq!(result.change_count, 1);
    assert_eq!(
        result.transformed,
        "I'd like to discuss some concerns about how this is being handled.\nSee you tomorrow."
    );
    assert_eq!(
        change_summary(&result.changes),
        "Transformed 1 hostile sentence group"
    );
}

#[test]
fn ellipsis_between_hostile_sentences_keeps_groups_apart() {
    let result = transform_text("You idiot... You moron.");
    assert_eq!(result.change_count, 2);
    assert!(result
        .changes
        .iter()
        .all(|d| d.category == Category::ClauseAttack));
    assert_eq!(result.changes[0].original, "You idiot.");
    assert_eq!(result.changes[1].original, "You moron.");
}

#[test]
fn reconstruction_matches_manual_splice() {
    let texts = [
        "WTF is this crap?? I told you to kind of figure it out.",
        "Hope you're well. Just checking in, no worries if not.",
        "> quoted damn\nkindly review, it's basically done",
    ];
    for text in texts {
        let result = transform_text(text);
        let mut expected = String::new();
        let mut cursor = 0;
        for change in &result.changes {
            expected.push_str(&text[cursor..change.start]);
            expected.push_str(&change.replacement);
            cursor = change.end;
        }
        expected.push_str(&text[cursor..]);
        assert_eq!(result.transformed, expected);
        assert_eq!(assemble(text, &result.changes), expected);
    }
}

#[test]
fn unchanged_text_round_trips_exactly() {
    let text = "Thanks for the review.\n> fuck this quote\n```\nlet shit = 1;\n```\n";
    let result = transform_text(text);
    assert_eq!(result.change_count, 0);
    assert_eq!(result.transformed, text);
    assert_eq!(
        change_summary(&result.changes),
        "No changes needed - your text is already professional!"
    );
}

#[test]
fn summary_reports_persuasion_subcategories() {
    let result = transform_text("Just checking in. I think we should proceed.");
    assert_eq!(
        change_summary(&result.changes),
        "Transformed persuasion (1 hedging, 1 follow-up)"
    );
    assert_eq!(result.transformed, "Following up. I recommend we proceed.");
}

#[test]
fn uppercase_phrases_stay_uppercase() {
    let result = transform_text("PER MY LAST EMAIL, no.");
    assert_eq!(result.transformed, "AS I MENTIONED, no.");
}

#[test]
fn sarcasm_mode_rewrites_sarcasm() {
    let options = DetectOptions { sarcasm_mode: true };
    let result = transform_text_with("Well done... you broke it.", &options);
    assert_eq!(result.transformed, "Let's review this you broke it.");
}

#[test]
fn engine_matches_free_functions() {
    let engine = Engine::new(Config::default()).expect("default config");
    let text = "I guess this is awful. Hopefully, it ships.";
    let options = DetectOptions::default();
    assert_eq!(engine.transform(text, &options), transform_text(text));
}

#[test]
fn exposes_segmentation_and_tokens() {
    let text = "First one. Second @team one!";
    assert_eq!(
        segment_sentences(text),
        vec![
            SentenceSpan { start: 0, end: 10 },
            SentenceSpan { start: 11, end: 28 },
        ]
    );
    let masked = mask_zones(text);
    let tokens = tokenize(text, masked.as_str());
    let protected: Vec<&str> = tokens
        .iter()
        .filter(|t| t.protected)
        .map(|t| t.raw.as_str())
        .collect();
    assert_eq!(protected, vec!["team"]);
}

#[test]
fn email_wraps_transformed_text() {
    let result = transform_text("Sorry, but the damn build is late.");
    assert_eq!(
        format_as_email(&result.transformed),
        "Hi,\n\nHowever the darn build is late.\n\nBest regards"
    );
}

#[test]
fn results_serialize_with_kebab_case_categories() {
    let result = transform_text("You are an idiot.");
    let json = serde_json::to_value(&result).expect("json");
    assert_eq!(json["changes"][0]["category"], "clause-rewrite-attack");
    assert_eq!(json["change_count"], 1);
}

//! End-to-end behaviour of the assistant against fake gateways.

use std::sync::Arc;
use std::time::{Duration, Instant};

use mock_gateway::{DelayedGateway, FailingGateway, FixedGateway, ScriptedGateway};
use story_assistant::{
    AssistError, AssistantConfig, InvokeOptions, IssueKind, Language, OfflineGateway, Operation,
    OperationInput, RiskTier, Source, StoryAssistant, Tone,
};

fn en() -> InvokeOptions {
    InvokeOptions::language(Language::En)
}

fn every_input(text: &str) -> Vec<OperationInput> {
    vec![
        OperationInput::Synopsis {
            keywords: vec!["dragon".into()],
        },
        OperationInput::ChapterTitles { text: text.into() },
        OperationInput::Rewrite {
            text: "A calm lake.".into(),
            tone: Tone::Poetic,
        },
        OperationInput::PlotTwists { text: text.into() },
        OperationInput::CharacterCheck {
            text: text.into(),
            profile: "brave".into(),
        },
        OperationInput::Hashtags { text: text.into() },
        OperationInput::Genres { text: text.into() },
        OperationInput::Moderate { text: text.into() },
        OperationInput::Summary { text: text.into() },
        OperationInput::FastRecap { text: text.into() },
    ]
}

#[tokio::test]
async fn test_offline_synopsis_embeds_keywords() {
    let assistant = StoryAssistant::offline();

    let result = assistant
        .synopsis(
            vec!["dragon".into(), "exile".into(), "revenge".into()],
            en(),
        )
        .await
        .unwrap();

    assert_eq!(result.language, Language::En);
    assert_eq!(result.source, Source::Fallback);
    let dragon = result.payload.find("dragon").unwrap();
    let exile = result.payload.find("exile").unwrap();
    let revenge = result.payload.find("revenge").unwrap();
    assert!(dragon < exile && exile < revenge);
}

#[tokio::test]
async fn test_moderate_threat_with_slur() {
    let assistant = StoryAssistant::offline();

    let result = assistant
        .moderate("I will kill you, you racist pig", InvokeOptions::auto())
        .await
        .unwrap();

    assert!(result.payload.issues.contains(&IssueKind::Violence));
    assert!(result.payload.issues.contains(&IssueKind::HateSpeech));
    assert_eq!(result.payload.risk, RiskTier::Medium);
    assert_eq!(result.source, Source::Fallback);
    assert!(!result.payload.recommended_fix.is_empty());
}

#[tokio::test]
async fn test_moderate_uses_model_fix() {
    let gateway = Arc::new(
        ScriptedGateway::new().respond(Operation::Moderate, r#"{"fix": "I will stop you, you fool."}"#),
    );
    let assistant = StoryAssistant::new(gateway.clone(), AssistantConfig::default());

    let result = assistant
        .moderate("I will kill you, you racist pig", en())
        .await
        .unwrap();

    assert_eq!(result.source, Source::Model);
    assert_eq!(result.payload.recommended_fix, "I will stop you, you fool.");
    assert_eq!(result.payload.risk, RiskTier::Medium);

    let requests = gateway.requests().await;
    assert_eq!(requests.len(), 1);
    assert!(requests[0].structured);
}

#[tokio::test]
async fn test_moderate_malformed_fix_keeps_rule_verdict() {
    let assistant = StoryAssistant::with_gateway(FixedGateway::new("I cannot help with that."));

    let result = assistant.moderate("They will murder the king", en()).await.unwrap();

    assert_eq!(result.source, Source::Fallback);
    assert_eq!(result.payload.risk, RiskTier::Low);
    assert!(result.payload.issues.contains(&IssueKind::Violence));
    assert!(result.payload.recommended_fix.starts_with("Rewrite"));
}

#[tokio::test]
async fn test_chapter_titles_from_five_lines() {
    let gateway = ScriptedGateway::new().respond(
        Operation::ChapterTitles,
        "  The Gate  \n2. Ash and Ember\n- Night Road \n* The Return\n5) Dawn",
    );
    let assistant = StoryAssistant::with_gateway(gateway);

    let result = assistant
        .chapter_titles("The exile walked toward the gate.", en())
        .await
        .unwrap();

    assert_eq!(result.source, Source::Model);
    assert_eq!(
        result.payload,
        vec!["The Gate", "Ash and Ember", "Night Road", "The Return", "Dawn"]
    );
}

#[tokio::test]
async fn test_character_check_malformed_json_uses_rule() {
    let gateway = ScriptedGateway::new().respond(
        Operation::CharacterCheck,
        r#"{"issues": [{"location": "chapter 3", "reason": "#,
    );
    let assistant = StoryAssistant::with_gateway(gateway);

    let result = assistant
        .character_check("When the wolves came, he runs away.", "A brave knight", en())
        .await
        .unwrap();

    assert_eq!(result.source, Source::Fallback);
    assert_eq!(result.payload.len(), 1);
    assert_eq!(result.payload[0].reason, "Brave character flees");
}

#[tokio::test]
async fn test_character_check_model_answer() {
    let gateway = ScriptedGateway::new().respond(
        Operation::CharacterCheck,
        "```json\n{\"issues\": [{\"location\": \"ch. 3\", \"reason\": \"Hero hides\", \"fix\": \"Let him stand\"}]}\n```",
    );
    let assistant = StoryAssistant::with_gateway(gateway);

    let result = assistant
        .character_check("He hides behind the cart.", "Fearless", en())
        .await
        .unwrap();

    assert_eq!(result.source, Source::Model);
    assert_eq!(result.payload[0].location, "ch. 3");
}

#[tokio::test]
async fn test_offline_never_fails_for_valid_input() {
    let assistant = StoryAssistant::with_gateway(OfflineGateway::new());
    let texts = [
        "",
        "The dragon woke. It was angry! Why now? Nobody knew. Then it flew.",
        "Cô ấy yêu anh và không muốn rời xa.",
    ];

    for text in texts {
        for input in every_input(text) {
            let operation = input.operation();
            let result = assistant
                .invoke(input, InvokeOptions::auto())
                .await
                .unwrap_or_else(|e| panic!("{} failed offline: {}", operation, e));

            assert_eq!(result.source, Source::Fallback);
            assert_eq!(result.payload.operation(), operation);
            assert!(result.payload.satisfies_contract(), "{} breaks the contract", operation);
        }
    }
}

#[tokio::test]
async fn test_failing_gateway_falls_back() {
    for gateway in [FailingGateway::network_down(), FailingGateway::timing_out()] {
        let assistant = StoryAssistant::with_gateway(gateway);

        let result = assistant
            .plot_twists("The village was quiet.", en())
            .await
            .unwrap();

        assert_eq!(result.source, Source::Fallback);
        assert_eq!(result.payload.len(), 3);
    }
}

#[tokio::test]
async fn test_deadline_triggers_fallback() {
    let slow = DelayedGateway::new(FixedGateway::new("Too late."), Duration::from_secs(5));
    let config = AssistantConfig::builder()
        .timeout(Duration::from_millis(100))
        .build();
    let assistant = StoryAssistant::new(Arc::new(slow), config);

    let started = Instant::now();
    let result = assistant
        .summary("First. Second. Third. Fourth.", en())
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(result.source, Source::Fallback);
    assert_eq!(result.payload, "First. Second. Third.");
}

#[tokio::test]
async fn test_language_follows_input_not_answer() {
    let gateway = ScriptedGateway::new().respond(Operation::Summary, "An English summary.");
    let assistant = StoryAssistant::with_gateway(gateway);

    let result = assistant
        .summary("Nàng công chúa sống trong lâu đài.", InvokeOptions::auto())
        .await
        .unwrap();

    assert_eq!(result.language, Language::Vi);
    assert_eq!(result.source, Source::Model);
    assert_eq!(result.payload, "An English summary.");
}

#[tokio::test]
async fn test_pinned_language_overrides_detection() {
    let gateway = Arc::new(ScriptedGateway::new());
    let assistant = StoryAssistant::new(gateway.clone(), AssistantConfig::default());

    let result = assistant
        .hashtags("The knight and the dragon", InvokeOptions::language(Language::Vi))
        .await
        .unwrap();

    assert_eq!(result.language, Language::Vi);
    assert_eq!(result.payload[0], "#truyện");

    let requests = gateway.requests().await;
    assert!(requests[0].prompt.contains("Nội dung:"));
}

#[tokio::test]
async fn test_configured_default_language() {
    let config = AssistantConfig::builder().default_language(Language::Vi).build();
    let assistant = StoryAssistant::new(Arc::new(OfflineGateway::new()), config);

    let result = assistant
        .genres("A tale of love", InvokeOptions::default())
        .await
        .unwrap();
    assert_eq!(result.language, Language::Vi);
    assert_eq!(result.payload, vec!["Lãng mạn"]);

    let result = assistant
        .genres("A tale of love", InvokeOptions::auto())
        .await
        .unwrap();
    assert_eq!(result.language, Language::En);
    assert_eq!(result.payload, vec!["Romance"]);
}

#[tokio::test]
async fn test_invalid_input_is_returned() {
    let assistant = StoryAssistant::offline();

    let err = assistant.synopsis(vec![" ".into()], en()).await.unwrap_err();
    assert!(matches!(err, AssistError::InvalidInput(_)));

    let err = assistant
        .rewrite("   ", Tone::Action, en())
        .await
        .unwrap_err();
    assert!(matches!(err, AssistError::InvalidInput(_)));
}

#[tokio::test]
async fn test_requests_carry_shape_and_excerpt() {
    let gateway = Arc::new(
        ScriptedGateway::new()
            .respond(Operation::Genres, r#"["Fantasy", "Adventure"]"#)
            .respond(Operation::FastRecap, "- He left.\n- She stayed."),
    );
    let assistant = StoryAssistant::new(gateway.clone(), AssistantConfig::default());
    let long_text = "ω".repeat(3000);

    let genres = assistant.genres(&long_text, en()).await.unwrap();
    assert_eq!(genres.payload, vec!["Fantasy", "Adventure"]);

    let recap = assistant.fast_recap(&long_text, en()).await.unwrap();
    assert_eq!(recap.payload, vec!["He left.", "She stayed."]);

    let requests = gateway.requests().await;
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].operation, Operation::Genres);
    assert!(requests[0].structured);
    assert_eq!(requests[0].prompt.matches('ω').count(), 1200);
    assert_eq!(requests[1].operation, Operation::FastRecap);
    assert!(!requests[1].structured);
    assert_eq!(requests[1].prompt.matches('ω').count(), 2000);
}

#[tokio::test]
async fn test_rewrite_offline_preserves_text() {
    let assistant = StoryAssistant::offline();

    let result = assistant
        .rewrite("Mưa rơi trên mái nhà.", Tone::Poetic, InvokeOptions::auto())
        .await
        .unwrap();

    assert_eq!(result.language, Language::Vi);
    assert_eq!(result.payload, "Mưa rơi trên mái nhà.");
}

#[tokio::test]
async fn test_rewrite_beyond_excerpt_keeps_whole_passage() {
    let gateway = Arc::new(
        ScriptedGateway::new().respond(Operation::Rewrite, "A shorter, poetic opening."),
    );
    let assistant = StoryAssistant::new(gateway.clone(), AssistantConfig::default());
    let passage = "The rain kept falling. ".repeat(220);
    assert!(passage.chars().count() > 4000);

    let result = assistant.rewrite(&passage, Tone::Poetic, en()).await.unwrap();

    assert_eq!(result.source, Source::Fallback);
    assert_eq!(result.payload, passage);
    assert_eq!(gateway.call_count().await, 0);

    let short = assistant
        .rewrite("The rain kept falling.", Tone::Poetic, en())
        .await
        .unwrap();
    assert_eq!(short.source, Source::Model);
    assert_eq!(gateway.call_count().await, 1);
}

#[tokio::test]
async fn test_auto_tag() {
    let gateway = ScriptedGateway::new()
        .respond(Operation::Hashtags, "#dragon, #exile, revenge")
        .respond(Operation::Genres, r#"{"genres": ["Dark Fantasy"]}"#);
    let assistant = StoryAssistant::with_gateway(gateway);

    let result = assistant.auto_tag("The exiled dragon returns.", en()).await.unwrap();
    assert_eq!(result.source, Source::Model);
    assert_eq!(result.payload.genre, "Dark Fantasy");
    assert_eq!(result.payload.tags, vec!["#dragon", "#exile", "#revenge"]);

    // Only one half model-backed.
    let gateway = ScriptedGateway::new().respond(Operation::Hashtags, "#dragon");
    let assistant = StoryAssistant::with_gateway(gateway);
    let result = assistant.auto_tag("The exiled dragon returns.", en()).await.unwrap();
    assert_eq!(result.source, Source::Fallback);
    assert_eq!(result.payload.genre, "Fantasy");
    assert_eq!(result.payload.tags, vec!["#dragon"]);
}

#[tokio::test]
async fn test_result_serializes_for_ui() {
    let assistant = StoryAssistant::offline();

    let result = assistant
        .invoke_named("plotTwists", serde_json::json!({"text": "It began."}), Some("en"))
        .await
        .unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["language"], "en");
    assert_eq!(json["source"], "fallback");
    assert_eq!(json["payload"]["twists"].as_array().unwrap().len(), 3);

    let verdict = assistant
        .invoke_named("moderate", serde_json::json!({"text": "The minor ran."}), None)
        .await
        .unwrap();
    let json = serde_json::to_value(&verdict).unwrap();
    assert_eq!(json["payload"]["risk"], "high");
    assert_eq!(
        json["payload"]["issues"],
        serde_json::json!(["sexual_content_involving_minors"])
    );
}

#[tokio::test]
async fn test_concurrent_invocations() {
    let gateway = ScriptedGateway::new().respond(Operation::Summary, "Short.");
    let assistant = Arc::new(StoryAssistant::with_gateway(DelayedGateway::with_millis(
        gateway, 20,
    )));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let assistant = assistant.clone();
            tokio::spawn(async move {
                assistant
                    .summary(&format!("Story number {}.", i), en())
                    .await
            })
        })
        .collect();

    for handle in handles {
        let result = handle.await.unwrap().unwrap();
        assert_eq!(result.source, Source::Model);
        assert_eq!(result.payload, "Short.");
    }
}

//! Run every authoring operation on a sample passage.
//!
//! Run with: cargo run -p story-assistant --example story_demo
//! Or with your own text: cargo run -p story-assistant --example story_demo -- "Your text here"
//!
//! Configuration via .env file or environment variables:
//!   GEMINI_API_KEY         - Gemini API key (optional; without it every
//!                            answer comes from the fallback engine)
//!   STORY_AI_TIMEOUT_SECS  - Model call deadline (default: 20)
//!   STORY_AI_LANGUAGE      - auto, en or vi (default: auto)
//!   RUST_LOG               - Log filter (default: info)

use std::env;

use story_assistant::{InvokeOptions, OperationInput, StoryAssistant, Tone};
use tracing_subscriber::EnvFilter;

const SAMPLE: &str = "Kael was the bravest knight of the northern keep. \
When the dragon returned to burn the village, he runs away into the forest. \
Years later he came back to find the keep in ruins and his sister ruling the survivors. \
She had made a pact with the dragon.";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();
    let text = if args.len() > 1 {
        args[1..].join(" ")
    } else {
        SAMPLE.to_string()
    };

    let assistant = StoryAssistant::from_env()?;
    println!("Gateway: {}", assistant.gateway_name());
    println!("Timeout: {:?}", assistant.config().timeout);
    println!();

    let keywords = StoryAssistant::parse_keywords("dragon, exile; betrayal");
    let inputs = vec![
        OperationInput::Synopsis { keywords },
        OperationInput::ChapterTitles { text: text.clone() },
        OperationInput::Rewrite {
            text: text.clone(),
            tone: Tone::Poetic,
        },
        OperationInput::PlotTwists { text: text.clone() },
        OperationInput::CharacterCheck {
            text: text.clone(),
            profile: "Kael is brave and loyal.".to_string(),
        },
        OperationInput::Hashtags { text: text.clone() },
        OperationInput::Genres { text: text.clone() },
        OperationInput::Moderate { text: text.clone() },
        OperationInput::Summary { text: text.clone() },
        OperationInput::FastRecap { text: text.clone() },
    ];

    for input in inputs {
        let operation = input.operation();
        let result = assistant.invoke(input, InvokeOptions::default()).await?;

        println!("=== {} ===", operation);
        println!("{}", serde_json::to_string_pretty(&result)?);
        println!();
    }

    let tags = assistant.auto_tag(&text, InvokeOptions::default()).await?;
    println!("=== autoTag ===");
    println!("{}", serde_json::to_string_pretty(&tags)?);

    Ok(())
}

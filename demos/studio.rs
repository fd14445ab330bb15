use std::env;
use std::sync::Arc;
use veo_studio::{
    logger::{self, LogLevel, LoggerConfig},
    ActionOutcome, Config, ConfiguredKeyHost, GenerationClient, ImageAsset, Shell, Tab,
};

// Usage: studio "<concept>" [seed-image] [output.mp4]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded"),
        Err(_) => log::warn!("⚠️  No .env file found"),
    }
    logger::init_with_config(LoggerConfig::development().with_level(LogLevel::Debug))?;

    let mut args = env::args().skip(1);
    let concept = args
        .next()
        .unwrap_or_else(|| "shine bright like a diamond".to_string());
    let seed = args.next();
    let output = args.next().unwrap_or_else(|| "studio.mp4".to_string());

    let config = Config::from_env();
    logger::log_config_info(&config);

    let client = GenerationClient::new(config.gemini.clone())?;
    let host = Arc::new(ConfiguredKeyHost::new(&config.gemini));
    let shell = Shell::new(&client, host, &config);

    if let Some(path) = &seed {
        let image = ImageAsset::from_path(path).await?;

        shell.select_tab(Tab::Analyzer);
        shell.analyzer().stage_image(image.clone());
        if shell.analyzer().analyze().await == ActionOutcome::Completed {
            println!("{:?}", shell.analyzer().status());
        }
        shell.studio().stage_image(image);
    }

    shell.select_tab(Tab::PromptMaker);
    shell.prompt_maker().set_lip_sync(true);
    shell.prompt_maker().set_concept(concept);
    shell.prompt_maker().enhance().await;
    if !shell.use_prompt() {
        log::error!("❌ No enhanced prompt: {:?}", shell.prompt_maker().status());
        return Ok(());
    }
    println!("Prompt: {}", shell.studio().prompt());

    let studio = shell.studio();
    studio.mount().await;
    if !studio.key_selected() && !studio.select_key().await {
        log::error!("❌ No API key selected");
        return Ok(());
    }

    let mut status = studio.subscribe_status();
    let watcher = tokio::spawn(async move {
        while status.changed().await.is_ok() {
            let message = status.borrow().clone();
            if !message.is_empty() {
                println!("... {}", message);
            }
        }
    });

    let outcome = studio.generate().await;
    watcher.abort();

    match outcome {
        ActionOutcome::Completed => {
            studio.export_video(&output).await?;
            println!("Saved {}", output);
        }
        _ => println!(
            "{:?}: {}",
            outcome,
            studio.error_message().unwrap_or_default()
        ),
    }

    Ok(())
}

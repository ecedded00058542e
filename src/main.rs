//! Batch runner: reads a JSON batch of dialogs from stdin, runs one skill
//! over them and writes the turn results to stdout.

use std::io::Read;
use std::sync::Arc;

use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dialog_skills::adapters::{
    ContentClientConfig, HttpContentFetcher, HttpTextQa, QaClientConfig, ThreadRandom,
    TracingCrashReporter,
};
use dialog_skills::application::{Skill, TurnDriver};
use dialog_skills::config::AppConfig;
use dialog_skills::domain::dialog::Dialog;
use dialog_skills::domain::emotion::{EmotionSkill, EMOTION_SKILL_NAME};
use dialog_skills::domain::meta_script::{MetaScriptSkill, META_SCRIPT_SKILL_NAME};
use dialog_skills::domain::wiki::{WikiSkill, WIKI_SKILL_NAME};
use dialog_skills::ports::RandomSource;

#[derive(Debug, Deserialize)]
struct BatchRequest {
    dialogs: Vec<Dialog>,
}

fn build_skill(
    name: &str,
    config: &AppConfig,
    rng: Arc<dyn RandomSource>,
) -> Result<Box<dyn Skill>, Box<dyn std::error::Error>> {
    match name {
        WIKI_SKILL_NAME => {
            let fetcher = HttpContentFetcher::new(
                ContentClientConfig::new(&config.content.url).with_timeout(config.content.timeout()),
            )?;
            let qa = HttpTextQa::new(
                QaClientConfig::new(&config.qa.url).with_timeout(config.qa.timeout()),
            )?;
            Ok(Box::new(WikiSkill::with_default_tables(
                Arc::new(fetcher),
                Arc::new(qa),
                rng,
            )))
        }
        EMOTION_SKILL_NAME => Ok(Box::new(EmotionSkill::with_default_table(rng))),
        META_SCRIPT_SKILL_NAME => Ok(Box::new(MetaScriptSkill::with_default_topics(rng))),
        other => Err(format!(
            "unknown skill '{other}', expected one of: {WIKI_SKILL_NAME}, \
             {EMOTION_SKILL_NAME}, {META_SCRIPT_SKILL_NAME}"
        )
        .into()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load()?;
    let skill_name = std::env::args()
        .nth(1)
        .unwrap_or_else(|| WIKI_SKILL_NAME.to_string());
    let skill = build_skill(&skill_name, &config, Arc::new(ThreadRandom))?;

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;
    let request: BatchRequest = serde_json::from_str(&input)?;
    info!(skill = %skill_name, dialogs = request.dialogs.len(), "running batch");

    let driver = TurnDriver::new(Arc::new(TracingCrashReporter));
    let results = driver.drive_batch(skill.as_ref(), &request.dialogs).await;

    serde_json::to_writer_pretty(std::io::stdout().lock(), &results)?;
    println!();
    Ok(())
}

//! Command-line posture analysis binary.
//!
//! Usage: `posture-cli <video_path>`. Prints the analysis report as
//! JSON to stdout; on failure prints `{"error": <message>}` and exits
//! with status 1. Overlay rendering is always enabled here.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use posture_pipeline::{AnalyzerPipeline, PipelineError, PipelineOptions};
use posture_pose::PoseClient;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries only the result JSON
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let Some(video_path) = std::env::args().nth(1) else {
        print_error("Missing video path");
        return ExitCode::FAILURE;
    };

    let estimator = match PoseClient::from_env() {
        Ok(client) => Arc::new(client),
        Err(e) => {
            print_error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    let start = Instant::now();
    match run(Path::new(&video_path), estimator).await {
        Ok(json) => {
            println!("{}", json);
            eprintln!("Processed in {:.2}s", start.elapsed().as_secs_f64());
            ExitCode::SUCCESS
        }
        Err(PipelineError::Encode { message, report }) => {
            // Encoding failed after analysis completed; report both
            let body = serde_json::json!({
                "error": format!("FFmpeg re-encoding failed: {}", message),
                "feedback": report,
            });
            println!("{}", body);
            ExitCode::FAILURE
        }
        Err(e) => {
            print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run(video_path: &Path, estimator: Arc<PoseClient>) -> Result<String, PipelineError> {
    let output_dir = std::env::var("OUTPUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("uploads"));

    let pipeline = AnalyzerPipeline::new(
        estimator,
        PipelineOptions {
            render_overlay: true,
            output_dir,
        },
    );

    let report = pipeline.analyze_file(video_path).await?;
    Ok(serde_json::to_string(&report).unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e)))
}

fn print_error(message: &str) {
    println!("{}", serde_json::json!({ "error": message }));
}

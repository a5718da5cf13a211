use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod assembler;
mod classifier;
mod decode;
mod document;
mod error;
mod namer;
mod pipeline;
mod report;
mod segmenter;
mod settings;
mod ui;

use assembler::LocalFs;
use decode::PhotoDecoder;
use document::DocxWriter;
use pipeline::Pipeline;
use report::RunReport;
use settings::Settings;
use ui::prompt::TerminalPrompt;

fn main() -> ExitCode {
    // RUST_LOG overrides; by default only our own info logs are shown
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,photo_binder=info")),
        )
        .init();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("❌ {}", e);
            eprintln!("   Fix or remove {}", Settings::default_path().display());
            return ExitCode::FAILURE;
        }
    };

    // Cancelling the picker means there is nothing to process
    let Some(folder) = ui::folder::pick_photo_folder() else {
        println!("No folder selected, nothing to do.");
        return ExitCode::SUCCESS;
    };

    let mut prompt = TerminalPrompt::stdio();
    let writer = DocxWriter::new(settings.image_width_inches, settings.captions);

    let report = Pipeline::new(
        &settings,
        &PhotoDecoder,
        &mut prompt,
        &writer,
        &LocalFs,
        Box::new(rand::thread_rng()),
    )
    .run(&folder);

    match report {
        Ok(report) => {
            println!();
            println!("{}", report.summary());

            if settings.save_report {
                match report.save(&RunReport::default_dir()) {
                    Ok(path) => println!("📁 Report saved to {}", path.display()),
                    Err(e) => tracing::warn!("Could not save run report: {}", e),
                }
            }

            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ Run aborted, nothing was written or moved: {}", e);
            ExitCode::FAILURE
        }
    }
}

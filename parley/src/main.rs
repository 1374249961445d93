use anyhow::{Context, Result};
use clap::Parser;
use parley::{ChatRepl, Cli, config, logging, repl, runtime};
use rustyline::DefaultEditor;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let loaded = config::load(&cli).with_context(|| {
        format!(
            "could not start; check that {} exists and holds a valid API key",
            cli.config.display()
        )
    })?;

    let mut editor = DefaultEditor::new().context("could not open the terminal for input")?;

    let mut settings = loaded.settings.clone();
    if loaded.needs_model_selection() {
        match repl::select_model(&mut editor, &loaded.models)? {
            Some(model) => settings = settings.with_model(model)?,
            None => return Ok(()),
        }
    }

    let session = runtime::build_session(settings, loaded.timeout)
        .context("could not build the HTTP client")?;
    tracing::info!(
        phase = "session",
        event = "started",
        session_id = %session.id(),
        model = session.model()
    );

    ChatRepl::new(editor, session).run().await?;
    Ok(())
}

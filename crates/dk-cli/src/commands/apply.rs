//! Apply command implementation

use dk_core::{Confirmer, FixedAnswer, ReconcileOutcome, Reconciler};
use dk_fs::RealFs;

use crate::context::AppContext;
use crate::error::Result;
use crate::interactive::DialoguerConfirmer;
use crate::render::TerminalReporter;

/// Run the apply command
///
/// With `yes`, every gate is answered "yes" without prompting.
pub fn run_apply(context: &AppContext, yes: bool) -> Result<ReconcileOutcome> {
    let mut confirmer: Box<dyn Confirmer> = if yes {
        Box::new(FixedAnswer(true))
    } else {
        Box::new(DialoguerConfirmer)
    };
    let mut reporter = TerminalReporter::stdout();

    let outcome = Reconciler::new(
        &RealFs,
        &context.paths,
        confirmer.as_mut(),
        &mut reporter,
    )
    .run(context.config.links())?;

    tracing::debug!(?outcome, config = %context.config_path.display(), "apply finished");
    Ok(outcome)
}

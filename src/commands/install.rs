//! Command: run every configured directive block.
use std::sync::Arc;

use anyhow::Result;

use crate::cli::{GlobalOpts, InstallOpts};
use crate::config::DirectiveBlock;
use crate::exec::{Executor, SystemExecutor};
use crate::logging::{Log, Logger, TaskStatus};
use crate::platform::Platform;
use crate::processor::DirectiveProcessor;

/// Run the install command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or any directive
/// block failed.
pub fn run(
    global: &GlobalOpts,
    opts: &InstallOpts,
    platform: Arc<Platform>,
    log: &Arc<Logger>,
) -> Result<()> {
    let version = option_env!("DOTBREW_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    log.info(&format!("dotbrew {version}"));

    let base_dir = super::resolve_base_dir(global)?;
    log.debug(&format!(
        "platform: {}, prefix {}",
        platform.os,
        platform.homebrew_prefix()
    ));

    log.stage("Loading configuration");
    let config = super::load_config(global, &base_dir)?;
    log.info(&format!(
        "loaded {} directive block(s) from {}",
        config.blocks.len(),
        config.path.display()
    ));

    let executor: Arc<dyn Executor> = Arc::new(SystemExecutor);
    let processor = DirectiveProcessor::new(
        platform,
        executor,
        Arc::clone(log) as Arc<dyn Log>,
        base_dir,
    )
    .with_dry_run(global.dry_run);

    run_blocks(&processor, &config.blocks, opts, log.as_ref());

    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} directive block(s) failed");
    }
    Ok(())
}

/// Handle every block in order, recording one task per block.
///
/// A failed block does not stop the blocks after it.
pub fn run_blocks(
    processor: &DirectiveProcessor,
    blocks: &[DirectiveBlock],
    opts: &InstallOpts,
    log: &dyn Log,
) {
    for (i, block) in blocks.iter().enumerate() {
        let name = format!("{} #{}", block.name, i + 1);

        if !opts.selects(&block.name) {
            log.debug(&format!("skipping {name}"));
            log.record_task(&name, TaskStatus::Skipped, Some("filtered"));
            continue;
        }

        log.stage(&format!("Processing {name}"));
        match processor.handle(&block.name, &block.items) {
            Ok(true) if processor.is_dry_run() => {
                log.record_task(&name, TaskStatus::DryRun, None);
            }
            Ok(true) => log.record_task(&name, TaskStatus::Ok, None),
            Ok(false) => {
                log.record_task(&name, TaskStatus::Failed, Some("stopped at first failure"));
            }
            Err(e) => {
                let msg = e.to_string();
                log.error(&msg);
                log.record_task(&name, TaskStatus::Failed, Some(&msg));
            }
        }
    }
}

//! `lathe config` command
//!
//! Lists the recognized configuration options. Hidden tuning knobs of the
//! compiler adapter are omitted unless `--all` is passed.

use anyhow::Result;

use crate::cli::{ConfigAction, ConfigArgs};
use lathe::core::manifest::find_project_manifest;
use lathe::util::config::{
    global_config_path, load_config, project_config_path, recognized_options, Config,
    OptionVisibility,
};

pub fn execute(args: ConfigArgs) -> Result<()> {
    match args.action {
        ConfigAction::List { all } => list(all),
    }
}

fn list(all: bool) -> Result<()> {
    // Works outside a project too; then only the global config applies.
    let config = match std::env::current_dir()
        .ok()
        .and_then(|cwd| find_project_manifest(&cwd).ok())
        .and_then(|manifest| manifest.parent().map(project_config_path))
    {
        Some(project) => load_config(&global_config_path(), &project),
        None => Config::load_or_default(&global_config_path()),
    };

    for opt in recognized_options() {
        if !all && opt.visibility == OptionVisibility::Hidden {
            continue;
        }

        let value = config
            .value_of(opt.key)
            .unwrap_or_else(|| "(unset)".to_string());

        println!(
            "{:<18} = {:<32} {} [{}]",
            opt.key, value, opt.summary, opt.value_hint
        );
    }

    Ok(())
}

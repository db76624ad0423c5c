//! The default (and only) command: load settings and provision.

use crate::config::load_settings;
use crate::error::Result;
use crate::provision::{Provisioner, Summary};
use crate::system::System;
use crate::ui::UserInterface;

use super::Cli;

/// Load settings for `cli` and run the provisioning pipeline.
pub fn run(cli: &Cli, system: &mut dyn System, ui: &mut dyn UserInterface) -> Result<Summary> {
    let home = system.home_dir();
    let settings = load_settings(cli.config.as_deref(), home.as_deref())?;
    tracing::debug!("Settings: {:?}", settings);

    Provisioner::new(system, ui, settings).run()
}

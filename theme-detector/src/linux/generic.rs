use super::{first_line, follow_monitor, INTERFACE_SCHEMA};
use crate::{classify::is_dark_name, watcher::WatchContext, CommandRunner, DetectorError};
use log::debug;
use std::sync::Arc;

const ICON_THEME: &str = "icon-theme";

/// Fallback for Linux desktops without a dedicated detector. Only the icon
/// theme name is looked at.
pub(crate) struct GenericLinux {
    runner: Arc<dyn CommandRunner>,
}

impl GenericLinux {
    pub(crate) fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    pub(crate) fn query(&self) -> Result<bool, DetectorError> {
        let theme = self
            .runner
            .output(&["gsettings", "get", INTERFACE_SCHEMA, ICON_THEME])?;
        Ok(is_dark_name(first_line(&theme)))
    }

    pub(crate) fn watch(&self, ctx: &mut WatchContext) -> Result<(), DetectorError> {
        follow_monitor(
            self.runner.as_ref(),
            &["gsettings", "monitor", INTERFACE_SCHEMA, ICON_THEME],
            ctx,
            |key, value, ctx| {
                if key != ICON_THEME {
                    debug!("Ignoring change of {key}");
                    return;
                }
                ctx.update(is_dark_name(value));
            },
        )
    }
}

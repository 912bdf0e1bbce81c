use super::first_line;
use crate::{classify::is_dark_name, watcher::WatchContext, CommandRunner, DetectorError};
use log::warn;
use std::{sync::Arc, time::Duration};

/// KDE Plasma detector. Plasma has no change stream we can follow so the
/// color scheme name is polled.
pub(crate) struct Kde {
    runner: Arc<dyn CommandRunner>,
    read_config: String,
    poll_interval: Duration,
}

impl Kde {
    pub(crate) fn new(
        runner: Arc<dyn CommandRunner>,
        read_config: String,
        poll_interval: Duration,
    ) -> Self {
        Self {
            runner,
            read_config,
            poll_interval,
        }
    }

    pub(crate) fn query(&self) -> Result<bool, DetectorError> {
        let scheme = self.runner.output(&[
            self.read_config.as_str(),
            "--file",
            "kdeglobals",
            "--group",
            "General",
            "--key",
            "ColorScheme",
        ])?;
        Ok(is_dark_name(first_line(&scheme)))
    }

    pub(crate) fn watch(&self, ctx: &mut WatchContext) -> Result<(), DetectorError> {
        while !ctx.cancel_token().wait(self.poll_interval) {
            match self.query() {
                Ok(dark) => {
                    ctx.update(dark);
                }
                Err(err) => warn!("Couldn't detect KDE theme: {err}"),
            }
        }
        Ok(())
    }
}

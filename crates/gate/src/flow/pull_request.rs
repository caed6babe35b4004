use super::{Gate, RunReport};
use crate::config::CommentStrategy;
use crate::error::Result;
use crate::reactions::react_to_acknowledgements;

impl Gate {
    pub(super) async fn on_pull_request(&self, number: u64, head_sha: &str) -> Result<RunReport> {
        let outcome = self.check.check(head_sha, &[number]).await?;

        // Comments re-ran this run with `eyes`; close them out with the verdict.
        if self.config().comments.strategy == CommentStrategy::Rerun {
            match react_to_acknowledgements(self.host.as_ref(), number, &self.pattern, &outcome)
                .await
            {
                Ok(0) => {}
                Ok(count) => log::info!("CLA: {head_sha} Reacted to {count} comment(s)"),
                Err(err) => log::warn!("CLA: {head_sha} Failed to react to comments: {err}"),
            }
        }

        log::info!("CLA: {head_sha} Done");
        Ok(RunReport::Checked(outcome))
    }
}

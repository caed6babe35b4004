use super::{Gate, RunReport};
use crate::error::{GateError, Result};
use crate::event::EventContext;
use crate::message;
use cla_protocol::ReactionKind;

impl Gate {
    /// Restarts the last pull request run when it failed, or confirms it when it passed.
    pub(super) async fn on_comment_rerun(
        &self,
        ctx: &EventContext,
        number: u64,
        comment_id: u64,
    ) -> Result<RunReport> {
        let Some(workflow) = self.host.find_workflow_by_name(&ctx.workflow).await? else {
            self.post_restart_instructions(number).await;
            return Err(GateError::WorkflowNotFound(ctx.workflow.clone()));
        };

        let event = self.config().comments.workflow_event.as_str();
        let runs = self
            .host
            .list_workflow_runs(number, workflow.id, event)
            .await?;
        let Some(last_run) = runs.into_iter().next() else {
            self.post_restart_instructions(number).await;
            return Err(GateError::NoPriorRunFound {
                workflow_id: workflow.id,
            });
        };

        let run = self.host.get_workflow_run(last_run.id).await?;
        if !run.has_failed() {
            log::info!("CLA: Recent workflow run was successful (cla signed), aborting...");
            self.react(comment_id, ReactionKind::PlusOne).await;
            return Ok(RunReport::AlreadyPassing { run_id: run.id });
        }

        self.react(comment_id, ReactionKind::Eyes).await;
        log::info!("CLA: Restarting workflow to check the endpoint status");
        match self.host.rerun_workflow(run.id).await {
            Ok(()) => Ok(RunReport::Retriggered { run_id: run.id }),
            Err(source) => {
                let err = GateError::RerunFailed {
                    run_id: run.id,
                    source,
                };
                log::error!("CLA: {err}");
                self.post_restart_instructions(number).await;
                Ok(RunReport::RerunFailed {
                    run_id: run.id,
                    error: err.to_string(),
                })
            }
        }
    }

    /// Runs the full check straight from the comment event.
    pub(super) async fn on_comment_recheck(
        &self,
        ctx: &EventContext,
        number: u64,
    ) -> Result<RunReport> {
        let head = self.host.get_pull_request(number).await?;
        log::info!(
            "CLA: {} Triggered \"{}\" hook",
            head.sha,
            ctx.qualified_name()
        );
        let outcome = self.check.check(&head.sha, &[head.number]).await?;
        log::info!("CLA: {} Done", head.sha);
        Ok(RunReport::Checked(outcome))
    }

    async fn react(&self, comment_id: u64, kind: ReactionKind) {
        log::info!("CLA: Adding comment reaction");
        if let Err(err) = self.host.add_reaction(comment_id, kind).await {
            log::warn!("CLA: Failed to add {kind} reaction to comment {comment_id}: {err}");
        }
    }

    async fn post_restart_instructions(&self, number: u64) {
        let body = message::restart_workflow(self.config());
        if let Err(err) = self.host.add_comment(number, &body).await {
            log::warn!("CLA: Failed to post restart instructions on #{number}: {err}");
        }
    }
}

use teloxide::{prelude::ResponseResult, types::ChatId};

use crate::{
    application::ApplicationStatus,
    menus::review::{not_a_reviewer, render_pending_list},
    storages::Applicant,
    target::ReplyTarget,
};

/// Reviewer only: applications that are still waiting for a decision
pub async fn command_pending(target: &ReplyTarget) -> ResponseResult<()> {
    if !target.is_admin() {
        target.send(not_a_reviewer()).await?;
        return Ok(());
    }
    let applicants = match target.applicants().list_applicants().await {
        Ok(applicants) => applicants,
        Err(e) => return target.report_error(e).await,
    };
    let mut pending: Vec<(ChatId, Applicant)> = applicants
        .into_iter()
        .filter(|(_, applicant)| applicant.data.status == Some(ApplicationStatus::Pending))
        .collect();
    pending.sort_by_key(|(chat_id, _)| chat_id.0);
    target.send(render_pending_list(&pending)).await?;
    Ok(())
}

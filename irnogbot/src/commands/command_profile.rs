use teloxide::prelude::ResponseResult;

use crate::{menus::profile::show_profile, target::ReplyTarget};

pub async fn command_profile(target: &ReplyTarget) -> ResponseResult<()> {
    show_profile(target).await
}

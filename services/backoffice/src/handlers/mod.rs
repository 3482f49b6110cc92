pub mod admin;
pub mod auth;
pub mod dashboard;
pub mod guard;

use crate::infra::sessions::SessionEntry;
use crate::state::AppState;
use crate::usecase::session::SessionContext;

pub(crate) fn now_secs() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default()
}

/// Restore the context against the provider if it has not settled yet or a
/// slot's token has expired. The caller holds the context lock.
pub(crate) async fn settle(state: &AppState, entry: &SessionEntry, ctx: &mut SessionContext) {
    let now = now_secs();
    if ctx.needs_restore(now) {
        let _restoring = entry.begin_restore();
        state.session_gate().initialize(ctx, now).await;
    }
}

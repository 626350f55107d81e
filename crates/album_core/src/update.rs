use crate::{Effect, Msg, PagingState, Phase, StopReason};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: PagingState, msg: Msg) -> (PagingState, Vec<Effect>) {
    let effects = match msg {
        Msg::Start => {
            if state.phase() != Phase::Idle {
                return (state, Vec::new());
            }
            let last_rank = state.start();
            vec![Effect::FetchPage { last_rank }]
        }
        Msg::PageReceived(page) => {
            if state.phase() != Phase::Fetching {
                return (state, Vec::new());
            }
            if page.posts.is_empty() {
                state.record_page(&page.posts);
                state.finish(StopReason::EmptyPage);
                return (state, vec![Effect::Finish(StopReason::EmptyPage)]);
            }

            let mut effects = Vec::with_capacity(4);
            if let Some(label) = state.resolve_label(&page.posts[0]) {
                effects.push(Effect::ResolveTarget(label));
            }
            state.record_page(&page.posts);
            effects.push(Effect::AppendPosts(page.posts));

            if page.has_more {
                let last_rank = state.next_request();
                effects.push(Effect::Pause);
                effects.push(Effect::FetchPage { last_rank });
            } else {
                state.finish(StopReason::Exhausted);
                effects.push(Effect::Finish(StopReason::Exhausted));
            }
            effects
        }
        Msg::StepFailed => {
            // A write can still fail after the final page was accepted.
            if state.phase() == Phase::Finished(StopReason::Failed) {
                return (state, Vec::new());
            }
            state.finish(StopReason::Failed);
            vec![Effect::Finish(StopReason::Failed)]
        }
    };

    (state, effects)
}

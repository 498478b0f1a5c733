#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use interaction_nats::MockPublisher;
    use interaction_types::{
        ActionRow, Button, ButtonStyle, ComponentActivatedEvent, ComponentType, EventMetadata,
        InteractionRef, Layout, Requester,
    };

    use crate::completion::{CompletionHandle, CompletionState};
    use crate::dispatch::{ComponentDispatcher, DEFAULT_STALE_NOTICE};
    use crate::registry::{Resolution, WaiterRegistry};
    use crate::surface::NatsLayoutSurface;
    use crate::waiter::{accept_all, requester_is};

    const UPDATE: &str = "interaction.test.agent.layout.update";
    const NOTICE: &str = "interaction.test.agent.notice.ephemeral";

    fn visible_layout() -> Layout {
        Layout::Many(vec![
            Layout::Row(ActionRow::new([
                Button::new("yes", ButtonStyle::Success).into(),
                Button::new("no", ButtonStyle::Danger).into(),
            ])),
            Layout::Single(Button::new("yes", ButtonStyle::Success).into()),
        ])
    }

    fn event(custom_id: &str, user: u64, layout: Option<Layout>) -> ComponentActivatedEvent {
        ComponentActivatedEvent {
            metadata: EventMetadata::new(1),
            interaction: InteractionRef {
                interaction_id: 77,
                interaction_token: "tok".to_string(),
            },
            guild_id: Some(5),
            channel_id: 10,
            message_id: 20,
            requester: Requester {
                id: user,
                username: format!("user{}", user),
            },
            custom_id: custom_id.to_string(),
            component_type: ComponentType::Button,
            values: vec![],
            visible_layout: layout,
        }
    }

    fn dispatcher() -> (
        ComponentDispatcher<NatsLayoutSurface<MockPublisher>>,
        Arc<WaiterRegistry<ComponentActivatedEvent>>,
        MockPublisher,
    ) {
        let mock = MockPublisher::new("test");
        let registry = Arc::new(WaiterRegistry::new());
        let dispatcher =
            ComponentDispatcher::new(Arc::clone(&registry), NatsLayoutSurface::new(mock.clone()));
        (dispatcher, registry, mock)
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_resolved_event_touches_no_ui() {
        let (dispatcher, registry, mock) = dispatcher();
        let handle = CompletionHandle::new();
        registry.register(ids(&["yes", "no"]), handle.clone(), requester_is(1));

        let ev = event("no", 1, Some(visible_layout()));
        assert_eq!(dispatcher.dispatch(ev.clone()).await, Resolution::Resolved);

        assert_eq!(handle.state(), CompletionState::Resolved(ev));
        assert!(registry.lookup("yes").is_none());
        assert!(mock.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_control_on_visible_message_is_disabled() {
        let (dispatcher, _registry, mock) = dispatcher();

        let resolution = dispatcher
            .dispatch(event("yes", 1, Some(visible_layout())))
            .await;
        assert_eq!(resolution, Resolution::Unknown);

        let updates = mock.messages_on(UPDATE);
        assert_eq!(updates.len(), 1);
        let layout: Layout = serde_json::from_value(updates[0]["layout"].clone()).unwrap();
        let mut expected = visible_layout();
        assert_eq!(expected.disable_matching("yes"), 2);
        assert_eq!(layout, expected);
        assert_eq!(updates[0]["message"]["message_id"], 20);
        assert_eq!(updates[0]["interaction"]["interaction_id"], 77);

        let notices = mock.messages_on(NOTICE);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0]["content"], DEFAULT_STALE_NOTICE);
        assert_eq!(notices[0]["destination"]["interaction"]["interaction_token"], "tok");
    }

    #[tokio::test]
    async fn test_unknown_control_on_ephemeral_message_only_notifies() {
        let (dispatcher, _registry, mock) = dispatcher();

        dispatcher.dispatch(event("yes", 1, None)).await;

        assert!(mock.messages_on(UPDATE).is_empty());
        assert_eq!(mock.messages_on(NOTICE).len(), 1);
    }

    #[tokio::test]
    async fn test_predicate_rejection_degrades_but_keeps_waiter() {
        let (dispatcher, registry, mock) = dispatcher();
        let handle = CompletionHandle::new();
        registry.register(ids(&["yes", "no"]), handle.clone(), requester_is(1));

        let resolution = dispatcher
            .dispatch(event("yes", 2, Some(visible_layout())))
            .await;
        assert_eq!(resolution, Resolution::Rejected);
        assert!(!handle.is_complete());
        assert!(registry.lookup("yes").is_some());
        assert_eq!(mock.messages_on(UPDATE).len(), 1);

        let resolution = dispatcher.dispatch(event("yes", 1, None)).await;
        assert_eq!(resolution, Resolution::Resolved);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_second_activation_after_resolution_degrades() {
        let (dispatcher, registry, mock) = dispatcher();
        let handle = CompletionHandle::new();
        registry.register(ids(&["yes", "no"]), handle.clone(), accept_all());

        let first = event("yes", 1, None);
        dispatcher.dispatch(first.clone()).await;
        let resolution = dispatcher.dispatch(event("no", 2, None)).await;

        assert_eq!(resolution, Resolution::Unknown);
        assert_eq!(handle.state(), CompletionState::Resolved(first));
        assert_eq!(mock.messages_on(NOTICE).len(), 1);
    }

    #[tokio::test]
    async fn test_stale_entry_is_cleaned_and_degraded() {
        let (dispatcher, registry, mock) = dispatcher();
        let handle = CompletionHandle::new();
        registry.register(ids(&["yes"]), handle.clone(), accept_all());
        handle
            .reject(crate::error::WaitError::Timeout(std::time::Duration::from_secs(1)))
            .unwrap();

        let resolution = dispatcher.dispatch(event("yes", 1, None)).await;
        assert_eq!(resolution, Resolution::Stale);
        assert!(registry.is_empty());
        assert_eq!(mock.messages_on(NOTICE).len(), 1);
    }

    #[tokio::test]
    async fn test_delivery_failures_are_swallowed() {
        let (dispatcher, registry, mock) = dispatcher();
        mock.fail_publishes(true);

        let resolution = dispatcher
            .dispatch(event("yes", 1, Some(visible_layout())))
            .await;
        assert_eq!(resolution, Resolution::Unknown);
        assert!(registry.is_empty());
        assert!(mock.is_empty());
    }

    #[tokio::test]
    async fn test_custom_notice_text() {
        let (dispatcher, _registry, mock) = dispatcher();
        let dispatcher = dispatcher.with_notice("expired");

        dispatcher.dispatch(event("gone", 1, None)).await;

        assert_eq!(mock.messages_on(NOTICE)[0]["content"], "expired");
    }
}

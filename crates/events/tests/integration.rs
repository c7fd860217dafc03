//! Integration tests for the event channel

#[cfg(test)]
mod tests {
    use hcb_events::*;

    #[tokio::test]
    async fn test_phase_events_arrive_in_order() {
        let (tx, mut rx) = channel();
        tx.emit_phase("project-a", BuildPhase::Idle, BuildPhase::MetadataCollected);
        tx.emit_warning("marker dropped");
        drop(tx);

        match rx.recv().await {
            Some(AppEvent::Build(BuildEvent::PhaseChanged { package, from, to })) => {
                assert_eq!(package, "project-a");
                assert_eq!(from, BuildPhase::Idle);
                assert_eq!(to, BuildPhase::MetadataCollected);
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(matches!(
            rx.recv().await,
            Some(AppEvent::General(GeneralEvent::Warning { .. }))
        ));
        assert!(rx.recv().await.is_none());
    }

    #[test]
    fn test_emit_without_listener_is_silent() {
        let sender: Option<EventSender> = None;
        sender.emit_debug("nobody hears this");

        let (tx, rx) = channel();
        drop(rx);
        tx.emit_debug("receiver already gone");
    }

    #[test]
    fn test_event_serialization_uses_snake_case_phases() {
        let event = AppEvent::Build(BuildEvent::PhaseChanged {
            package: "project-a".into(),
            from: BuildPhase::RecipeWritten,
            to: BuildPhase::ExternalBuildRunning,
        });
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"external_build_running\""));
        assert!(json.contains("\"domain\":\"build\""));
    }
}

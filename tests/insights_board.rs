mod common;

use std::sync::Arc;

use common::ScriptedGateway;
use noah_dashboard::core::{AgentState, InsightsPanel, Notifier};

async fn wait_until(check: impl Fn() -> bool) {
    while !check() {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn stored_summary_landing_mid_generation_is_dropped() {
    let gateway = Arc::new(ScriptedGateway::default().with_stored_summary(4, "old stored summary"));
    let release_stored = gateway.hold_summary(4);
    let release_generation = gateway.hold_generation(4);
    let panel = Arc::new(InsightsPanel::new(gateway.clone(), Notifier::default(), 1));

    let showing = tokio::spawn({
        let panel = panel.clone();
        async move { panel.show_patient(4).await }
    });
    wait_until(|| gateway.summary_calls() == vec![4]).await;

    let generating = tokio::spawn({
        let panel = panel.clone();
        async move { panel.generate().await }
    });
    wait_until(|| gateway.generate_calls() == vec![4]).await;
    assert_eq!(panel.snapshot().state, AgentState::Working);

    release_stored.send(()).unwrap();
    assert!(!showing.await.unwrap());

    let snapshot = panel.snapshot();
    assert_eq!(snapshot.state, AgentState::Working);
    assert!(snapshot.summary.is_none());

    // Still working, so another click does not reach the backend.
    panel.generate().await.unwrap();
    assert_eq!(gateway.generate_calls(), vec![4]);

    release_generation.send(()).unwrap();
    generating.await.unwrap().unwrap();

    let snapshot = panel.snapshot();
    assert_eq!(snapshot.state, AgentState::Done);
    assert_eq!(snapshot.summary.as_deref(), Some("Generated for #4"));
}

#[tokio::test]
async fn concurrent_generate_clicks_send_one_request() {
    let gateway = Arc::new(ScriptedGateway::default());
    let release = gateway.hold_generation(1);
    let panel = InsightsPanel::new(gateway.clone(), Notifier::default(), 1);

    let (first, second, _) = tokio::join!(panel.generate(), panel.generate(), async {
        release.send(()).unwrap();
    });

    assert!(first.is_ok() && second.is_ok());
    assert_eq!(gateway.generate_calls(), vec![1]);
    assert_eq!(panel.snapshot().state, AgentState::Done);
}

#[tokio::test]
async fn failed_generation_for_previous_patient_is_silent() {
    let gateway = Arc::new(
        ScriptedGateway::default()
            .with_stored_summary(2, "Patient two is stable")
            .fail_generation(1),
    );
    let release = gateway.hold_generation(1);
    let notifier = Notifier::default();
    let mut toasts = notifier.subscribe();
    let panel = Arc::new(InsightsPanel::new(gateway.clone(), notifier, 1));

    let generating = tokio::spawn({
        let panel = panel.clone();
        async move { panel.generate().await }
    });
    wait_until(|| gateway.generate_calls() == vec![1]).await;

    assert!(panel.show_patient(2).await);
    release.send(()).unwrap();
    assert!(generating.await.unwrap().is_err());

    let snapshot = panel.snapshot();
    assert_eq!(snapshot.patient_id, 2);
    assert_eq!(snapshot.state, AgentState::Done);
    assert_eq!(snapshot.summary.as_deref(), Some("Patient two is stable"));
    assert!(toasts.try_recv().is_err());
}

#[tokio::test]
async fn finished_generation_for_previous_patient_is_discarded() {
    let gateway = Arc::new(ScriptedGateway::default());
    let release = gateway.hold_generation(1);
    let panel = Arc::new(InsightsPanel::new(gateway.clone(), Notifier::default(), 1));

    let generating = tokio::spawn({
        let panel = panel.clone();
        async move { panel.generate().await }
    });
    wait_until(|| gateway.generate_calls() == vec![1]).await;

    assert!(!panel.show_patient(2).await);
    release.send(()).unwrap();
    generating.await.unwrap().unwrap();

    let snapshot = panel.snapshot();
    assert_eq!(snapshot.patient_id, 2);
    assert_eq!(snapshot.state, AgentState::Idle);
    assert!(snapshot.summary.is_none());
}

//! End-to-end checks of the login/registration submission contract.

use std::time::{Duration, Instant};

use lb_auth::{
    password_hint, validate_login, validate_registration, Credentials, FlowState, PasswordHint,
    SubmitFlow, ValidationError,
};
use tests::{fake_server, quiet, unreachable_server};

#[tokio::test]
async fn short_username_is_rejected_before_any_network() {
    quiet();
    let creds = Credentials::login("ab", "pw");
    let error = validate_login(&creds).unwrap_err();
    assert_eq!(error, ValidationError::UsernameLength);

    let mut flow = SubmitFlow::login();
    flow.reject(&error);
    assert_eq!(flow.state(), FlowState::Idle);
    assert!(flow.is_submit_enabled());
}

#[tokio::test]
async fn bad_email_is_rejected_before_any_network() {
    let creds = Credentials::register("valid_1", "pw", "not-an-email");
    assert_eq!(
        validate_registration(&creds, "pw"),
        Err(ValidationError::EmailFormat)
    );
}

#[tokio::test]
async fn server_rejection_reenables_controls() {
    quiet();
    let mut flow = SubmitFlow::register();
    let enabled_before = flow.is_submit_enabled();

    let state = flow
        .submit(fake_server(Duration::from_millis(10), false, "user exists"))
        .await;

    assert_eq!(state, FlowState::Failure);
    assert_eq!(flow.status(), "user exists");
    assert_eq!(flow.is_submit_enabled(), enabled_before);
}

#[tokio::test]
async fn quick_success_with_long_timeout_closes_after_delay() {
    quiet();
    // Server answers in 200 ms, well inside the 60 s budget; the dialog
    // then closes after the configured user-visible delay.
    let close_delay = Duration::from_millis(50);
    let mut flow = SubmitFlow::with_timing(Duration::from_secs(60), close_delay);

    let state = flow
        .submit(fake_server(Duration::from_millis(200), true, "ok"))
        .await;
    assert_eq!(state, FlowState::Success);
    assert_eq!(flow.status(), "ok");
    assert!(flow.is_submit_enabled());

    let before = Instant::now();
    assert!(flow.finish().await);
    assert!(before.elapsed() >= close_delay);
    assert_eq!(flow.state(), FlowState::Closing);
}

#[tokio::test]
async fn timeout_wins_and_is_never_overwritten() {
    quiet();
    let mut flow = SubmitFlow::with_timing(Duration::from_millis(30), Duration::from_millis(10));

    let state = flow
        .submit(fake_server(Duration::from_millis(120), true, "late yes"))
        .await;
    assert_eq!(state, FlowState::TimedOut);

    // Let the losing branch resolve; the flow must not change its mind.
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(flow.state(), FlowState::TimedOut);
    assert_ne!(flow.status(), "late yes");
}

#[tokio::test]
async fn transport_failure_is_an_error_not_a_rejection() {
    quiet();
    let mut flow = SubmitFlow::login();
    let state = flow.submit(unreachable_server()).await;
    assert_eq!(state, FlowState::Errored);
    assert!(flow.is_submit_enabled());
}

#[tokio::test]
async fn exactly_one_outcome_per_submission() {
    quiet();
    for (delay, success) in [(5u64, true), (5, false), (120, true)] {
        let mut flow =
            SubmitFlow::with_timing(Duration::from_millis(40), Duration::from_millis(5));
        let state = flow
            .submit(fake_server(Duration::from_millis(delay), success, "msg"))
            .await;
        // The flow settles in exactly one of the four resolution states.
        assert!(matches!(
            state,
            FlowState::Success | FlowState::Failure | FlowState::TimedOut | FlowState::Errored
        ));
        assert_eq!(flow.state(), state);
    }
}

#[test]
fn password_hint_table() {
    assert_eq!(password_hint("", ""), PasswordHint::Empty);
    assert_eq!(password_hint("secret", ""), PasswordHint::Prompt);
    assert_eq!(password_hint("secret", "secret"), PasswordHint::Match);
    assert_eq!(password_hint("secret", "secre"), PasswordHint::Mismatch);
}

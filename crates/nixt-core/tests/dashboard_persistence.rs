use nixt_core::dashboard::{GrantRole, LoginOutcome, NewAllowedUser};
use nixt_core::{AppCore, NixtConfig};
use tempfile::TempDir;

fn config_for(dir: &TempDir) -> NixtConfig {
    let mut config = NixtConfig::default();
    config.storage.db_path = Some(dir.path().join("nixt.db").to_string_lossy().to_string());
    config
}

#[tokio::test]
async fn test_grants_and_session_survive_restart() {
    let dir = TempDir::new().unwrap();
    let config = config_for(&dir);

    {
        let core = AppCore::new(config.clone()).await.unwrap();
        core.sessions
            .add_allowed_user(
                NewAllowedUser::new("lead@example.com", "Lead", GrantRole::Manager)
                    .with_sections(["projects", "clients"]),
            )
            .unwrap();
        core.sessions
            .add_allowed_user(NewAllowedUser::new("lead@example.com", "Lead", GrantRole::Viewer))
            .unwrap();

        let outcome = core.sessions.login_to_dashboard("lead@example.com").unwrap();
        assert_eq!(outcome.message(), LoginOutcome::MULTIPLE_ROLES);

        let outcome = core
            .sessions
            .login_to_dashboard_with_role("lead@example.com", GrantRole::Manager)
            .unwrap();
        assert!(outcome.is_success());
    }

    let core = AppCore::new(config).await.unwrap();
    let session = core.sessions.session().expect("session restored");
    assert_eq!(session.role, GrantRole::Manager);
    assert!(session.can_see("clients"));
    assert_eq!(core.sessions.get_user_roles("LEAD@example.com").len(), 2);

    // Revoking the other role still ends the session for that email.
    core.sessions
        .remove_allowed_user("lead@example.com", Some(GrantRole::Viewer))
        .unwrap();
    assert!(!core.sessions.is_logged_in());
}

#[tokio::test]
async fn test_expired_session_dropped_on_restart() {
    let dir = TempDir::new().unwrap();
    let mut config = config_for(&dir);
    config.dashboard.session_ttl_hours = 0;

    {
        let core = AppCore::new(config.clone()).await.unwrap();
        core.sessions
            .add_allowed_user(NewAllowedUser::new("a@example.com", "A", GrantRole::Client))
            .unwrap();
        assert!(core.sessions.login_to_dashboard("a@example.com").unwrap().is_success());
    }

    let core = AppCore::new(config).await.unwrap();
    assert!(core.sessions.session().is_none());
    assert!(core.sessions.is_email_allowed("a@example.com"));
}

use std::sync::{Arc, Mutex};

use campus_adapters::{
    crypto::{Argon2PasswordHasher, JwtConfig, JwtTokenSigner},
    email::MockEmailClient,
    persistence::{HashMapRecordStore, HashMapResetTicketStore},
};
use campus_application::{Attributes, LoginError, RegisterError, ResetError};
use campus_core::{Clock, Role, TokenSigner};
use campus_identity_service::IdentityService;
use chrono::{DateTime, Duration, Utc};
use secrecy::Secret;

#[derive(Clone)]
struct TestClock(Arc<Mutex<DateTime<Utc>>>);

impl TestClock {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(Utc::now())))
    }

    fn advance(&self, by: Duration) {
        *self.0.lock().unwrap() += by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

type TestService = IdentityService<
    HashMapRecordStore,
    HashMapResetTicketStore,
    MockEmailClient,
    JwtTokenSigner,
    Argon2PasswordHasher,
    TestClock,
>;

struct TestApp {
    service: TestService,
    signer: JwtTokenSigner,
    email_client: MockEmailClient,
    clock: TestClock,
}

impl TestApp {
    fn new() -> Self {
        let signer = JwtTokenSigner::new(JwtConfig {
            jwt_secret: Secret::from("test-secret".to_string()),
            token_ttl_in_seconds: 600,
        });
        let email_client = MockEmailClient::new();
        let clock = TestClock::new();
        let service = IdentityService::new(
            HashMapRecordStore::new(),
            HashMapResetTicketStore::new(),
            email_client.clone(),
            signer.clone(),
        )
        .with_clock(clock.clone());

        Self {
            service,
            signer,
            email_client,
            clock,
        }
    }

    async fn register_student(
        &self,
        id: &str,
        email: &str,
        password: &str,
    ) -> Result<Role, RegisterError> {
        let token = self
            .service
            .register("student", student(id, email, password))
            .await?;
        Ok(self.signer.verify(token.as_str()).unwrap().role)
    }

    async fn login(&self, role: &str, identifier: &str, password: &str) -> Result<(), LoginError> {
        self.service
            .login(role, identifier, secret(password))
            .await
            .map(|_| ())
    }

    async fn last_code_for(&self, email: &str) -> String {
        let mail = self
            .email_client
            .last_sent_to(email)
            .await
            .expect("a reset email was sent");
        mail.content
            .split(|c: char| !c.is_ascii_digit())
            .find(|word| word.len() == 6)
            .expect("the email contains a six digit code")
            .to_string()
    }
}

fn secret(s: &str) -> Secret<String> {
    Secret::from(s.to_string())
}

fn attributes(pairs: &[(&str, &str)]) -> Attributes {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn student(id: &str, email: &str, password: &str) -> Attributes {
    attributes(&[
        ("student_id", id),
        ("student_email", email),
        ("password", password),
        ("full_name", "Ada Lovelace"),
    ])
}

fn professor(id: &str, email: &str, password: &str) -> Attributes {
    attributes(&[
        ("professor_id", id),
        ("professor_email", email),
        ("password", password),
        ("full_name", "Grace Hopper"),
        ("department", "Computer Science"),
    ])
}

#[tokio::test]
async fn test_register_login_and_reset_scenario() {
    let app = TestApp::new();

    let role = app
        .register_student("123456789", "a@u.edu", "secret1")
        .await
        .unwrap();
    assert_eq!(role, Role::Student);

    let duplicate = app
        .service
        .register("professor", professor("123456789", "prof@u.edu", "secret1"))
        .await;
    assert!(matches!(duplicate, Err(RegisterError::IdAlreadyExists)));

    let wrong = app.login("student", "a@u.edu", "wrong").await;
    assert!(matches!(wrong, Err(LoginError::InvalidCredentials)));

    app.service.request_reset("a@u.edu").await.unwrap();
    let code = app.last_code_for("a@u.edu").await;
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit()));

    let wrong_code = if code == "000000" { "111111" } else { "000000" };
    let mismatch = app.service.verify_reset_code("a@u.edu", wrong_code).await;
    assert!(matches!(mismatch, Err(ResetError::CodeMismatch)));

    app.service.verify_reset_code("a@u.edu", &code).await.unwrap();
    app.service
        .reset_password("a@u.edu", &code, secret("abcdef"))
        .await
        .unwrap();

    assert!(matches!(
        app.login("student", "a@u.edu", "secret1").await,
        Err(LoginError::InvalidCredentials)
    ));
    app.login("student", "a@u.edu", "abcdef").await.unwrap();
    app.login("student", "123456789", "abcdef").await.unwrap();

    let replay = app.service.verify_reset_code("a@u.edu", &code).await;
    assert!(matches!(replay, Err(ResetError::NoSuchTicket)));
}

#[tokio::test]
async fn test_email_is_unique_per_role_only() {
    let app = TestApp::new();

    app.register_student("111111111", "shared@u.edu", "secret1")
        .await
        .unwrap();

    let same_role = app
        .register_student("222222222", "Shared@U.edu", "secret1")
        .await;
    assert!(matches!(same_role, Err(RegisterError::EmailAlreadyExists)));

    app.service
        .register("professor", professor("333333333", "shared@u.edu", "secret1"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new();
    app.register_student("123456789", "a@u.edu", "secret1")
        .await
        .unwrap();

    let wrong_password = app.login("student", "a@u.edu", "nope").await.unwrap_err();
    let unknown_email = app
        .login("student", "nobody@u.edu", "secret1")
        .await
        .unwrap_err();

    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    assert!(!wrong_password.is_retryable());
}

#[tokio::test]
async fn test_code_expires_after_fifteen_minutes() {
    let app = TestApp::new();
    app.register_student("123456789", "a@u.edu", "secret1")
        .await
        .unwrap();

    app.service.request_reset("a@u.edu").await.unwrap();
    let code = app.last_code_for("a@u.edu").await;

    app.clock.advance(Duration::minutes(15) - Duration::seconds(1));
    app.service.verify_reset_code("a@u.edu", &code).await.unwrap();

    app.clock.advance(Duration::seconds(1));
    let expired = app.service.verify_reset_code("a@u.edu", &code).await;
    assert!(matches!(expired, Err(ResetError::TicketExpired)));

    let gone = app.service.verify_reset_code("a@u.edu", &code).await;
    assert!(matches!(gone, Err(ResetError::NoSuchTicket)));
}

#[tokio::test]
async fn test_new_request_invalidates_previous_code() {
    let app = TestApp::new();
    app.register_student("123456789", "a@u.edu", "secret1")
        .await
        .unwrap();

    app.service.request_reset("a@u.edu").await.unwrap();
    let first = app.last_code_for("a@u.edu").await;
    let mut second = first.clone();
    // Codes are random; retry until the new one differs.
    while second == first {
        app.service.request_reset("a@u.edu").await.unwrap();
        second = app.last_code_for("a@u.edu").await;
    }

    let stale = app.service.verify_reset_code("a@u.edu", &first).await;
    assert!(matches!(stale, Err(ResetError::CodeMismatch)));
    app.service.verify_reset_code("a@u.edu", &second).await.unwrap();
}

#[tokio::test]
async fn test_reset_request_for_unknown_or_malformed_email_is_acknowledged() {
    let app = TestApp::new();

    app.service.request_reset("ghost@u.edu").await.unwrap();
    app.service.request_reset("not an email").await.unwrap();

    assert!(app.email_client.sent().await.is_empty());
    assert!(matches!(
        app.service.verify_reset_code("not an email", "123456").await,
        Err(ResetError::NoSuchTicket)
    ));
}

#[tokio::test]
async fn test_weak_password_is_rejected_after_ticket_checks() {
    let app = TestApp::new();
    app.register_student("123456789", "a@u.edu", "secret1")
        .await
        .unwrap();

    let no_ticket = app
        .service
        .reset_password("a@u.edu", "123456", secret(""))
        .await;
    assert!(matches!(no_ticket, Err(ResetError::NoSuchTicket)));

    app.service.request_reset("a@u.edu").await.unwrap();
    let code = app.last_code_for("a@u.edu").await;

    for weak in ["", "abc", "abcde"] {
        let result = app
            .service
            .reset_password("a@u.edu", &code, secret(weak))
            .await;
        assert!(
            matches!(result, Err(ResetError::WeakPassword { min_length: 6 })),
            "{weak:?}"
        );
    }

    // The ticket survives weak attempts.
    app.service.verify_reset_code("a@u.edu", &code).await.unwrap();
}

#[tokio::test]
async fn test_reset_targets_the_role_that_owns_the_email() {
    let app = TestApp::new();
    app.service
        .register("professor", professor("987654321", "prof@u.edu", "secret1"))
        .await
        .unwrap();

    app.service.request_reset("PROF@u.edu").await.unwrap();
    let code = app.last_code_for("prof@u.edu").await;
    app.service
        .reset_password("prof@u.edu", &code, secret("new-password"))
        .await
        .unwrap();

    app.login("professor", "prof@u.edu", "new-password")
        .await
        .unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registrations_of_one_id_admit_a_single_role() {
    let app = TestApp::new();

    let (as_student, as_professor) = tokio::join!(
        app.service
            .register("student", student("123456789", "s@u.edu", "secret1")),
        app.service
            .register("professor", professor("123456789", "p@u.edu", "secret1")),
    );

    let outcomes = [as_student.map(|_| ()), as_professor.map(|_| ())];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        outcomes
            .iter()
            .any(|r| matches!(r, Err(RegisterError::IdAlreadyExists)))
    );

    let logins = [
        app.login("student", "123456789", "secret1").await.is_ok(),
        app.login("professor", "123456789", "secret1").await.is_ok(),
    ];
    assert_eq!(logins.iter().filter(|ok| **ok).count(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resets_with_one_code_change_the_password_once() {
    let app = TestApp::new();
    app.register_student("123456789", "a@u.edu", "secret1")
        .await
        .unwrap();
    app.service.request_reset("a@u.edu").await.unwrap();
    let code = app.last_code_for("a@u.edu").await;

    let (first, second) = tokio::join!(
        app.service
            .reset_password("a@u.edu", &code, secret("first-pw")),
        app.service
            .reset_password("a@u.edu", &code, secret("second-pw")),
    );

    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        outcomes
            .iter()
            .any(|r| matches!(r, Err(ResetError::NoSuchTicket)))
    );

    let winner = if outcomes[0].is_ok() { "first-pw" } else { "second-pw" };
    let loser = if outcomes[0].is_ok() { "second-pw" } else { "first-pw" };
    app.login("student", "a@u.edu", winner).await.unwrap();
    assert!(matches!(
        app.login("student", "a@u.edu", loser).await,
        Err(LoginError::InvalidCredentials)
    ));
}

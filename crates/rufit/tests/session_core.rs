//! Session core tests against an in-process [`AuthApi`].
//!
//! The fake API records every call, so these tests can count refreshes and
//! expiry checks exactly without a mock server.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::join_all;
use rufit::error::{AuthError, Error, TransportError};
use rufit::session::{RefreshCoordinator, TokenValidator, TokenVault};
use rufit::{
    AccessToken, AuthApi, CredentialStore, Credentials, MemoryStore, RefreshOutcome,
    RefreshToken, Registration, SessionGate, SessionState, TokenPair,
};

#[derive(Clone, Copy)]
enum Expiry {
    Valid,
    Expired,
    Unreachable,
}

#[derive(Clone, Copy)]
enum RefreshReply {
    Rotate,
    Reject,
    Unavailable,
}

struct FakeApi {
    expiry: Expiry,
    reply: RefreshReply,
    delay: Duration,
    expiry_checks: AtomicUsize,
    refreshes: AtomicUsize,
    logins: AtomicUsize,
    registrations: AtomicUsize,
}

impl FakeApi {
    fn new(expiry: Expiry, reply: RefreshReply) -> Self {
        Self {
            expiry,
            reply,
            delay: Duration::from_millis(50),
            expiry_checks: AtomicUsize::new(0),
            refreshes: AtomicUsize::new(0),
            logins: AtomicUsize::new(0),
            registrations: AtomicUsize::new(0),
        }
    }

    fn expiry_checks(&self) -> usize {
        self.expiry_checks.load(Ordering::SeqCst)
    }

    fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    fn logins(&self) -> usize {
        self.logins.load(Ordering::SeqCst)
    }

    fn registrations(&self) -> usize {
        self.registrations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthApi for FakeApi {
    async fn register(&self, _registration: &Registration) -> rufit::Result<String> {
        self.registrations.fetch_add(1, Ordering::SeqCst);
        Ok("User registered successfully".to_string())
    }

    async fn login(&self, _credentials: &Credentials) -> rufit::Result<TokenPair> {
        self.logins.fetch_add(1, Ordering::SeqCst);
        Ok(TokenPair::new("L1", "LR1").unwrap())
    }

    async fn refresh(&self, refresh_token: &RefreshToken) -> rufit::Result<TokenPair> {
        let n = self.refreshes.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        match self.reply {
            RefreshReply::Rotate => {
                assert!(refresh_token.as_str().starts_with('R'));
                Ok(TokenPair::new(format!("A{}", n + 1), format!("R{}", n + 1)).unwrap())
            }
            RefreshReply::Reject => Err(AuthError::RefreshRejected {
                reason: "Token has expired".to_string(),
            }
            .into()),
            RefreshReply::Unavailable => Err(Error::Transport(TransportError::Timeout)),
        }
    }

    async fn is_token_expired(&self, _access_token: &AccessToken) -> rufit::Result<bool> {
        self.expiry_checks.fetch_add(1, Ordering::SeqCst);
        match self.expiry {
            Expiry::Valid => Ok(false),
            Expiry::Expired => Ok(true),
            Expiry::Unreachable => Err(Error::Transport(TransportError::Timeout)),
        }
    }
}

struct Harness {
    store: Arc<MemoryStore>,
    api: Arc<FakeApi>,
    vault: Arc<TokenVault>,
    refresher: Arc<RefreshCoordinator>,
    validator: Arc<TokenValidator>,
}

fn harness(store: MemoryStore, api: FakeApi) -> Harness {
    let store = Arc::new(store);
    let api = Arc::new(api);
    let vault = Arc::new(TokenVault::new(store.clone()));
    let refresher = Arc::new(RefreshCoordinator::new(vault.clone(), api.clone()));
    let validator = Arc::new(TokenValidator::new(
        vault.clone(),
        api.clone(),
        refresher.clone(),
    ));
    Harness {
        store,
        api,
        vault,
        refresher,
        validator,
    }
}

fn seeded() -> MemoryStore {
    MemoryStore::with_pair(&TokenPair::new("A1", "R1").unwrap())
}

async fn access_in(store: &MemoryStore) -> Option<String> {
    store
        .load()
        .await
        .unwrap()
        .map(|pair| pair.access().as_str().to_string())
}

#[tokio::test]
async fn concurrent_expiries_start_one_refresh() {
    let h = harness(seeded(), FakeApi::new(Expiry::Expired, RefreshReply::Rotate));
    let stale = AccessToken::new("A1");

    let outcomes = join_all((0..8).map(|_| h.refresher.refresh_expired(&stale))).await;

    assert!(outcomes.iter().all(RefreshOutcome::is_success));
    assert_eq!(h.api.refreshes(), 1);
    assert_eq!(h.refresher.cycles_started(), 1);
    assert_eq!(access_in(&h.store).await.as_deref(), Some("A2"));
}

#[tokio::test]
async fn late_caller_with_rotated_token_skips_network() {
    let h = harness(seeded(), FakeApi::new(Expiry::Expired, RefreshReply::Rotate));
    let stale = AccessToken::new("A1");

    assert!(h.refresher.refresh_expired(&stale).await.is_success());
    // The first cycle has resolved; a caller still holding A1 arrives late.
    assert!(h.refresher.refresh_expired(&stale).await.is_success());

    assert_eq!(h.api.refreshes(), 1);
    assert_eq!(h.refresher.cycles_started(), 2);
}

#[tokio::test]
async fn concurrent_validations_share_one_refresh() {
    let h = harness(seeded(), FakeApi::new(Expiry::Expired, RefreshReply::Rotate));

    let states = join_all((0..4).map(|_| h.validator.is_session_valid())).await;

    assert!(states.iter().all(|s| *s == SessionState::Authenticated));
    assert_eq!(h.api.expiry_checks(), 4);
    assert_eq!(h.api.refreshes(), 1);
}

#[tokio::test]
async fn rejected_refresh_is_shared_and_clears_store() {
    let h = harness(seeded(), FakeApi::new(Expiry::Expired, RefreshReply::Reject));
    let stale = AccessToken::new("A1");

    let outcomes = join_all((0..3).map(|_| h.refresher.refresh_expired(&stale))).await;

    for outcome in outcomes {
        assert_eq!(
            outcome,
            RefreshOutcome::Rejected {
                reason: "Token has expired".to_string()
            }
        );
    }
    assert_eq!(h.api.refreshes(), 1);
    assert_eq!(h.store.load().await.unwrap(), None);
}

#[tokio::test]
async fn unavailable_refresh_keeps_tokens() {
    let h = harness(seeded(), FakeApi::new(Expiry::Expired, RefreshReply::Unavailable));

    let outcome = h.refresher.refresh().await;

    assert!(matches!(outcome, RefreshOutcome::Failed { .. }));
    assert_eq!(access_in(&h.store).await.as_deref(), Some("A1"));
}

#[tokio::test]
async fn refresh_without_tokens_is_rejected_without_network() {
    let h = harness(MemoryStore::new(), FakeApi::new(Expiry::Valid, RefreshReply::Rotate));

    let outcome = h.refresher.refresh().await;

    assert!(matches!(outcome, RefreshOutcome::Rejected { .. }));
    assert_eq!(h.api.refreshes(), 0);
}

#[tokio::test]
async fn validator_skips_network_without_tokens() {
    let h = harness(MemoryStore::new(), FakeApi::new(Expiry::Valid, RefreshReply::Rotate));

    assert_eq!(
        h.validator.is_session_valid().await,
        SessionState::NotAuthenticated
    );
    assert_eq!(h.api.expiry_checks(), 0);
}

#[tokio::test]
async fn validator_clears_tokens_when_check_fails() {
    let h = harness(seeded(), FakeApi::new(Expiry::Unreachable, RefreshReply::Rotate));

    assert_eq!(
        h.validator.is_session_valid().await,
        SessionState::NotAuthenticated
    );
    assert_eq!(h.store.load().await.unwrap(), None);
    assert_eq!(h.api.refreshes(), 0);
}

#[tokio::test]
async fn login_during_refresh_wins() {
    let mut api = FakeApi::new(Expiry::Expired, RefreshReply::Rotate);
    api.delay = Duration::from_millis(200);
    let h = harness(seeded(), api);

    let fresh = TokenPair::new("L1", "LR1").unwrap();
    let (outcome, replaced) = tokio::join!(h.refresher.refresh(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        h.vault.replace(&fresh).await
    });

    replaced.unwrap();
    assert_eq!(outcome, RefreshOutcome::Superseded);
    assert_eq!(access_in(&h.store).await.as_deref(), Some("L1"));
}

#[tokio::test]
async fn gate_publishes_transitions() {
    let h = harness(seeded(), FakeApi::new(Expiry::Valid, RefreshReply::Rotate));
    let gate = SessionGate::new(h.validator.clone());
    let mut rx = gate.subscribe();

    assert_eq!(gate.state(), SessionState::Unknown);
    assert_eq!(gate.check().await, SessionState::Authenticated);
    assert_eq!(*rx.borrow_and_update(), SessionState::Authenticated);

    gate.mark_signed_out();
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), SessionState::NotAuthenticated);

    gate.invalidate();
    assert_eq!(gate.state(), SessionState::Unknown);
}

#[tokio::test]
async fn client_accepts_custom_api() {
    let api = Arc::new(FakeApi::new(Expiry::Valid, RefreshReply::Rotate));
    let store = Arc::new(MemoryStore::new());
    let client = rufit::Client::with_api(
        rufit::ClientConfig::default(),
        store.clone(),
        api.clone(),
    )
    .unwrap();

    client.login(&Credentials::new("alice", "pw")).await.unwrap();
    assert_eq!(client.check_session().await, SessionState::Authenticated);
    assert_eq!(api.expiry_checks(), 1);

    client.logout().await.unwrap();
    assert_eq!(client.check_session().await, SessionState::NotAuthenticated);
    assert_eq!(api.expiry_checks(), 1);
}

#[tokio::test]
async fn client_login_during_refresh_keeps_gate_authenticated() {
    let mut api = FakeApi::new(Expiry::Valid, RefreshReply::Rotate);
    api.delay = Duration::from_millis(200);
    let api = Arc::new(api);
    let store = Arc::new(seeded());
    let client = rufit::Client::with_api(
        rufit::ClientConfig::default(),
        store.clone(),
        api.clone(),
    )
    .unwrap();

    let (outcome, login) = tokio::join!(client.refresh(), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        client.login(&Credentials::new("alice", "pw")).await
    });

    login.unwrap();
    assert_eq!(outcome, RefreshOutcome::Superseded);
    assert_eq!(client.session_state(), SessionState::Authenticated);
    assert!(client.session_state().is_authenticated());
    assert_eq!(access_in(&store).await.as_deref(), Some("L1"));
}

#[tokio::test]
async fn client_rejects_empty_fields_before_calling_api() {
    let api = Arc::new(FakeApi::new(Expiry::Valid, RefreshReply::Rotate));
    let store = Arc::new(MemoryStore::new());
    let client = rufit::Client::with_api(
        rufit::ClientConfig::default(),
        store.clone(),
        api.clone(),
    )
    .unwrap();

    let err = client.login(&Credentials::new("", "")).await.unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::EmptyFields)));

    let err = client
        .register(&Registration::new("bob", ""))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Auth(AuthError::EmptyFields)));

    assert_eq!(api.logins(), 0);
    assert_eq!(api.registrations(), 0);
    assert_eq!(client.session_state(), SessionState::Unknown);
    assert!(!client.session_state().is_authenticated());
    assert_eq!(store.load().await.unwrap(), None);
}

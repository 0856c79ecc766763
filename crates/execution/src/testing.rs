//! Scripted backend double for workflow tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use traderobots_data::api::{DeploymentResponse, LoginRequest, RobotApi, SynthesisRequest};
use traderobots_data::error::{ApiError, ApiResult};
use traderobots_domain::entities::{
    ChatGroup, ChatMessage, Post, Robot, TradingAccount, UserProfile,
};
use traderobots_domain::enums::{RobotMethod, Symbol};
use traderobots_domain::value_objects::{DeploymentRequest, RobotId};

/// A registered robot with MQL5 code `// EA {id}`.
pub(crate) fn registered_robot(id: &str) -> Robot {
    Robot {
        id: RobotId::server(id),
        name: Some(format!("Bot_{id}")),
        symbol: Symbol::Eurusd.into(),
        method: RobotMethod::Winrate,
        indicators: Vec::new(),
        risk_settings: None,
        win_rate: 64.0,
        mql5_code: Some(format!("// EA {id}")),
        python_code: None,
        is_active: false,
        user_name: None,
        created_at: None,
    }
}

/// Backend double answering from queued results and counting calls.
///
/// An empty queue answers with a transport error.
#[derive(Default)]
pub(crate) struct FakeApi {
    create_results: Mutex<VecDeque<ApiResult<Robot>>>,
    deploy_results: Mutex<VecDeque<ApiResult<DeploymentResponse>>>,
    create_calls: AtomicUsize,
    deploy_calls: AtomicUsize,
    other_calls: AtomicUsize,
    last_create: Mutex<Option<SynthesisRequest>>,
    last_deploy: Mutex<Option<(RobotId, DeploymentRequest)>>,
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_create(&self, result: ApiResult<Robot>) {
        self.create_results.lock().unwrap().push_back(result);
    }

    pub(crate) fn push_deploy(&self, result: ApiResult<DeploymentResponse>) {
        self.deploy_results.lock().unwrap().push_back(result);
    }

    pub(crate) fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn deploy_calls(&self) -> usize {
        self.deploy_calls.load(Ordering::SeqCst)
    }

    /// Total calls of any kind.
    pub(crate) fn calls(&self) -> usize {
        self.create_calls() + self.deploy_calls() + self.other_calls.load(Ordering::SeqCst)
    }

    fn unscripted_call<T>(&self) -> ApiResult<T> {
        self.other_calls.fetch_add(1, Ordering::SeqCst);
        unscripted()
    }

    pub(crate) fn last_create(&self) -> Option<SynthesisRequest> {
        self.last_create.lock().unwrap().clone()
    }

    pub(crate) fn last_deploy(&self) -> Option<(RobotId, DeploymentRequest)> {
        self.last_deploy.lock().unwrap().clone()
    }
}

fn unscripted<T>() -> ApiResult<T> {
    Err(ApiError::Transport("no scripted response".to_string()))
}

#[async_trait]
impl RobotApi for FakeApi {
    async fn create_strategy(&self, request: &SynthesisRequest) -> ApiResult<Robot> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_create.lock().unwrap() = Some(request.clone());
        let next = self.create_results.lock().unwrap().pop_front();
        next.unwrap_or_else(unscripted)
    }

    async fn deploy_robot(
        &self,
        robot_id: &RobotId,
        request: &DeploymentRequest,
    ) -> ApiResult<DeploymentResponse> {
        self.deploy_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_deploy.lock().unwrap() = Some((robot_id.clone(), request.clone()));
        let next = self.deploy_results.lock().unwrap().pop_front();
        next.unwrap_or_else(unscripted)
    }

    async fn list_robots(&self) -> ApiResult<Vec<Robot>> {
        self.unscripted_call()
    }

    async fn list_accounts(&self) -> ApiResult<Vec<TradingAccount>> {
        self.unscripted_call()
    }

    async fn sync_account(&self) -> ApiResult<TradingAccount> {
        self.unscripted_call()
    }

    async fn login(&self, _credentials: &LoginRequest) -> ApiResult<UserProfile> {
        self.unscripted_call()
    }

    async fn logout(&self) -> ApiResult<()> {
        self.unscripted_call()
    }

    async fn list_posts(&self) -> ApiResult<Vec<Post>> {
        self.unscripted_call()
    }

    async fn list_groups(&self) -> ApiResult<Vec<ChatGroup>> {
        self.unscripted_call()
    }

    async fn list_messages(&self) -> ApiResult<Vec<ChatMessage>> {
        self.unscripted_call()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_method_is_counted() {
        let api = FakeApi::new();
        let _ = api.list_robots().await;
        let _ = api.list_accounts().await;
        let _ = api.sync_account().await;
        let _ = api.login(&LoginRequest::new("ada", "pw")).await;
        let _ = api.logout().await;
        let _ = api.list_posts().await;
        let _ = api.list_groups().await;
        let _ = api.list_messages().await;

        assert_eq!(api.calls(), 8);
        assert_eq!(api.create_calls(), 0);
        assert_eq!(api.deploy_calls(), 0);
    }
}

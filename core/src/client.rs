//! Request builders, response parsers, and the accessors that join them.
//!
//! # Design
//! `UluleClient` carries no mutable state between calls. Every API resource
//! has a `build_*` method that produces an `HttpRequest` and a `parse_*`
//! method that consumes an `HttpResponse`; both are pure. The accessor of the
//! same name runs `build_*`, hands the request to the `Transport`, and runs
//! `parse_*` on the result. One call, one request, one outcome: nothing is
//! retried or cached.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::auth::Credentials;
use crate::config::ClientConfig;
use crate::decode::decode_body;
use crate::error::{ApiError, Result};
use crate::http::{HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::pagination::PageIter;
use crate::types::{
    ListOrderResponse, ListProjectResponse, ListRewardResponse, ListSupporterResponse, Order, Page,
    Project, ProjectFilter, Reward, Supporter, User,
};

/// Synchronous client for the Ulule API.
///
/// Cheap to share: credentials and transport sit behind `Arc`s, and
/// `with_timeout` derives a client that reuses both.
///
/// # Example
///
/// ```no_run
/// use ulule_core::{Credentials, ProjectFilter, UluleClient};
///
/// # fn example() -> ulule_core::Result<()> {
/// let client = UluleClient::new(Credentials::api_key("alice", "secret"));
/// let me = client.current_user()?;
/// for project in client.list_projects(me.id, ProjectFilter::Created)? {
///     println!("{:?}", project.slug);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct UluleClient<T = UreqTransport> {
    base_url: String,
    user_agent: String,
    timeout: Option<Duration>,
    credentials: Arc<Credentials>,
    transport: Arc<T>,
}

impl UluleClient<UreqTransport> {
    /// Client for the production API with default settings.
    pub fn new(credentials: Credentials) -> Self {
        Self::with_config(credentials, ClientConfig::default())
    }

    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Self {
        let transport = UreqTransport::new(&config);
        Self::with_transport(credentials, &config, transport)
    }

    /// Credentials and configuration read from `ULULE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::with_config(Credentials::from_env(), ClientConfig::from_env()?))
    }
}

impl<T: Transport> UluleClient<T> {
    pub fn with_transport(credentials: Credentials, config: &ClientConfig, transport: T) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
            timeout: Some(config.timeout),
            credentials: Arc::new(credentials),
            transport: Arc::new(transport),
        }
    }

    /// A client sharing this one's credentials and transport whose requests
    /// carry a different timeout.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            base_url: self.base_url.clone(),
            user_agent: self.user_agent.clone(),
            timeout: Some(timeout),
            credentials: Arc::clone(&self.credentials),
            transport: Arc::clone(&self.transport),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    // -----------------------------------------------------------------------
    // Build
    // -----------------------------------------------------------------------

    fn get(&self, path_and_query: &str) -> HttpRequest {
        let mut headers = vec![
            ("accept".to_string(), "application/json".to_string()),
            ("user-agent".to_string(), self.user_agent.clone()),
        ];
        if let Some(value) = self.credentials.authorization() {
            headers.push(("authorization".to_string(), value));
        }
        HttpRequest {
            url: format!("{}{path_and_query}", self.base_url),
            headers,
            timeout: self.timeout,
        }
    }

    pub fn build_list_projects(&self, user_id: u64, filter: ProjectFilter) -> HttpRequest {
        match filter {
            ProjectFilter::All => self.get(&format!("/users/{user_id}/projects")),
            filter => self.get(&format!("/users/{user_id}/projects?state={filter}")),
        }
    }

    pub fn build_get_project(&self, project_id: u64) -> HttpRequest {
        self.get(&format!("/projects/{project_id}"))
    }

    pub fn build_list_project_supporters(&self, project_id: u64, limit: u32, offset: u32) -> HttpRequest {
        self.get(&format!("/projects/{project_id}/supporters?limit={limit}&offset={offset}"))
    }

    pub fn build_list_project_orders(&self, project_id: u64, limit: u32, offset: u32) -> HttpRequest {
        self.get(&format!("/projects/{project_id}/orders?limit={limit}&offset={offset}"))
    }

    pub fn build_list_project_rewards(&self, project_id: u64) -> HttpRequest {
        self.get(&format!("/projects/{project_id}/rewards"))
    }

    pub fn build_get_user(&self, user_id: u64) -> HttpRequest {
        self.get(&format!("/users/{user_id}"))
    }

    pub fn build_current_user(&self) -> HttpRequest {
        self.get("/me")
    }

    /// Fails with `InvalidArgument` when `user` is `None`.
    pub fn build_list_user_orders(&self, user: Option<&User>, limit: u32, offset: u32) -> Result<HttpRequest> {
        let user = user.ok_or_else(|| ApiError::InvalidArgument("user is required to list orders".to_string()))?;
        Ok(self.get(&format!("/users/{}/orders?limit={limit}&offset={offset}", user.id)))
    }

    // -----------------------------------------------------------------------
    // Parse
    // -----------------------------------------------------------------------

    pub fn parse_list_projects(&self, response: HttpResponse) -> Result<Vec<Project>> {
        let list: ListProjectResponse = decode_ok(&response)?;
        Ok(list.projects)
    }

    pub fn parse_get_project(&self, response: HttpResponse) -> Result<Project> {
        decode_ok(&response)
    }

    pub fn parse_list_project_supporters(&self, response: HttpResponse) -> Result<Page<Supporter>> {
        let list: ListSupporterResponse = decode_ok(&response)?;
        Ok(Page::new(list.supporters, list.meta))
    }

    pub fn parse_list_project_orders(&self, response: HttpResponse) -> Result<Page<Order>> {
        let list: ListOrderResponse = decode_ok(&response)?;
        Ok(Page::new(list.orders, list.meta))
    }

    pub fn parse_list_project_rewards(&self, response: HttpResponse) -> Result<Vec<Reward>> {
        let list: ListRewardResponse = decode_ok(&response)?;
        Ok(list.rewards)
    }

    pub fn parse_get_user(&self, response: HttpResponse) -> Result<User> {
        decode_ok(&response)
    }

    pub fn parse_current_user(&self, response: HttpResponse) -> Result<User> {
        decode_ok(&response)
    }

    pub fn parse_list_user_orders(&self, response: HttpResponse) -> Result<Page<Order>> {
        self.parse_list_project_orders(response)
    }

    // -----------------------------------------------------------------------
    // Execute
    // -----------------------------------------------------------------------

    fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!(url = %request.url, auth = self.credentials.kind(), "GET");
        let response = self.transport.execute(&request)?;
        debug!(url = %request.url, status = response.status, bytes = response.body.len(), "response");
        Ok(response)
    }

    /// Projects related to `user_id`, narrowed by `filter`.
    pub fn list_projects(&self, user_id: u64, filter: ProjectFilter) -> Result<Vec<Project>> {
        let response = self.execute(self.build_list_projects(user_id, filter))?;
        self.parse_list_projects(response)
    }

    /// Direct lookup by numeric id.
    pub fn get_project(&self, project_id: u64) -> Result<Project> {
        let response = self.execute(self.build_get_project(project_id))?;
        self.parse_get_project(response)
    }

    /// Look up one of `user_id`'s projects by slug or decimal id.
    ///
    /// Scans the unfiltered project list, for callers that only know a slug.
    /// Fails with `NotFound` when nothing matches.
    pub fn find_project(&self, user_id: u64, identifier: &str) -> Result<Project> {
        let identifier = identifier.trim();
        self.list_projects(user_id, ProjectFilter::All)?
            .into_iter()
            .find(|project| project.matches(identifier))
            .ok_or_else(|| ApiError::NotFound(format!("project not found ({identifier})")))
    }

    pub fn list_project_supporters(&self, project_id: u64, limit: u32, offset: u32) -> Result<Page<Supporter>> {
        let response = self.execute(self.build_list_project_supporters(project_id, limit, offset))?;
        self.parse_list_project_supporters(response)
    }

    pub fn list_project_orders(&self, project_id: u64, limit: u32, offset: u32) -> Result<Page<Order>> {
        let response = self.execute(self.build_list_project_orders(project_id, limit, offset))?;
        self.parse_list_project_orders(response)
    }

    pub fn list_project_rewards(&self, project_id: u64) -> Result<Vec<Reward>> {
        let response = self.execute(self.build_list_project_rewards(project_id))?;
        self.parse_list_project_rewards(response)
    }

    pub fn get_user(&self, user_id: u64) -> Result<User> {
        let response = self.execute(self.build_get_user(user_id))?;
        self.parse_get_user(response)
    }

    /// The user the credentials belong to.
    pub fn current_user(&self) -> Result<User> {
        let response = self.execute(self.build_current_user())?;
        self.parse_current_user(response)
    }

    /// Orders placed by `user`. `None` fails with `InvalidArgument` before any
    /// request is sent.
    pub fn list_user_orders(&self, user: Option<&User>, limit: u32, offset: u32) -> Result<Page<Order>> {
        let request = self.build_list_user_orders(user, limit, offset)?;
        let response = self.execute(request)?;
        self.parse_list_user_orders(response)
    }

    // -----------------------------------------------------------------------
    // Page walkers
    // -----------------------------------------------------------------------

    pub fn project_supporter_pages(
        &self,
        project_id: u64,
        limit: u32,
    ) -> PageIter<Supporter, impl FnMut(u32, u32) -> Result<Page<Supporter>> + '_> {
        PageIter::new(limit, move |limit, offset| {
            self.list_project_supporters(project_id, limit, offset)
        })
    }

    pub fn project_order_pages(
        &self,
        project_id: u64,
        limit: u32,
    ) -> PageIter<Order, impl FnMut(u32, u32) -> Result<Page<Order>> + '_> {
        PageIter::new(limit, move |limit, offset| self.list_project_orders(project_id, limit, offset))
    }

    pub fn user_order_pages<'a>(
        &'a self,
        user: &'a User,
        limit: u32,
    ) -> PageIter<Order, impl FnMut(u32, u32) -> Result<Page<Order>> + 'a> {
        PageIter::new(limit, move |limit, offset| self.list_user_orders(Some(user), limit, offset))
    }
}

/// Reject anything but 200, then decode the body.
fn decode_ok<D: DeserializeOwned>(response: &HttpResponse) -> Result<D> {
    check_status(response)?;
    decode_body(&response.body)
}

fn check_status(response: &HttpResponse) -> Result<()> {
    if response.status == 200 {
        return Ok(());
    }
    warn!(status = response.status, "unexpected response status");
    Err(ApiError::HttpStatus {
        status: response.status,
        body: response.body.clone(),
    })
}
